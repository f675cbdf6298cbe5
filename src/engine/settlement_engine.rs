use crate::config::EngineConfig;
use crate::engine::SignalSink;
use crate::engine::SinkError;
use crate::event::MatchEvent;
use crate::matches::Matches;
use crate::moneymatch::Match;
use crate::moneymatch::MatchError;
use crate::moneymatch::MatchId;
use crate::moneymatch::Signal;
use crate::moneymatch::Transition;

#[cfg(test)]
#[path = "tests/settlement_engine_tests.rs"]
mod settlement_engine_tests;

pub struct SettlementEngine {
    config: EngineConfig,
}

/// What an event did to the store once committed.
enum Commit {
    Insert(Match),
    Replace(Match),
    Remove(MatchId),
}

impl SettlementEngine {
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> EngineConfig {
        self.config
    }

    /// Applies `event` to the match it targets.
    ///
    /// The signal raised by the transition, if any, is emitted first; the store is only updated once
    /// the sink accepted it, so a failed call leaves `matches` exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A `create` targets an existing id ([`SettlementEngineError::DuplicateMatch`]).
    /// - Any other event targets an unknown id ([`SettlementEngineError::MatchNotFound`]).
    /// - The transition is rejected ([`SettlementEngineError::Match`]).
    /// - The sink fails to act on the signal ([`SettlementEngineError::Upstream`]).
    pub fn handle_event<S>(
        &self,
        matches: &mut Matches,
        sink: &mut S,
        event: MatchEvent,
    ) -> Result<Option<Signal>, SettlementEngineError>
    where
        S: SignalSink + ?Sized,
    {
        let (commit, signal) = self.transition(matches, event)?;

        if let Some(signal) = &signal {
            sink.emit(signal)
                .map_err(|source| SettlementEngineError::Upstream { signal: *signal, source })?;
            tracing::info!(match_id = %signal.match_id(), %signal, "signal emitted");
        }

        match commit {
            Commit::Insert(created) => {
                matches
                    .insert(created)
                    .map_err(|existing| SettlementEngineError::DuplicateMatch { id: existing.id() })?;
                tracing::debug!(match_id = %created.id(), state = %created.state(), "match created");
            }
            Commit::Replace(next) => {
                if next.is_disputed() {
                    tracing::warn!(match_id = %next.id(), attempts = next.attempts(), "votes disagree");
                }
                matches.replace(next);
                tracing::debug!(match_id = %next.id(), state = %next.state(), "match updated");
            }
            Commit::Remove(id) => {
                matches.remove(id);
                tracing::debug!(match_id = %id, "match removed");
            }
        }

        Ok(signal)
    }

    fn transition(
        &self,
        matches: &Matches,
        event: MatchEvent,
    ) -> Result<(Commit, Option<Signal>), SettlementEngineError> {
        let current = |id: MatchId| matches.get(id).ok_or(SettlementEngineError::MatchNotFound { id });

        match event {
            MatchEvent::Create(create) => {
                if matches.get(create.match_id).is_some() {
                    return Err(SettlementEngineError::DuplicateMatch { id: create.match_id });
                }
                let Transition { next, signal } = crate::moneymatch::create(
                    create.match_id,
                    create.initiator,
                    create.opponent,
                    create.amount,
                    create.max_matches,
                )?;
                Ok((Commit::Insert(next), signal))
            }
            MatchEvent::Accept(accept) => {
                let Transition { next, signal } = crate::moneymatch::accept(current(accept.match_id)?, accept.actor)?;
                Ok((Commit::Replace(next), signal))
            }
            MatchEvent::Decline(decline) => {
                let signal = crate::moneymatch::decline(current(decline.match_id)?, decline.actor)?;
                Ok((Commit::Remove(decline.match_id), Some(signal)))
            }
            MatchEvent::Vote(vote) => {
                let Transition { next, signal } = crate::moneymatch::vote(
                    current(vote.match_id)?,
                    vote.actor,
                    vote.claimed_winner,
                    self.config.max_agreement_attempts,
                )?;
                Ok((Commit::Replace(next), signal))
            }
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SettlementEngineError {
    #[error("match not found id={id}")]
    MatchNotFound { id: MatchId },
    #[error("match already exists id={id}")]
    DuplicateMatch { id: MatchId },
    #[error(transparent)]
    Match(#[from] MatchError),
    #[error("signal rejected upstream signal=({signal}), re-read the ledger before the next event")]
    Upstream {
        signal: Signal,
        #[source]
        source: SinkError,
    },
}
