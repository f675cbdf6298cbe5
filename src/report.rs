use std::io::Write;

use csv::Writer;
use serde::Serialize;
use thiserror::Error;

use crate::address::Address;
use crate::moneymatch::Match;
use crate::moneymatch::MatchId;
use crate::moneymatch::MatchState;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("csv serialization error for match_id={match_id}, source_error={source:?}")]
    Csv {
        match_id: MatchId,
        #[source]
        source: csv::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Writes the supplied [`Match`]es as CSV in ascending id order.
/// Returns every [`ReportError`] encountered so one bad row does not hide the others.
///
/// Matches live in a [`std::collections::HashMap`] while events are applied, so ordering is paid
/// once here, at report time.
pub fn write_csv<'a, W, I>(writer: W, matches: I) -> Vec<ReportError>
where
    W: Write,
    I: IntoIterator<Item = &'a Match>,
{
    let mut matches: Vec<&Match> = matches.into_iter().collect();
    matches.sort_unstable_by_key(|m| m.id());

    let mut writer = Writer::from_writer(writer);
    let mut errors: Vec<ReportError> = Vec::new();

    for m in matches {
        if let Err(source) = writer.serialize(MatchReport::from(m)) {
            errors.push(ReportError::Csv {
                match_id: m.id(),
                source,
            });
        }
    }

    if let Err(io_err) = writer.flush() {
        errors.push(ReportError::Io(io_err));
    }

    errors
}

pub fn write_to_stdout<'a, I>(matches: I) -> Vec<ReportError>
where
    I: IntoIterator<Item = &'a Match>,
{
    write_csv(std::io::stdout(), matches)
}

#[derive(Serialize)]
struct MatchReport {
    r#match: MatchId,
    state: MatchState,
    initiator: Address,
    opponent: Address,
    amount: String,
    max_matches: u32,
    initiator_score: u32,
    opponent_score: u32,
    initiator_vote: Option<Address>,
    opponent_vote: Option<Address>,
    attempts: u32,
    winner: Option<Address>,
    disputed: bool,
}

impl From<&Match> for MatchReport {
    fn from(m: &Match) -> Self {
        Self {
            r#match: m.id(),
            state: m.state(),
            initiator: m.initiator(),
            opponent: m.opponent(),
            amount: m.amount().to_string(),
            max_matches: m.max_matches(),
            initiator_score: m.initiator_score(),
            opponent_score: m.opponent_score(),
            initiator_vote: m.initiator_vote(),
            opponent_vote: m.opponent_vote(),
            attempts: m.attempts(),
            winner: m.winner(),
            disputed: m.is_disputed(),
        }
    }
}
