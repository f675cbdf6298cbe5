//! Free functions computing the next [`Match`] from the current one.
//!
//! Every function takes the current snapshot by reference and hands back a new value, leaving the
//! input untouched. A failed call therefore never leaves a half-applied transition behind and the
//! caller decides when (and whether) the returned snapshot becomes the stored one.
//!
//! Preconditions are checked in a fixed order: state first, then the acting party, then the
//! payload.

use std::num::NonZeroU32;

use crate::address::Address;
use crate::amount::TokenAmount;
use crate::moneymatch::Match;
use crate::moneymatch::MatchId;
use crate::moneymatch::MatchState;
use crate::moneymatch::Role;

#[cfg(test)]
#[path = "tests/ops_tests.rs"]
mod ops_tests;

/// Party action attempted against a match, used to qualify [`MatchError::InvalidState`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, parse_display::Display)]
#[display(style = "snake_case")]
pub enum Action {
    Accept,
    Decline,
    Vote,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, parse_display::Display)]
pub enum ParameterError {
    #[display("initiator and opponent must differ")]
    SelfMatch,
    #[display("amount must be positive")]
    ZeroAmount,
    #[display("max matches must be odd")]
    EvenMaxMatches,
    #[display("max matches must be positive")]
    ZeroMaxMatches,
    #[display("pooled amount overflows")]
    PooledAmountOverflow,
    #[display("claimed winner {0} is not a party")]
    ClaimedWinnerNotParty(Address),
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MatchError {
    #[error("invalid parameters match_id={match_id} reason={reason}")]
    InvalidParameters { match_id: MatchId, reason: ParameterError },
    #[error("invalid actor match_id={match_id} actor={actor}")]
    InvalidActor { match_id: MatchId, actor: Address },
    #[error("invalid state match_id={match_id} state={state} action={action}")]
    InvalidState {
        match_id: MatchId,
        state: MatchState,
        action: Action,
    },
}

/// Instruction for the escrow collaborator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, parse_display::Display)]
pub enum Signal {
    #[display("escrow_initiator_stake match_id={match_id} initiator={initiator} amount={amount}")]
    EscrowInitiatorStake {
        match_id: MatchId,
        initiator: Address,
        amount: TokenAmount,
    },
    #[display("escrow_opponent_stake match_id={match_id} opponent={opponent} amount={amount}")]
    EscrowOpponentStake {
        match_id: MatchId,
        opponent: Address,
        amount: TokenAmount,
    },
    #[display("refund_initiator_stake match_id={match_id} initiator={initiator} amount={amount}")]
    RefundInitiatorStake {
        match_id: MatchId,
        initiator: Address,
        amount: TokenAmount,
    },
    #[display("release_pool match_id={match_id} winner={winner} amount={amount}")]
    ReleasePool {
        match_id: MatchId,
        winner: Address,
        amount: TokenAmount,
    },
    #[display("escalate_to_arbitration match_id={match_id}")]
    EscalateToArbitration { match_id: MatchId },
}

impl Signal {
    pub const fn match_id(&self) -> MatchId {
        match self {
            Self::EscrowInitiatorStake { match_id, .. }
            | Self::EscrowOpponentStake { match_id, .. }
            | Self::RefundInitiatorStake { match_id, .. }
            | Self::ReleasePool { match_id, .. }
            | Self::EscalateToArbitration { match_id } => *match_id,
        }
    }
}

/// Next snapshot of a match plus the signal the transition raised, if any.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: Match,
    pub signal: Option<Signal>,
}

/// Proposes a new match in [`MatchState::Sent`], with the initiator's stake to be escrowed.
///
/// # Errors
///
/// Returns [`MatchError::InvalidParameters`] if:
/// - `opponent` equals `initiator` ([`ParameterError::SelfMatch`]).
/// - `amount` is zero ([`ParameterError::ZeroAmount`]).
/// - `max_matches` is zero or even ([`ParameterError::ZeroMaxMatches`], [`ParameterError::EvenMaxMatches`]).
pub fn create(
    id: MatchId,
    initiator: Address,
    opponent: Address,
    amount: TokenAmount,
    max_matches: u32,
) -> Result<Transition, MatchError> {
    let invalid = |reason| MatchError::InvalidParameters { match_id: id, reason };

    if initiator == opponent {
        return Err(invalid(ParameterError::SelfMatch));
    }
    if amount.is_zero() {
        return Err(invalid(ParameterError::ZeroAmount));
    }
    if max_matches == 0 {
        return Err(invalid(ParameterError::ZeroMaxMatches));
    }
    if max_matches % 2 == 0 {
        return Err(invalid(ParameterError::EvenMaxMatches));
    }

    let next = Match {
        id,
        initiator,
        opponent,
        amount,
        max_matches,
        initiator_score: 0,
        opponent_score: 0,
        initiator_vote: None,
        opponent_vote: None,
        attempts: 0,
        winner: None,
        state: MatchState::Sent,
    };

    Ok(Transition {
        next,
        signal: Some(Signal::EscrowInitiatorStake {
            match_id: id,
            initiator,
            amount,
        }),
    })
}

/// Opponent accepts a `Sent` match: stakes are pooled and the match is `Started`.
///
/// # Errors
///
/// Returns an error if:
/// - The match is not `Sent` ([`MatchError::InvalidState`]).
/// - `actor` is not the opponent ([`MatchError::InvalidActor`]).
/// - Pooling the stakes overflows ([`MatchError::InvalidParameters`]).
pub fn accept(current: &Match, actor: Address) -> Result<Transition, MatchError> {
    ensure_opponent_of_sent_match(current, actor, Action::Accept)?;

    let pooled = current
        .amount
        .checked_double()
        .ok_or(MatchError::InvalidParameters {
            match_id: current.id,
            reason: ParameterError::PooledAmountOverflow,
        })?;

    Ok(Transition {
        next: Match {
            amount: pooled,
            state: MatchState::Started,
            ..*current
        },
        signal: Some(Signal::EscrowOpponentStake {
            match_id: current.id,
            opponent: current.opponent,
            amount: current.amount,
        }),
    })
}

/// Opponent declines a `Sent` match. The record ceases to exist; the returned signal refunds the
/// initiator's stake.
///
/// # Errors
///
/// Returns an error if:
/// - The match is not `Sent` ([`MatchError::InvalidState`]).
/// - `actor` is not the opponent ([`MatchError::InvalidActor`]).
pub fn decline(current: &Match, actor: Address) -> Result<Signal, MatchError> {
    ensure_opponent_of_sent_match(current, actor, Action::Decline)?;

    Ok(Signal::RefundInitiatorStake {
        match_id: current.id,
        initiator: current.initiator,
        amount: current.amount,
    })
}

/// Records `actor`'s claim that `claimed_winner` won the current game and reconciles it with the
/// counterpart's recorded vote.
///
/// Agreement scores the game, and finishes the series when the claimed winner reaches the needed
/// wins. Disagreement counts a disputed round; reaching `max_agreement_attempts` freezes the match.
/// A vote with no counterpart vote yet only waits.
///
/// # Errors
///
/// Returns an error if:
/// - The match is neither `Started` nor `Voting` ([`MatchError::InvalidState`]).
/// - `actor` is not a party ([`MatchError::InvalidActor`]).
/// - `claimed_winner` is not a party ([`MatchError::InvalidParameters`]).
pub fn vote(
    current: &Match,
    actor: Address,
    claimed_winner: Address,
    max_agreement_attempts: NonZeroU32,
) -> Result<Transition, MatchError> {
    if !matches!(current.state, MatchState::Started | MatchState::Voting) {
        return Err(MatchError::InvalidState {
            match_id: current.id,
            state: current.state,
            action: Action::Vote,
        });
    }
    let role = current.role_of(actor).ok_or(MatchError::InvalidActor {
        match_id: current.id,
        actor,
    })?;
    let claimed_role = current.role_of(claimed_winner).ok_or(MatchError::InvalidParameters {
        match_id: current.id,
        reason: ParameterError::ClaimedWinnerNotParty(claimed_winner),
    })?;

    Ok(reconcile(current, role, claimed_role, max_agreement_attempts))
}

fn reconcile(current: &Match, role: Role, claimed_role: Role, max_agreement_attempts: NonZeroU32) -> Transition {
    let claimed_winner = current.party(claimed_role);
    let other_vote = current.vote_of(role.other());

    let mut next = *current;
    match role {
        Role::Initiator => next.initiator_vote = Some(claimed_winner),
        Role::Opponent => next.opponent_vote = Some(claimed_winner),
    }

    let agreed = other_vote == Some(claimed_winner);
    let disputed = other_vote.is_some_and(|vote| vote != claimed_winner);

    if agreed {
        let score = current.score_of(claimed_role) + 1;
        match claimed_role {
            Role::Initiator => next.initiator_score = score,
            Role::Opponent => next.opponent_score = score,
        }
        next.initiator_vote = None;
        next.opponent_vote = None;

        if score == current.needed_wins() {
            next.state = MatchState::Finished;
            next.winner = Some(claimed_winner);
            return Transition {
                next,
                signal: Some(Signal::ReleasePool {
                    match_id: current.id,
                    winner: claimed_winner,
                    amount: current.amount,
                }),
            };
        }

        next.attempts = 0;
        next.state = MatchState::Voting;
        return Transition { next, signal: None };
    }

    if disputed {
        next.attempts = current.attempts.saturating_add(1);
        if next.attempts >= max_agreement_attempts.get() {
            next.state = MatchState::Frozen;
            next.initiator_vote = None;
            next.opponent_vote = None;
            return Transition {
                next,
                signal: Some(Signal::EscalateToArbitration { match_id: current.id }),
            };
        }
    }

    next.state = MatchState::Voting;
    Transition { next, signal: None }
}

fn ensure_opponent_of_sent_match(current: &Match, actor: Address, action: Action) -> Result<(), MatchError> {
    if current.state != MatchState::Sent {
        return Err(MatchError::InvalidState {
            match_id: current.id,
            state: current.state,
            action,
        });
    }
    if actor != current.opponent {
        return Err(MatchError::InvalidActor {
            match_id: current.id,
            actor,
        });
    }
    Ok(())
}
