use serde::Deserialize;
use serde::Serialize;

use crate::address::Address;
use crate::amount::TokenAmount;

#[derive(Debug, Serialize, Deserialize, Copy, Clone, Hash, PartialEq, Eq, Ord, PartialOrd, parse_display::Display)]
pub struct MatchId(pub u64);

/// Persisted lifecycle state of a [`Match`].
#[derive(Debug, Serialize, Copy, Clone, PartialEq, Eq, parse_display::Display)]
#[display(style = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    Sent,
    Started,
    Voting,
    Finished,
    Frozen,
}

/// Presentation label of a [`Match`], derived from [`MatchState`] and the recorded votes.
///
/// `Disputed` is never stored: it is a `Voting` match whose parties both voted for different winners.
#[derive(Debug, Copy, Clone, PartialEq, Eq, parse_display::Display)]
#[display(style = "snake_case")]
pub enum MatchStatus {
    Sent,
    Started,
    Voting,
    Disputed,
    Finished,
    Frozen,
}

/// Which side of the match a party sits on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, parse_display::Display)]
#[display(style = "snake_case")]
pub enum Role {
    Initiator,
    Opponent,
}

impl Role {
    pub const fn other(self) -> Self {
        match self {
            Self::Initiator => Self::Opponent,
            Self::Opponent => Self::Initiator,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Match {
    pub(in crate::moneymatch) id: MatchId,
    pub(in crate::moneymatch) initiator: Address,
    pub(in crate::moneymatch) opponent: Address,
    pub(in crate::moneymatch) amount: TokenAmount,
    pub(in crate::moneymatch) max_matches: u32,
    pub(in crate::moneymatch) initiator_score: u32,
    pub(in crate::moneymatch) opponent_score: u32,
    pub(in crate::moneymatch) initiator_vote: Option<Address>,
    pub(in crate::moneymatch) opponent_vote: Option<Address>,
    pub(in crate::moneymatch) attempts: u32,
    pub(in crate::moneymatch) winner: Option<Address>,
    pub(in crate::moneymatch) state: MatchState,
}

impl Match {
    pub const fn id(&self) -> MatchId {
        self.id
    }

    pub const fn initiator(&self) -> Address {
        self.initiator
    }

    pub const fn opponent(&self) -> Address {
        self.opponent
    }

    /// Stake per party while `Sent`, pooled stake of both parties afterwards.
    pub const fn amount(&self) -> TokenAmount {
        self.amount
    }

    pub const fn max_matches(&self) -> u32 {
        self.max_matches
    }

    pub const fn initiator_score(&self) -> u32 {
        self.initiator_score
    }

    pub const fn opponent_score(&self) -> u32 {
        self.opponent_score
    }

    pub const fn initiator_vote(&self) -> Option<Address> {
        self.initiator_vote
    }

    pub const fn opponent_vote(&self) -> Option<Address> {
        self.opponent_vote
    }

    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    pub const fn winner(&self) -> Option<Address> {
        self.winner
    }

    pub const fn state(&self) -> MatchState {
        self.state
    }

    /// Games a party must win to take the series.
    pub const fn needed_wins(&self) -> u32 {
        self.max_matches / 2 + 1
    }

    pub fn role_of(&self, address: Address) -> Option<Role> {
        if address == self.initiator {
            Some(Role::Initiator)
        } else if address == self.opponent {
            Some(Role::Opponent)
        } else {
            None
        }
    }

    pub const fn party(&self, role: Role) -> Address {
        match role {
            Role::Initiator => self.initiator,
            Role::Opponent => self.opponent,
        }
    }

    pub const fn vote_of(&self, role: Role) -> Option<Address> {
        match role {
            Role::Initiator => self.initiator_vote,
            Role::Opponent => self.opponent_vote,
        }
    }

    pub const fn score_of(&self, role: Role) -> u32 {
        match role {
            Role::Initiator => self.initiator_score,
            Role::Opponent => self.opponent_score,
        }
    }

    pub fn is_disputed(&self) -> bool {
        matches!(self.state, MatchState::Voting)
            && matches!(
                (self.initiator_vote, self.opponent_vote),
                (Some(initiator_vote), Some(opponent_vote)) if initiator_vote != opponent_vote
            )
    }

    pub fn status(&self) -> MatchStatus {
        match self.state {
            MatchState::Sent => MatchStatus::Sent,
            MatchState::Started => MatchStatus::Started,
            MatchState::Voting if self.is_disputed() => MatchStatus::Disputed,
            MatchState::Voting => MatchStatus::Voting,
            MatchState::Finished => MatchStatus::Finished,
            MatchState::Frozen => MatchStatus::Frozen,
        }
    }
}
