//! Money match data model and its pure transitions.
//!
//! [`model`] holds the [`Match`] record and its read-only derivations, [`ops`] the free functions
//! computing the next [`Match`] from the current one plus a single party action.

pub mod model;
pub mod ops;

pub use model::Match;
pub use model::MatchId;
pub use model::MatchState;
pub use model::MatchStatus;
pub use model::Role;
pub use ops::Action;
pub use ops::MatchError;
pub use ops::ParameterError;
pub use ops::Signal;
pub use ops::Transition;
pub use ops::accept;
pub use ops::create;
pub use ops::decline;
pub use ops::vote;
