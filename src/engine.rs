//! Match settlement engine.
//!
//! Provides [`SettlementEngine`] which applies incoming [`crate::event::MatchEvent`]s through the
//! pure transitions of [`crate::moneymatch`], hands each raised [`crate::moneymatch::Signal`] to a
//! [`SignalSink`] and commits the resulting snapshot to [`crate::matches::Matches`].

pub mod settlement_engine;
mod signal_sink;

pub use settlement_engine::SettlementEngine;
pub use settlement_engine::SettlementEngineError;
pub use signal_sink::SignalSink;
pub use signal_sink::SinkError;
