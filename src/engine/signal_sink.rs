use crate::moneymatch::Signal;

/// Opaque failure reported by the escrow collaborator.
pub type SinkError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Escrow/transfer collaborator acting on the signals raised by match transitions.
///
/// A transition is committed only after `emit` succeeds. On failure the caller is expected to
/// re-read the authoritative state before submitting the next event.
pub trait SignalSink {
    fn emit(&mut self, signal: &Signal) -> Result<(), SinkError>;
}

impl SignalSink for Vec<Signal> {
    fn emit(&mut self, signal: &Signal) -> Result<(), SinkError> {
        self.push(*signal);
        Ok(())
    }
}
