use color_eyre::eyre::OptionExt as _;
use color_eyre::eyre::bail;
use csv::ReaderBuilder;
use csv::Trim;
use moneymatchr::config::EngineConfig;
use moneymatchr::engine::SettlementEngine;
use moneymatchr::engine::SignalSink;
use moneymatchr::engine::SinkError;
use moneymatchr::event::MatchEvent;
use moneymatchr::matches::Matches;
use moneymatchr::moneymatch::Signal;
use tracing_subscriber::EnvFilter;

/// Stands in for the escrow layer: every signal is acknowledged and logged.
struct LoggingSink;

impl SignalSink for LoggingSink {
    fn emit(&mut self, signal: &Signal) -> Result<(), SinkError> {
        tracing::info!(%signal, "escrow instruction");
        Ok(())
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let events_file_path = std::env::args().nth(1).ok_or_eyre("no events CSV supplied")?;
    let config = EngineConfig::from_env()?;
    tracing::info!(max_agreement_attempts = config.max_agreement_attempts.get(), "engine configured");

    let mut events_file_reader = ReaderBuilder::new().trim(Trim::All).from_path(events_file_path)?;

    let engine = SettlementEngine::new(config);
    let mut matches = Matches::new();
    let mut sink = LoggingSink;
    let mut failed_events = 0_usize;

    for event_res in events_file_reader.deserialize::<MatchEvent>() {
        let event = match event_res {
            Ok(event) => event,
            Err(error) => {
                tracing::error!(%error, "failed to deserialize event");
                failed_events += 1;
                continue;
            }
        };

        if let Err(error) = engine.handle_event(&mut matches, &mut sink, event) {
            tracing::error!(%event, %error, "failed to handle event");
            failed_events += 1;
        }
    }

    let report_errors = moneymatchr::report::write_to_stdout(matches.iter());
    for error in &report_errors {
        tracing::error!(%error, "failed to report match");
    }

    if failed_events > 0 || !report_errors.is_empty() {
        bail!(
            "processing completed with failures failed_events={failed_events} report_errors={}",
            report_errors.len()
        );
    }

    Ok(())
}
