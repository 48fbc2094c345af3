/// Report sinks — render [`CompareEvent`]s for the user.
///
/// The engine only produces events; every byte written to stdout comes from
/// one of these.
pub mod csv;
pub mod json;
pub mod text;

pub use self::csv::CsvSink;
pub use self::json::JsonLinesSink;
pub use self::text::TextSink;

use crate::cli::ReportFormat;
use std::io::Write;
use watches_core::CompareEvent;

/// Receives every event of a run, in order.
pub trait ReportSink {
    fn event(&mut self, event: &CompareEvent) -> anyhow::Result<()>;

    /// Called once after the last event.
    fn finish(&mut self) -> anyhow::Result<()>;
}

/// Build the sink for `format` writing to `out`.
pub fn build_sink<'a, W: Write + 'a>(format: ReportFormat, out: W) -> Box<dyn ReportSink + 'a> {
    match format {
        ReportFormat::Text => Box::new(TextSink::new(out)),
        ReportFormat::Json => Box::new(JsonLinesSink::new(out)),
        ReportFormat::Csv => Box::new(CsvSink::new(out)),
    }
}
