//! JSON-lines rendering: one serialised [`CompareEvent`] per line.
//!
//! Progress and root-start events are omitted; everything else, including
//! the final summary, is written as it arrives.
use super::ReportSink;
use anyhow::Context;
use std::io::Write;
use watches_core::CompareEvent;

pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> ReportSink for JsonLinesSink<W> {
    fn event(&mut self, event: &CompareEvent) -> anyhow::Result<()> {
        if matches!(
            event,
            CompareEvent::Progress { .. } | CompareEvent::RootStarted { .. }
        ) {
            return Ok(());
        }
        serde_json::to_writer(&mut self.out, event).context("failed to serialise event")?;
        writeln!(self.out).context("failed to write report")?;
        Ok(())
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        self.out.flush().context("failed to flush report")
    }
}
