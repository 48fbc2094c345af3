//! CSV rendering: one row per finding.
//!
//! A mismatch expands to one row per (fingerprint, root) pair so the file
//! can be filtered or pivoted without further parsing.
use super::ReportSink;
use anyhow::Context;
use serde::Serialize;
use std::borrow::Cow;
use std::io::Write;
use watches_core::CompareEvent;

const HEADER: [&str; 5] = ["kind", "path", "root", "fingerprint", "detail"];

#[derive(Serialize)]
struct Row<'a> {
    kind: &'a str,
    path: Cow<'a, str>,
    root: Cow<'a, str>,
    fingerprint: &'a str,
    detail: Cow<'a, str>,
}

pub struct CsvSink<W: Write> {
    writer: ::csv::Writer<W>,
    header_written: bool,
}

impl<W: Write> CsvSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            writer: ::csv::WriterBuilder::new().has_headers(false).from_writer(out),
            header_written: false,
        }
    }

    fn write_row(&mut self, row: Row<'_>) -> anyhow::Result<()> {
        self.ensure_header()?;
        self.writer.serialize(row).context("failed to write CSV row")
    }

    fn ensure_header(&mut self) -> anyhow::Result<()> {
        if !self.header_written {
            self.writer
                .write_record(HEADER)
                .context("failed to write CSV header")?;
            self.header_written = true;
        }
        Ok(())
    }
}

impl<W: Write> ReportSink for CsvSink<W> {
    fn event(&mut self, event: &CompareEvent) -> anyhow::Result<()> {
        match event {
            CompareEvent::Mismatch(report) => {
                let path = report.path.to_string_lossy();
                for group in &report.groups {
                    for root in &group.roots {
                        self.write_row(Row {
                            kind: "mismatch",
                            path: path.clone(),
                            root: root.to_string_lossy(),
                            fingerprint: group.fingerprint.as_str(),
                            detail: Cow::Borrowed(""),
                        })?;
                    }
                }
                Ok(())
            }
            CompareEvent::Unreadable {
                root, path, cause, ..
            } => self.write_row(Row {
                kind: "unreadable",
                path: path.to_string_lossy(),
                root: root.to_string_lossy(),
                fingerprint: "",
                detail: Cow::Borrowed(cause.as_str()),
            }),
            CompareEvent::WalkError {
                root,
                path,
                message,
            } => self.write_row(Row {
                kind: "walk_error",
                path: path
                    .as_deref()
                    .map(|p| p.to_string_lossy())
                    .unwrap_or_default(),
                root: root.to_string_lossy(),
                fingerprint: "",
                detail: Cow::Borrowed(message.as_str()),
            }),
            CompareEvent::Unresolved { path, failures } => self.write_row(Row {
                kind: "unresolved",
                path: path.to_string_lossy(),
                root: Cow::Borrowed(""),
                fingerprint: "",
                detail: Cow::Owned(format!("{failures} failures")),
            }),
            CompareEvent::RootStarted { .. }
            | CompareEvent::Progress { .. }
            | CompareEvent::Complete(_)
            | CompareEvent::Cancelled => Ok(()),
        }
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        self.ensure_header()?;
        self.writer.flush().context("failed to flush CSV output")
    }
}
