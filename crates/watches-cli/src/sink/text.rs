//! Plain-text rendering, one finding per line.
use super::ReportSink;
use anyhow::Context;
use std::io::Write;
use tracing::debug;
use watches_core::{CompareEvent, CompareSummary, GroupingReport};

pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn mismatch(&mut self, report: &GroupingReport) -> std::io::Result<()> {
        writeln!(self.out, "Mismatch {}:", report.path.display())?;
        for group in &report.groups {
            let roots: Vec<String> = group
                .roots
                .iter()
                .map(|r| r.display().to_string())
                .collect();
            writeln!(self.out, "  {}  {}", group.fingerprint, roots.join(", "))?;
        }
        Ok(())
    }

    fn summary(&mut self, s: &CompareSummary) -> std::io::Result<()> {
        writeln!(
            self.out,
            "Checked {} paths across {} roots: {} mismatched, {} unreadable, {} hashed in {:.2}s",
            s.paths_checked,
            s.roots,
            s.mismatches,
            s.unreadable,
            human_bytes(s.bytes_hashed),
            s.duration.as_secs_f64()
        )
    }
}

impl<W: Write> ReportSink for TextSink<W> {
    fn event(&mut self, event: &CompareEvent) -> anyhow::Result<()> {
        let written: std::io::Result<()> = match event {
            CompareEvent::RootStarted { index, root } => {
                debug!("root {index}: {}", root.display());
                Ok(())
            }
            CompareEvent::Progress {
                paths_checked,
                mismatches,
                current_path,
            } => {
                debug!(
                    "{paths_checked} paths checked, {mismatches} mismatches (at {})",
                    current_path.display()
                );
                Ok(())
            }
            CompareEvent::Unreadable { root, path, cause, .. } => writeln!(
                self.out,
                "warning: unable to hash {}: {cause}",
                root.join(path).display()
            ),
            CompareEvent::WalkError {
                root,
                path,
                message,
            } => match path {
                Some(p) => writeln!(self.out, "warning: cannot traverse {}: {message}", p.display()),
                None => writeln!(
                    self.out,
                    "warning: cannot traverse under {}: {message}",
                    root.display()
                ),
            },
            CompareEvent::Mismatch(report) => self.mismatch(report),
            CompareEvent::Unresolved { path, failures } => writeln!(
                self.out,
                "warning: {} could not be hashed under any root ({failures} failures)",
                path.display()
            ),
            CompareEvent::Complete(summary) => self.summary(summary),
            CompareEvent::Cancelled => writeln!(self.out, "Comparison cancelled"),
        };
        written.context("failed to write report")
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        self.out.flush().context("failed to flush report")
    }
}

/// Byte count with a binary unit suffix.
fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use watches_core::{Fingerprint, FingerprintGroup};

    fn render(event: &CompareEvent) -> String {
        let mut buf = Vec::new();
        {
            let mut sink = TextSink::new(&mut buf);
            sink.event(event).unwrap();
            sink.finish().unwrap();
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_human_bytes() {
        assert_eq!(human_bytes(0), "0 B");
        assert_eq!(human_bytes(1023), "1023 B");
        assert_eq!(human_bytes(1536), "1.5 KiB");
        assert_eq!(human_bytes(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn test_mismatch_lists_each_group() {
        let report = GroupingReport {
            path: PathBuf::from("sub/file.txt"),
            groups: vec![
                FingerprintGroup {
                    fingerprint: Fingerprint::from_hex("aaaa"),
                    roots: vec![PathBuf::from("/a"), PathBuf::from("/c")],
                },
                FingerprintGroup {
                    fingerprint: Fingerprint::from_hex("bbbb"),
                    roots: vec![PathBuf::from("/b")],
                },
            ],
            failures: Vec::new(),
            bytes_hashed: 0,
        };
        let text = render(&CompareEvent::Mismatch(report));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Mismatch sub/file.txt:");
        assert_eq!(lines[1], "  aaaa  /a, /c");
        assert_eq!(lines[2], "  bbbb  /b");
    }

    #[test]
    fn test_progress_is_not_rendered() {
        let text = render(&CompareEvent::Progress {
            paths_checked: 1000,
            mismatches: 0,
            current_path: PathBuf::from("x"),
        });
        assert!(text.is_empty());
    }
}
