//! Human-readable refusal report.

use std::fmt::Write as _;

use colored::{ColoredString, Colorize};

use crate::gate::evaluator::{RefusedFile, max_refused_mib};

/// Presentation switches for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportStyle {
    /// Emit ANSI styling.
    pub color: bool,
}

impl ReportStyle {
    #[must_use]
    pub const fn plain() -> Self {
        Self { color: false }
    }

    fn paint(self, text: &str, style: fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

/// Render the refusal report. Returns an empty string when nothing was refused.
#[must_use]
pub fn render_report(
    refused: &[RefusedFile],
    max_mib: f64,
    show_hint: bool,
    style: ReportStyle,
) -> String {
    let Some(largest) = max_refused_mib(refused) else {
        return String::new();
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}",
        style.paint("Warning:", |s| s.yellow().bold()),
        style.paint("Refused to commit some files:", |s| s.bold()),
    );

    let limit = style.paint(&format!("{max_mib:.1}"), |s| s.green().bold());
    for record in refused {
        let _ = writeln!(
            out,
            "  {}: {}MiB; the maximum size allowed is {limit}MiB",
            style.paint(&record.path.display().to_string(), |s| s.bold()),
            style.paint(&format!("{:.1}", record.size.mib), |s| s.red().bold()),
        );
    }

    if show_hint {
        let _ = writeln!(
            out,
            "{} This is to prevent large files from being added by accident. You can fix this by:",
            style.paint("Hint:", |s| s.cyan().bold()),
        );
        out.push_str("  - Adding the file to `.gitignore`\n");
        let _ = writeln!(
            out,
            "  - Change `.pre-commit-config.yaml` args `--max-mib={largest:.1}`"
        );
        out.push_str(
            "    This will increase the maximum file size allowed for new files, in this repository only.\n",
        );
        out.push_str("  - Run `git commit --no-verify`\n");
        out.push_str("    This will not run pre-commit and commit-msg hooks.\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::evaluator::SizeMeasurement;
    use std::path::PathBuf;

    fn refused(path: &str, bytes: u64) -> RefusedFile {
        RefusedFile {
            path: PathBuf::from(path),
            size: SizeMeasurement::from_bytes(bytes),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn mib_bytes(mib: f64) -> u64 {
        (mib * 1024.0 * 1024.0) as u64
    }

    #[test]
    fn empty_records_render_nothing() {
        assert_eq!(render_report(&[], 1.0, true, ReportStyle::plain()), "");
    }

    #[test]
    fn one_byte_over_renders_one_decimal() {
        let report = render_report(
            &[refused("big.bin", 1_048_577)],
            1.0,
            false,
            ReportStyle::plain(),
        );
        assert_eq!(
            report,
            "Warning: Refused to commit some files:\n  big.bin: 1.0MiB; the maximum size allowed is 1.0MiB\n"
        );
    }

    #[test]
    fn no_hint_block_without_flag() {
        let report = render_report(
            &[refused("big.bin", mib_bytes(3.0))],
            1.0,
            false,
            ReportStyle::plain(),
        );
        assert!(!report.contains("Hint:"));
    }

    #[test]
    fn hint_suggests_largest_refused_size() {
        let records = [
            refused("a.bin", mib_bytes(2.3)),
            refused("b.bin", mib_bytes(5.7)),
        ];
        let report = render_report(&records, 1.0, true, ReportStyle::plain());
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[1], "  a.bin: 2.3MiB; the maximum size allowed is 1.0MiB");
        assert_eq!(lines[2], "  b.bin: 5.7MiB; the maximum size allowed is 1.0MiB");
        assert_eq!(
            lines[3],
            "Hint: This is to prevent large files from being added by accident. You can fix this by:"
        );
        assert_eq!(lines[4], "  - Adding the file to `.gitignore`");
        assert_eq!(
            lines[5],
            "  - Change `.pre-commit-config.yaml` args `--max-mib=5.7`"
        );
        assert_eq!(lines[7], "  - Run `git commit --no-verify`");
    }

    #[test]
    fn threshold_is_rendered_with_one_decimal() {
        let report = render_report(
            &[refused("big.bin", mib_bytes(3.0))],
            2.5,
            false,
            ReportStyle::plain(),
        );
        assert!(report.contains("big.bin: 3.0MiB; the maximum size allowed is 2.5MiB"));
    }

    #[test]
    fn colored_style_keeps_text() {
        colored::control::set_override(true);
        let report = render_report(
            &[refused("big.bin", mib_bytes(3.0))],
            1.0,
            true,
            ReportStyle { color: true },
        );
        assert!(report.contains("Refused to commit some files:"));
        assert!(report.contains("big.bin"));
        assert!(report.contains("--max-mib=3.0"));
        assert!(report.contains("\u{1b}["));
    }
}
