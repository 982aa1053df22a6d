//! Console output for a run.
//!
//! Progress goes to stdout, skipped templates to stderr. Each printer has a `_to`
//! variant taking explicit writers for testing.

use std::{
    io::{self, Write},
    path::Path,
};

use colored::Colorize;

use crate::core::{GenerateOptions, GenerateSummary, Progress};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print the inputs of the run.
pub fn print_banner(options: &GenerateOptions) {
    print_banner_to(options, &mut io::stdout().lock());
}

pub fn print_banner_to<W: Write>(options: &GenerateOptions, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        "Templates:".bold(),
        options.template_root.display()
    );
    let _ = writeln!(
        writer,
        "{} {}",
        "Resources:".bold(),
        options.resource_root.display()
    );
    let _ = writeln!(writer, "{} {}", "Encoding:".bold(), options.encoding_label);
    if options.dry_run {
        let _ = writeln!(writer, "{}", "Dry run: no file will be written".yellow());
    }
    let _ = writeln!(writer);
}

/// Print one progress event.
pub fn print_progress(event: &Progress<'_>) {
    print_progress_to(event, &mut io::stdout().lock(), &mut io::stderr().lock());
}

pub fn print_progress_to<O: Write, E: Write>(event: &Progress<'_>, out: &mut O, err: &mut E) {
    match event {
        Progress::Template { path, extracted } => {
            let count = if *extracted > 0 {
                extracted.to_string().green().bold()
            } else {
                extracted.to_string().dimmed()
            };
            let _ = writeln!(
                out,
                "{} ({} new message(s) found)",
                file_name(path),
                count
            );
        }
        Progress::TemplateFailed { path, error } => {
            let _ = writeln!(
                err,
                "{} skipped {}: {}",
                "warning:".bold().yellow(),
                file_name(path),
                error
            );
        }
        Progress::Saving { path } => {
            let _ = writeln!(out, "{} {}", "Saving".cyan(), file_name(path));
        }
        Progress::Checked { path } => {
            let _ = writeln!(out, "{} {}", "Would save".dimmed(), file_name(path));
        }
    }
}

/// Print the final summary line.
pub fn print_summary(summary: &GenerateSummary, dry_run: bool) {
    print_summary_to(summary, dry_run, &mut io::stdout().lock());
}

pub fn print_summary_to<W: Write>(summary: &GenerateSummary, dry_run: bool, writer: &mut W) {
    let templates = summary.templates.len();
    let bundles = summary.bundles.len();
    let conflicts: usize = summary.bundles.iter().map(|b| b.conflicts).sum();

    let mut msg = format!(
        "Extracted {} message(s) from {} {}, {} {} {}",
        summary.total_extracted(),
        templates,
        if templates == 1 { "template" } else { "templates" },
        if dry_run { "checked" } else { "saved" },
        bundles,
        if bundles == 1 { "bundle" } else { "bundles" },
    );
    if conflicts > 0 {
        msg.push_str(&format!(" ({} conflict(s), see bundle comments)", conflicts));
    }

    let _ = writeln!(writer);
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), msg.green());

    if summary.has_failures() {
        let _ = writeln!(
            writer,
            "{} {}",
            FAILURE_MARK.red(),
            format!("{} template(s) skipped", summary.failures.len()).red()
        );
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
