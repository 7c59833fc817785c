//! `callinfo check`: Run conformance scenarios and report.

use std::path::PathBuf;

use callinfo_runtime::{CaseOutcome, Report};
use termcolor::Color;

use crate::output::{self, StyledOutput};

/// Arguments for the check command.
pub struct CheckArgs {
    pub pattern: Option<String>,
    pub config: Option<PathBuf>,
    pub host_interop: bool,
    pub color: String,
}

pub fn execute(args: CheckArgs) -> anyhow::Result<()> {
    let color_choice = output::resolve_color_choice(Some(args.color.as_str()));
    let mut out = StyledOutput::new(color_choice);

    let mut options = super::load_options(args.config.as_deref())?;
    if args.host_interop {
        options.engine.host_interop = true;
    }

    let report = callinfo_runtime::run(&options, args.pattern.as_deref())?;

    if report.results.is_empty() {
        out.warning("No cases matched.");
        out.newline();
        return Ok(());
    }

    print_results(&mut out, &report);
    print_failure_details(&mut out, &report);
    print_summary(&mut out, &report);
    out.flush();

    if report.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}

// ── Reporter ─────────────────────────────────────────────────────────────

fn print_results(out: &mut StyledOutput, report: &Report) {
    let mut current_suite = "";
    for case in &report.results {
        if case.suite != current_suite {
            current_suite = case.suite;
            out.newline();
            out.bold(current_suite);
            out.newline();
        }
        match &case.outcome {
            CaseOutcome::Passed => {
                out.write_styled("   ✓ ", Some(Color::Green), false);
                out.write_styled(case.name, Some(Color::Green), false);
            }
            CaseOutcome::Failed(_) => {
                out.write_styled("   ✗ ", Some(Color::Red), true);
                out.write_styled(case.name, Some(Color::Red), true);
            }
            CaseOutcome::Skipped(reason) => {
                out.write_styled("   ○ ", Some(Color::Yellow), false);
                out.write_styled(case.name, Some(Color::Yellow), false);
                out.dim(&format!(" ({})", reason));
            }
        }
        out.newline();
    }
}

fn print_failure_details(out: &mut StyledOutput, report: &Report) {
    let failures: Vec<_> = report
        .results
        .iter()
        .filter_map(|case| match &case.outcome {
            CaseOutcome::Failed(message) => Some((case.full_name(), message)),
            _ => None,
        })
        .collect();
    if failures.is_empty() {
        return;
    }

    out.newline();
    for (name, message) in failures {
        out.fail_badge();
        out.plain(" ");
        out.bold(&name);
        out.newline();
        out.error(&format!("  {}", message));
        out.newline();
    }
}

fn print_summary(out: &mut StyledOutput, report: &Report) {
    out.newline();
    out.dim("──────────────────────────────────────────");
    out.newline();

    out.bold("Cases:  ");
    if report.failed() > 0 {
        out.error(&format!("{} failed", report.failed()));
        out.plain(", ");
    }
    if report.skipped() > 0 {
        out.warning(&format!("{} skipped", report.skipped()));
        out.plain(", ");
    }
    if report.passed() > 0 {
        out.success(&format!("{} passed", report.passed()));
        out.plain(", ");
    }
    out.bold(&format!("{} total", report.results.len()));
    out.newline();

    out.bold("Time:   ");
    out.dim(&format!("{:.2}ms", report.total_duration_ms()));
    out.newline();
}
