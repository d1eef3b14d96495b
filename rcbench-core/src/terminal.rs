//! Terminal UI components and styling for rcbench.
//!
//! Output goes through the `log` facade so it lands in the console and, when
//! file logging is active, in the run log as well. A single `indicatif` bar
//! counts measured runs across the whole clip × variant × repeat loop.

use console::{Term, style};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::info;
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::sync::{LazyLock, Mutex};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

/// Represents the visual hierarchy levels in the CLI output
#[derive(Debug, Clone, Copy)]
pub enum OutputLevel {
    /// Level 1: Main sections (===== SECTION =====)
    Section,
    /// Level 2: Per-clip and per-variant steps (» Step)
    Subsection,
    /// Level 3: Sub-items under a step
    Progress,
    /// Level 4: Key-value status information
    Status,
}

impl OutputLevel {
    fn indent(&self) -> &'static str {
        match self {
            OutputLevel::Section => "",
            OutputLevel::Subsection => "  ",
            OutputLevel::Progress => "    ",
            OutputLevel::Status => "      ",
        }
    }
}

struct TerminalState {
    current_progress: Option<ProgressBar>,
}

static TERMINAL_STATE: LazyLock<Mutex<TerminalState>> = LazyLock::new(|| {
    Mutex::new(TerminalState {
        current_progress: None,
    })
});

/// Check if color should be used (respects NO_COLOR environment variable)
fn should_use_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Print a section header for major phases
pub fn print_section(title: &str) {
    info!("");
    if should_use_color() {
        info!("===== {} =====", title.to_uppercase().cyan());
    } else {
        info!("===== {} =====", title.to_uppercase());
    }
    info!("");
}

/// Print an item at the specified hierarchy level
pub fn print_item(level: OutputLevel, symbol: Option<&str>, text: &str, bold: bool) {
    let indent = level.indent();
    if should_use_color() && bold {
        info!("{}{} {}", indent, symbol.unwrap_or(""), style(text).bold());
    } else if let Some(sym) = symbol {
        info!("{indent}{sym} {text}");
    } else {
        info!("{indent}{text}");
    }
}

/// Print a processing step
pub fn print_processing(message: &str) {
    info!("");
    print_item(OutputLevel::Subsection, Some("»"), message, true);
}

/// Print a sub-item under a processing step
pub fn print_sub_item(message: &str) {
    print_item(OutputLevel::Progress, None, message, false);
}

/// Print a success message
pub fn print_success(message: &str) {
    info!("");
    if should_use_color() {
        info!("  ✓ {}", message.green());
    } else {
        info!("  ✓ {message}");
    }
}

/// Print a status line (key-value pair)
///
/// RC percentages are colored by direction: cheaper than baseline in green,
/// more expensive in yellow.
pub fn print_status(label: &str, value: &str, highlight: bool) {
    let label_width: usize = 15;
    let padding = label_width.saturating_sub(label.width()).max(1);
    let indent = OutputLevel::Status.indent();

    if !should_use_color() {
        info!("{}{}:{} {}", indent, label, " ".repeat(padding), value);
        return;
    }

    let rc = value
        .strip_suffix('%')
        .and_then(|v| v.trim().parse::<f64>().ok());
    let colored_value = match rc {
        Some(pct) if pct < 100.0 => value.green().to_string(),
        Some(pct) if pct > 100.0 => value.yellow().to_string(),
        _ if highlight => value.bold().to_string(),
        _ => value.to_string(),
    };
    info!("{}{}:{} {}", indent, label, " ".repeat(padding), colored_value);
}

/// Print an error message
pub fn print_error(title: &str, message: &str, suggestion: Option<&str>) {
    if should_use_color() {
        info!("✗ {}", title.red().bold());
    } else {
        info!("✗ {title}");
    }

    info!("");
    info!("  Message:  {message}");

    if let Some(suggestion_text) = suggestion {
        info!("");
        info!("  Suggestion: {suggestion_text}");
    }

    info!("");
}

/// Print a warning message
pub fn print_warning(message: &str) {
    if should_use_color() {
        info!("  ⚠ {}", message.yellow());
    } else {
        info!("  ⚠ {message}");
    }
}

fn progress_style(term_width: usize) -> ProgressStyle {
    let template = if term_width >= 100 {
        "  ⧖ Measuring: {pos}/{len} [{bar:30}] ({elapsed_precise} / {eta_precise}) {msg}"
    } else if term_width >= 60 {
        "  ⧖ Measuring: {pos}/{len} [{bar:20}]\n    ETA: {eta_precise}"
    } else {
        "  ⧖ {pos}/{len} [{bar:10}]"
    };
    ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##.")
}

/// Start the run counter for `total_runs` measured runs.
///
/// The bar is only drawn on a terminal; otherwise it is hidden. Returns a
/// handle to the new bar.
pub fn start_run_progress(total_runs: u64) -> ProgressBar {
    let pb = ProgressBar::new(total_runs);
    pb.set_style(progress_style(Term::stderr().size().1 as usize));

    if !std::io::stderr().is_terminal() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    } else {
        pb.enable_steady_tick(Duration::from_millis(100));
    }

    if let Ok(mut state) = TERMINAL_STATE.lock() {
        if let Some(old) = state.current_progress.replace(pb.clone()) {
            old.finish_and_clear();
        }
    }
    pb
}

/// Count one finished measured run.
pub fn advance_run_progress(message: &str) {
    if let Ok(state) = TERMINAL_STATE.lock() {
        if let Some(pb) = state.current_progress.as_ref() {
            pb.set_message(message.to_string());
            pb.inc(1);
        }
    }
}

/// Count `count` runs that will not be attempted.
pub fn skip_run_progress(count: u64) {
    if let Ok(state) = TERMINAL_STATE.lock() {
        if let Some(pb) = state.current_progress.as_ref() {
            pb.inc(count);
        }
    }
}

/// Finish the current progress bar (leave final state visible)
pub fn finish_progress_bar() {
    if let Ok(mut state) = TERMINAL_STATE.lock() {
        if let Some(pb) = state.current_progress.take() {
            pb.finish();
        }
    }
}

/// Clear the current progress bar
pub fn clear_progress_bar() {
    if let Ok(mut state) = TERMINAL_STATE.lock() {
        if let Some(pb) = state.current_progress.take() {
            pb.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_lifecycle_without_terminal() {
        start_run_progress(3);
        advance_run_progress("T1 / CAVLC r1");
        advance_run_progress("T1 / CAVLC r2");
        skip_run_progress(1);
        clear_progress_bar();
        // Advancing with no active bar is a no-op.
        advance_run_progress("ignored");
        finish_progress_bar();
    }

    #[test]
    fn test_clear_progress_bar_finishes_active_bar() {
        let bar = start_run_progress(4);
        advance_run_progress("T1 / CAVLC r1");
        clear_progress_bar();
        assert!(bar.is_finished());
    }

    #[test]
    fn test_print_status_handles_any_label_width() {
        print_status("Frames", "300", true);
        print_status("A label wider than the status column", "150.0%", false);
        print_status("CAVLC + dia + p16x16", "n/a", false);
    }

    #[test]
    fn test_progress_style_for_narrow_terminal() {
        let _ = progress_style(40);
        let _ = progress_style(120);
    }
}
