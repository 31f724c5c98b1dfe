// ============================================================================
// vidshrink-cli/src/output.rs
// ============================================================================
//
// TERMINAL OUTPUT: UI Components and Styling
//
// Reports go to stdout through these helpers; diagnostics go to stderr
// through the logger. Color is applied with owo-colors and switched off
// globally when the terminal does not support it or --no-color is given.
//
// KEY COMPONENTS:
// - styling: symbols and indentation
// - print_section / print_status / print_success / print_warning / print_error

use owo_colors::OwoColorize;
use std::sync::atomic::{AtomicBool, Ordering};

// ============================================================================
// STYLING CONSTANTS
// ============================================================================

/// Styling constants for terminal output
pub mod styling {
    pub const SUCCESS_SYMBOL: &str = "✓";
    pub const WARNING_SYMBOL: &str = "!";
    pub const PROCESSING_SYMBOL: &str = "»";
    pub const ERROR_SYMBOL: &str = "✗";

    pub const SECTION_PREFIX: &str = "===== ";
    pub const SECTION_SUFFIX: &str = " =====";

    pub const STATUS_INDENT: &str = "  ";
    pub const STATUS_LABEL_WIDTH: usize = 15;
}

// ============================================================================
// COLOR CONTROL
// ============================================================================

static USE_COLOR: AtomicBool = AtomicBool::new(true);

/// Set whether to use color in terminal output
pub fn set_color(enable: bool) {
    USE_COLOR.store(enable, Ordering::Relaxed);
}

fn should_use_color() -> bool {
    USE_COLOR.load(Ordering::Relaxed)
}

// ============================================================================
// TERMINAL COMPONENTS
// ============================================================================

/// Formats a `label: value` line with the label padded to a fixed width.
pub fn format_status(label: &str, value: &str) -> String {
    let padding = styling::STATUS_LABEL_WIDTH.saturating_sub(label.len()).max(1);
    format!("{}{}:{}{}", styling::STATUS_INDENT, label, " ".repeat(padding), value)
}

/// Print a section header
pub fn print_section(title: &str) {
    println!();
    if should_use_color() {
        println!(
            "{}{}{}",
            styling::SECTION_PREFIX,
            title.to_uppercase().cyan().bold(),
            styling::SECTION_SUFFIX
        );
    } else {
        println!(
            "{}{}{}",
            styling::SECTION_PREFIX,
            title.to_uppercase(),
            styling::SECTION_SUFFIX
        );
    }
    println!();
}

/// Print a status line (key-value pair), bold when `highlight` is set
pub fn print_status(label: &str, value: &str, highlight: bool) {
    if should_use_color() && highlight {
        println!("{}", format_status(label, &value.bold().to_string()));
    } else {
        println!("{}", format_status(label, value));
    }
}

/// Print a processing step
pub fn print_processing(message: &str) {
    if should_use_color() {
        println!("{}{} {}", styling::STATUS_INDENT, styling::PROCESSING_SYMBOL, message.bold());
    } else {
        println!("{}{} {}", styling::STATUS_INDENT, styling::PROCESSING_SYMBOL, message);
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    if should_use_color() {
        println!("{}{} {}", styling::STATUS_INDENT, styling::SUCCESS_SYMBOL.green(), message);
    } else {
        println!("{}{} {}", styling::STATUS_INDENT, styling::SUCCESS_SYMBOL, message);
    }
}

/// Print a non-fatal warning
pub fn print_warning(message: &str) {
    if should_use_color() {
        println!("{}{} {}", styling::STATUS_INDENT, styling::WARNING_SYMBOL.yellow().bold(), message.yellow());
    } else {
        println!("{}{} {}", styling::STATUS_INDENT, styling::WARNING_SYMBOL, message);
    }
}

/// Print an error with an optional suggestion to stderr
pub fn print_error(title: &str, message: &str, suggestion: Option<&str>) {
    if should_use_color() {
        eprintln!("{} {}", styling::ERROR_SYMBOL.red(), title.red().bold());
    } else {
        eprintln!("{} {}", styling::ERROR_SYMBOL, title);
    }
    eprintln!("  Message:    {message}");
    if let Some(suggestion) = suggestion {
        eprintln!("  Suggestion: {suggestion}");
    }
}

/// Print an ffmpeg command line, dimmed
pub fn print_command(command: &str) {
    if should_use_color() {
        println!("{}{}", styling::STATUS_INDENT, command.dimmed());
    } else {
        println!("{}{}", styling::STATUS_INDENT, command);
    }
}
