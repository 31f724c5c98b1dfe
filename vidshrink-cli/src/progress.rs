// ============================================================================
// vidshrink-cli/src/progress.rs
// ============================================================================
//
// PROGRESS REPORTING: indicatif bars and spinners for the CLI
//
// Compression progress arrives from the engine as fractions in 0..=1 and is
// shown as a percentage bar. Engine loading and probing get a spinner. Both
// are hidden when stdout is not a terminal or when output must stay
// machine-readable.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const BAR_TEMPLATE: &str = "  Compressing: {percent:>3}% [{bar:30}] ({elapsed})";
const SPINNER_TEMPLATE: &str = "  {spinner} {msg}";

/// Whether progress widgets should be drawn at all.
pub fn progress_visible(machine_output: bool) -> bool {
    !machine_output && console::Term::stdout().is_term()
}

/// Percentage bar fed by engine progress fractions.
///
/// Reported progress never moves backwards; ffmpeg occasionally emits an
/// earlier timestamp after a later one.
pub struct CompressionProgress {
    bar: ProgressBar,
    max_position: u64,
}

impl CompressionProgress {
    pub fn new(visible: bool) -> Self {
        let bar = ProgressBar::new(100);
        if visible {
            bar.set_style(
                ProgressStyle::default_bar()
                    .template(BAR_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("##."),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
        } else {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        Self {
            bar,
            max_position: 0,
        }
    }

    /// Moves the bar to `fraction` of completion.
    pub fn update(&mut self, fraction: f64) {
        let position = fraction_to_percent(fraction);
        if position >= self.max_position {
            self.max_position = position;
            self.bar.set_position(position);
        } else {
            log::trace!("Ignoring backwards progress {position}% < {}%", self.max_position);
        }
    }

    #[must_use]
    pub fn position(&self) -> u64 {
        self.max_position
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Converts a completion fraction to a whole percentage in 0..=100.
pub fn fraction_to_percent(fraction: f64) -> u64 {
    if !fraction.is_finite() {
        return 0;
    }
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u64
}

/// Starts a spinner with `message`; call `finish_and_clear` when done.
pub fn start_spinner(message: &str, visible: bool) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if !visible {
        spinner.set_draw_target(ProgressDrawTarget::hidden());
        return spinner;
    }
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template(SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
