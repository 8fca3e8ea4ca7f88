//! Operator-facing progress output.
//!
//! Converters report through the `Ui` trait so the pipeline runs the
//! same against a console or silently in tests and embedding.

use indicatif::{ProgressBar, ProgressStyle};

/// Pipeline phases shown to the operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Connecting,
    Clearing,
    Converting,
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Connecting => write!(f, "Connecting"),
            Phase::Clearing => write!(f, "Clearing destination"),
            Phase::Converting => write!(f, "Converting"),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

/// Trait for UI implementations - allows both real console output and
/// silent/test modes.
pub trait Ui {
    fn set_phase(&mut self, phase: Phase);
    fn set_progress(&mut self, current: u64, total: u64, label: &str);
    fn clear_progress(&mut self);
    fn log(&mut self, message: &str);
    /// Per-row detail, shown only in verbose mode.
    fn trace(&mut self, message: &str);
}

/// Console implementation with an indicatif progress bar.
pub struct ConsoleUi {
    verbose: bool,
    bar: Option<ProgressBar>,
}

impl ConsoleUi {
    pub fn new(verbose: bool) -> Self {
        Self { verbose, bar: None }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{msg:30} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap()
            .progress_chars("=>-")
    }
}

impl Ui for ConsoleUi {
    fn set_phase(&mut self, phase: Phase) {
        self.clear_progress();
        println!("{}...", phase);
    }

    fn set_progress(&mut self, current: u64, total: u64, label: &str) {
        let bar = self.bar.get_or_insert_with(|| {
            let bar = ProgressBar::new(total);
            bar.set_style(Self::bar_style());
            bar
        });
        if bar.length() != Some(total) {
            bar.set_length(total);
        }
        bar.set_message(label.to_string());
        bar.set_position(current);
    }

    fn clear_progress(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn log(&mut self, message: &str) {
        match &self.bar {
            Some(bar) => bar.println(message),
            None => println!("{}", message),
        }
    }

    fn trace(&mut self, message: &str) {
        if self.verbose {
            self.log(message);
        }
    }
}

/// Silent UI implementation for testing and non-interactive use.
#[derive(Default)]
pub struct SilentUi;

impl SilentUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, _phase: Phase) {}
    fn set_progress(&mut self, _current: u64, _total: u64, _label: &str) {}
    fn clear_progress(&mut self) {}
    fn log(&mut self, _message: &str) {}
    fn trace(&mut self, _message: &str) {}
}
