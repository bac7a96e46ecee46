//! Terminal progress for bulk runs.

use indicatif::{ProgressBar, ProgressStyle};

use modeshift_core::{Operation, Outcome, ProgressObserver, TransitionResult};

const TEMPLATE: &str = "{prefix:>14} [{bar:30}] {pos}/{len} {msg}";

/// indicatif bar, hidden under `--quiet` or when stderr is not a terminal.
pub struct BarProgress {
    bar: ProgressBar,
    quiet: bool,
}

impl BarProgress {
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: ProgressBar::hidden(),
            quiet,
        }
    }
}

impl ProgressObserver for BarProgress {
    fn started(&mut self, operation: Operation, total: usize) {
        if self.quiet {
            return;
        }
        let bar = ProgressBar::new(u64::try_from(total).unwrap_or(u64::MAX));
        if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_prefix(operation.to_string());
        self.bar = bar;
    }

    fn advanced(&mut self, _index: usize, result: &TransitionResult) {
        let label = result.device.label();
        if matches!(result.outcome, Outcome::Failed) {
            self.bar.println(format!(
                "  failed: {label}: {}",
                result.detail.as_deref().unwrap_or("unknown error")
            ));
        }
        self.bar.set_message(format!("{label} {}", result.outcome));
        self.bar.inc(1);
    }

    fn finished(&mut self) {
        self.bar.finish_and_clear();
    }
}
