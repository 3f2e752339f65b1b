//! Terminal progress reporting

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use vignette_application::{ExtractionPhase, ProgressNotifier};
use vignette_domain::ExtractorId;

/// Spinner-based progress display for interactive runs.
///
/// Phases run strictly one after another, so a single active bar is
/// enough; the mutex only guards against the notifier trait's `Sync`
/// requirement.
pub struct ProgressReporter {
    active: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            active: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.cyan} {msg} [{pos}/{len}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: &ExtractionPhase, total_tasks: usize) {
        let bar = ProgressBar::new(total_tasks as u64);
        bar.set_style(Self::style());
        bar.set_message(phase.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        let mut active = self.active.lock().expect("progress lock poisoned");
        *active = Some(bar);
    }

    fn on_engine_complete(&self, _phase: &ExtractionPhase, engine: &ExtractorId, success: bool) {
        let active = self.active.lock().expect("progress lock poisoned");
        if let Some(bar) = active.as_ref() {
            bar.inc(1);
            if !success {
                bar.println(format!("engine {} dropped from this request", engine));
            }
        }
    }

    fn on_phase_complete(&self, _phase: &ExtractionPhase) {
        let mut active = self.active.lock().expect("progress lock poisoned");
        if let Some(bar) = active.take() {
            bar.finish_and_clear();
        }
    }
}
