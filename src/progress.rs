// src/progress.rs

//! Progress reporting and cooperative cancellation.
//!
//! The pipeline depends only on [`ProgressReporter`]; the CLI picks one of
//! the two implementations at startup. Cancellation is advisory: the flag is
//! polled between units of work and a unit already in flight completes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use indicatif::{ProgressBar, ProgressStyle};

/// Shared stop signal, set by the Ctrl-C handler.
pub type CancelFlag = Arc<AtomicBool>;

/// Create an unset cancellation flag.
pub fn cancel_flag() -> CancelFlag {
    Arc::new(AtomicBool::new(false))
}

/// Polymorphic progress/cancellation surface.
pub trait ProgressReporter: Send + Sync {
    /// Begin a new stage of `total` units.
    fn start(&self, total: u64, unit: &str);

    /// Describe the unit currently being processed.
    fn set_description(&self, desc: &str);

    /// Advance the current stage by `n` units.
    fn advance(&self, n: u64);

    /// Emit a message above the progress display.
    fn announce(&self, message: &str);

    /// Close out the current stage.
    fn finish(&self);

    /// False once cancellation has been requested.
    fn is_running(&self) -> bool;
}

/// Reporter that logs stage transitions and stays quiet otherwise.
///
/// Used in verbose mode, where per-fetch log lines replace the bar.
pub struct SilentReporter {
    cancelled: CancelFlag,
}

impl SilentReporter {
    pub fn new(cancelled: CancelFlag) -> Self {
        Self { cancelled }
    }
}

impl ProgressReporter for SilentReporter {
    fn start(&self, total: u64, unit: &str) {
        log::info!("Starting stage: {} {}", total, unit);
    }

    fn set_description(&self, desc: &str) {
        log::debug!("Processing: {}", desc);
    }

    fn advance(&self, _n: u64) {}

    fn announce(&self, message: &str) {
        log::info!("{}", message);
    }

    fn finish(&self) {}

    fn is_running(&self) -> bool {
        !self.cancelled.load(Ordering::Relaxed)
    }
}

/// Interactive terminal reporter backed by an indicatif bar.
pub struct ConsoleReporter {
    bar: Mutex<Option<ProgressBar>>,
    cancelled: CancelFlag,
}

impl ConsoleReporter {
    pub fn new(cancelled: CancelFlag) -> Self {
        Self {
            bar: Mutex::new(None),
            cancelled,
        }
    }

    fn style(unit: &str) -> ProgressStyle {
        let template =
            format!("{{spinner:.green}} [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {unit} {{msg}}");
        ProgressStyle::default_bar()
            .template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
    }
}

impl ProgressReporter for ConsoleReporter {
    fn start(&self, total: u64, unit: &str) {
        let pb = ProgressBar::new(total);
        pb.set_style(Self::style(unit));
        *self.bar.lock().unwrap() = Some(pb);
    }

    fn set_description(&self, desc: &str) {
        if let Some(pb) = self.bar.lock().unwrap().as_ref() {
            pb.set_message(desc.to_string());
        }
    }

    fn advance(&self, n: u64) {
        if let Some(pb) = self.bar.lock().unwrap().as_ref() {
            pb.inc(n);
        }
    }

    fn announce(&self, message: &str) {
        match self.bar.lock().unwrap().as_ref() {
            Some(pb) => pb.println(message),
            None => log::info!("{}", message),
        }
    }

    fn finish(&self) {
        if let Some(pb) = self.bar.lock().unwrap().take() {
            pb.finish_and_clear();
        }
    }

    fn is_running(&self) -> bool {
        !self.cancelled.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_reporter_honors_cancel_flag() {
        let flag = cancel_flag();
        let reporter = SilentReporter::new(Arc::clone(&flag));
        assert!(reporter.is_running());

        flag.store(true, Ordering::Relaxed);
        assert!(!reporter.is_running());
    }

    #[test]
    fn console_reporter_stage_lifecycle() {
        let reporter = ConsoleReporter::new(cancel_flag());
        reporter.start(10, "talks");
        reporter.set_description("A Talk");
        reporter.advance(3);
        reporter.finish();
        assert!(reporter.is_running());
    }
}
