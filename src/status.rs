//! Throttled progress reporting.
//!
//! A single indicatif spinner shows the current phase and a running detail
//! line (`N files, 12.3 MiB`). Detail updates are rate-limited to the
//! configured interval so a fast walk cannot flood the terminal. Purely an
//! observability side channel - it never affects correctness, and a quiet
//! run simply skips the bar.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// Progress reporter for one scan run.
pub struct ScanStatus {
    bar: Option<ProgressBar>,
    phase: Mutex<String>,
    last_detail: Mutex<Option<Instant>>,
    interval: Duration,
}

impl ScanStatus {
    /// Create a status reporter.
    ///
    /// `interval` throttles detail updates; `quiet` suppresses the spinner
    /// entirely (phase changes are still logged).
    #[must_use]
    pub fn new(interval: Duration, quiet: bool) -> Self {
        let bar = if quiet {
            None
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            Some(pb)
        };
        Self {
            bar,
            phase: Mutex::new(String::from("Starting Scan...")),
            // None lets the first detail through immediately.
            last_detail: Mutex::new(None),
            interval,
        }
    }

    /// Enter a new phase. Phase changes are never throttled.
    pub fn set_phase(&self, label: &str) {
        log::info!("{label}");
        let mut phase = self.phase.lock().unwrap_or_else(|e| e.into_inner());
        label.clone_into(&mut phase);
        if let Some(bar) = &self.bar {
            bar.set_message(label.to_string());
        }
    }

    /// Update the running detail line for the current phase.
    ///
    /// The closure is only invoked when the throttle interval has elapsed,
    /// so per-file callers do not pay formatting costs on every visit.
    pub fn detail<F: FnOnce() -> String>(&self, detail: F) {
        let Some(bar) = &self.bar else { return };
        {
            let mut last = self.last_detail.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(prev) = *last {
                if prev.elapsed() < self.interval {
                    return;
                }
            }
            *last = Some(Instant::now());
        }
        let phase = self.phase.lock().unwrap_or_else(|e| e.into_inner());
        bar.set_message(format!("{}: {}", *phase, detail()));
    }

    /// Stop the live status line. Safe to call more than once.
    pub fn close(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Drop for ScanStatus {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_status_is_inert() {
        let status = ScanStatus::new(Duration::from_secs(5), true);
        status.set_phase("Scan Files");
        status.detail(|| panic!("detail must not be rendered when quiet"));
        status.close();
    }

    #[test]
    fn test_detail_is_throttled() {
        let status = ScanStatus::new(Duration::from_secs(3600), false);
        status.set_phase("Hash Candidates");
        // First update passes, the second lands inside the interval.
        status.detail(|| "1/2 files".to_string());
        status.detail(|| panic!("second detail should be throttled"));
        status.close();
    }

    #[test]
    fn test_close_is_idempotent() {
        let status = ScanStatus::new(Duration::from_secs(1), false);
        status.close();
        status.close();
    }
}
