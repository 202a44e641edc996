//! Progress bars for the scenario runs.

use std::thread::{self, JoinHandle};

use crossbeam_channel::Receiver;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::debug;

use mbsim_core::ProgressUpdate;

use crate::ui::is_color_disabled;

const TEMPLATE: &str = "{prefix:>32} [{bar:40.cyan/blue}] {percent:>3}% {elapsed_precise} eta {eta}";
const PLAIN_TEMPLATE: &str = "{prefix:>32} [{bar:40}] {percent:>3}% {elapsed_precise} eta {eta}";

/// One progress bar per scenario, indexed by run index.
pub struct ProgressDisplay {
    multi: MultiProgress,
    bars: Vec<ProgressBar>,
}

impl ProgressDisplay {
    /// Bars drawn on stderr.
    #[must_use]
    pub fn new(labels: &[&str], total_samples: usize) -> Self {
        Self::with_target(ProgressDrawTarget::stderr(), labels, total_samples)
    }

    /// Bars that track progress without drawing.
    #[must_use]
    pub fn hidden(labels: &[&str], total_samples: usize) -> Self {
        Self::with_target(ProgressDrawTarget::hidden(), labels, total_samples)
    }

    fn with_target(target: ProgressDrawTarget, labels: &[&str], total_samples: usize) -> Self {
        let multi = MultiProgress::with_draw_target(target);
        let template = if is_color_disabled() {
            PLAIN_TEMPLATE
        } else {
            TEMPLATE
        };
        let style = ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        let bars = labels
            .iter()
            .map(|label| {
                let bar = multi.add(ProgressBar::new(total_samples as u64));
                bar.set_style(style.clone());
                bar.set_prefix(label.to_string());
                bar
            })
            .collect();
        Self { multi, bars }
    }

    /// Apply one update to its run's bar.
    pub fn apply(&self, update: &ProgressUpdate) {
        let Some(bar) = self.bars.get(update.run_index) else {
            debug!(run = update.run_index, "Progress update for unknown run");
            return;
        };
        bar.set_length(update.total_samples as u64);
        bar.set_position(update.current_sample as u64);
        if update.done {
            bar.finish();
        }
    }

    /// Position of a run's bar.
    #[must_use]
    pub fn position(&self, run_index: usize) -> Option<u64> {
        self.bars.get(run_index).map(ProgressBar::position)
    }

    /// Whether every bar has finished.
    #[must_use]
    pub fn all_finished(&self) -> bool {
        self.bars.iter().all(ProgressBar::is_finished)
    }

    /// Consume updates until every sender is dropped.
    ///
    /// Bars of runs that never reported completion are abandoned in place.
    pub fn drain(self, receiver: &Receiver<ProgressUpdate>) -> Self {
        for update in receiver {
            self.apply(&update);
        }
        for bar in self.bars.iter().filter(|b| !b.is_finished()) {
            bar.abandon();
        }
        self
    }

    /// Drain updates on a background thread.
    pub fn spawn(self, receiver: Receiver<ProgressUpdate>) -> JoinHandle<Self> {
        thread::spawn(move || self.drain(&receiver))
    }

    /// Remove the bars from the terminal.
    pub fn clear(&self) {
        let _ = self.multi.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: [&str; 2] = ["Resting neuron", "Active neuron (depolarized Vm)"];

    #[test]
    fn updates_move_the_matching_bar() {
        let display = ProgressDisplay::hidden(&LABELS, 100);
        display.apply(&ProgressUpdate::new(1, "dopri5", 40, 100));
        assert_eq!(display.position(0), Some(0));
        assert_eq!(display.position(1), Some(40));
        assert!(!display.all_finished());
    }

    #[test]
    fn unknown_run_is_ignored() {
        let display = ProgressDisplay::hidden(&LABELS, 100);
        display.apply(&ProgressUpdate::new(7, "dopri5", 40, 100));
        assert_eq!(display.position(7), None);
    }

    #[test]
    fn done_updates_finish_bars() {
        let display = ProgressDisplay::hidden(&LABELS, 100);
        display.apply(&ProgressUpdate::done(0, "rk4", 100));
        display.apply(&ProgressUpdate::done(1, "rk4", 100));
        assert!(display.all_finished());
        assert_eq!(display.position(0), Some(100));
    }

    #[test]
    fn spawned_display_drains_channel() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let handle = ProgressDisplay::hidden(&LABELS, 50).spawn(rx);
        tx.send(ProgressUpdate::new(0, "dopri5", 25, 50)).unwrap();
        tx.send(ProgressUpdate::done(0, "dopri5", 50)).unwrap();
        tx.send(ProgressUpdate::new(1, "dopri5", 10, 50)).unwrap();
        drop(tx);
        let display = handle.join().unwrap();
        assert_eq!(display.position(0), Some(50));
        assert_eq!(display.position(1), Some(10));
        // The unfinished run is abandoned
        assert!(display.all_finished());
    }
}
