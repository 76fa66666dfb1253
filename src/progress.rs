use atomic_counter::{AtomicCounter, RelaxedCounter};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// A thread-safe progress bar fed by an atomic counter so that worker threads
/// can tick it without holding a lock. The bar itself is only repositioned
/// every `refresh_every` ticks to keep the draw cost out of the hot loop.
pub struct Bar {
    counter: RelaxedCounter,
    refresh_every: usize,
    pbar: ProgressBar,
}

impl Bar {
    /// Creates a hidden bar with a length, a tick granularity and a prefix.
    pub fn new(len: u64, refresh_every: usize, prefix: String) -> Self {
        let pbar = ProgressBar::hidden();
        pbar.set_length(len);
        pbar.set_prefix(prefix);
        pbar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix}[{bar:40}] [{elapsed_precise}] {percent:>3}%")
                .progress_chars("=>-"),
        );
        Self {
            counter: RelaxedCounter::new(0),
            refresh_every: refresh_every.max(1),
            pbar,
        }
    }

    /// Creates a bar and sets it to draw to stderr.
    pub fn visible(len: u64, refresh_every: usize, prefix: String) -> Self {
        let bar = Self::new(len, refresh_every, prefix);
        bar.pbar.set_draw_target(ProgressDrawTarget::stderr());
        bar
    }

    /// Count one unit of work, repositioning the bar when due.
    pub fn tick(&self) {
        let count = self.counter.inc() + 1;
        if count.rem_euclid(self.refresh_every) == 0 {
            self.pbar.set_position(count as u64);
        }
    }
}

impl Drop for Bar {
    /// clear the bar when the object is dropped
    fn drop(&mut self) {
        if !self.pbar.is_finished() {
            self.pbar.set_position(self.counter.get() as u64);
            self.pbar.finish_and_clear();
        }
    }
}
