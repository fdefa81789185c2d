use std::sync::atomic::{AtomicBool, AtomicI16, AtomicUsize, Ordering};

/// Folds per-variant byte progress into one 0-100 figure.
///
/// Emitted values never decrease, 100 is only emitted by [`finish`], and
/// nothing is emitted once the tracker has finished or been terminated.
///
/// [`finish`]: ProgressTracker::finish
pub struct ProgressTracker<F>
where
    F: Fn(u8) + Send + Sync,
{
    total_variants: usize,
    completed: AtomicUsize,
    last: AtomicI16,
    terminated: AtomicBool,
    emit: F,
}

impl<F> ProgressTracker<F>
where
    F: Fn(u8) + Send + Sync,
{
    pub fn new(total_variants: usize, emit: F) -> Self {
        Self {
            total_variants: total_variants.max(1),
            completed: AtomicUsize::new(0),
            last: AtomicI16::new(-1),
            terminated: AtomicBool::new(false),
            emit,
        }
    }

    pub fn start(&self) {
        self.report(0);
    }

    /// Byte progress within the variant currently being uploaded.
    pub fn variant_progress(&self, sent: u64, total: u64) {
        let fraction = if total == 0 {
            1.0
        } else {
            (sent as f64 / total as f64).clamp(0.0, 1.0)
        };
        let completed = self.completed.load(Ordering::SeqCst) as f64;
        let percent = (completed + fraction) / self.total_variants as f64 * 100.0;
        self.report(percent.floor().min(99.0) as u8);
    }

    pub fn variant_done(&self) {
        let completed = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        let percent = completed as f64 / self.total_variants as f64 * 100.0;
        self.report(percent.floor().min(99.0) as u8);
    }

    /// Emit 100 and stop.
    pub fn finish(&self) {
        self.report(100);
        self.terminate();
    }

    /// Stop emitting without reaching 100.
    pub fn terminate(&self) {
        self.terminated.store(true, Ordering::SeqCst);
    }

    pub fn last_reported(&self) -> Option<u8> {
        u8::try_from(self.last.load(Ordering::SeqCst)).ok()
    }

    fn report(&self, percent: u8) {
        if self.terminated.load(Ordering::SeqCst) {
            return;
        }
        let previous = self.last.fetch_max(percent as i16, Ordering::SeqCst);
        if (percent as i16) > previous {
            (self.emit)(percent);
        }
    }
}
