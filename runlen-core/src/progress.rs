//! Completion tracking for chunked jobs.
//!
//! The counter lives behind a single mutex together with the bar it drives, so
//! concurrent updates render in the order they are applied and the count can
//! never move backwards.

use std::sync::{Mutex, MutexGuard, PoisonError};

use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str = "[{bar:50}] {percent:>3}% ({pos}/{len} chunks)";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgressState {
    pub total: u64,
    pub completed: u64,
}

struct Inner {
    state: ProgressState,
    bar: ProgressBar,
    finished: bool,
}

pub struct Progress {
    inner: Mutex<Inner>,
}

impl Progress {
    /// Tracker that draws a bar on stderr.
    pub fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("= "),
        );
        Self::with_bar(total, bar)
    }

    /// Same bookkeeping, nothing drawn.
    pub fn hidden(total: u64) -> Self {
        Self::with_bar(total, ProgressBar::hidden())
    }

    fn with_bar(total: u64, bar: ProgressBar) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: ProgressState {
                    total,
                    completed: 0,
                },
                bar,
                finished: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `value` completed units. Stale (smaller) values are ignored and
    /// values past `total` are clamped.
    pub fn update(&self, value: u64) {
        let mut inner = self.lock();
        let value = value.min(inner.state.total);
        if value <= inner.state.completed {
            return;
        }
        inner.state.completed = value;
        inner.bar.set_position(value);
    }

    pub fn snapshot(&self) -> ProgressState {
        self.lock().state
    }

    /// Finish the render. Later calls are no-ops.
    pub fn done(&self) {
        let mut inner = self.lock();
        if !inner.finished {
            inner.finished = true;
            inner.bar.finish();
        }
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        if !inner.finished {
            inner.finished = true;
            inner.bar.abandon();
        }
    }
}
