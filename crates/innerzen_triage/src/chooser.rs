//! Source of randomness for picking among equivalent replies.

use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

pub trait Chooser: Send + Sync {
    /// Index in `0..len`. Callers never pass `len == 0`.
    fn pick(&self, len: usize) -> usize;
}

/// Uniform choice from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomChooser;

impl Chooser for RandomChooser {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Always picks the same index, wrapped into range. For tests.
#[derive(Debug, Default)]
pub struct FixedChooser {
    index: AtomicUsize,
}

impl FixedChooser {
    pub fn new(index: usize) -> Self {
        Self {
            index: AtomicUsize::new(index),
        }
    }

    pub fn set(&self, index: usize) {
        self.index.store(index, Ordering::Relaxed);
    }
}

impl Chooser for FixedChooser {
    fn pick(&self, len: usize) -> usize {
        self.index.load(Ordering::Relaxed) % len
    }
}

/// Pick one element of a non-empty pool.
pub(crate) fn choose<'a>(chooser: &dyn Chooser, pool: &[&'a str]) -> &'a str {
    pool[chooser.pick(pool.len()) % pool.len()]
}
