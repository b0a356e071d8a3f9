// src/lazy.rs
//! Compute-once storage for lazily generated simulation artefacts.
//!
//! Brownian tensors, path ensembles and experiment results are expensive and
//! are built on first access only. [`Lazily`] wraps a [`OnceLock`] so that
//! concurrent first accesses run the generator exactly once, and records the
//! lifecycle explicitly:
//!
//! ```text
//! Uninitialized ──first access──▶ Generating ──done──▶ Ready
//! ```
//!
//! Once `Ready`, every accessor is a plain read of the cached value.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;

const UNINITIALIZED: u8 = 0;
const GENERATING: u8 = 1;
const READY: u8 = 2;

/// Generation state of a lazily built artefact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Generating,
    Ready,
}

/// A value generated at most once, on first access
pub struct Lazily<T> {
    cell: OnceLock<T>,
    state: AtomicU8,
}

impl<T> Lazily<T> {
    pub fn new() -> Self {
        Self {
            cell: OnceLock::new(),
            state: AtomicU8::new(UNINITIALIZED),
        }
    }

    /// Returns the cached value, running `generate` if this is the first access.
    ///
    /// Callers racing on the first access block until the single generation
    /// finishes; nobody observes a partially built value.
    pub fn get_or_generate<F>(&self, generate: F) -> &T
    where
        F: FnOnce() -> T,
    {
        if let Some(value) = self.cell.get() {
            return value;
        }
        let value = self.cell.get_or_init(|| {
            self.state.store(GENERATING, Ordering::Release);
            generate()
        });
        self.state.store(READY, Ordering::Release);
        value
    }

    /// Returns the value only if it has already been generated.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match self.state.load(Ordering::Acquire) {
            UNINITIALIZED => Lifecycle::Uninitialized,
            GENERATING => Lifecycle::Generating,
            _ => Lifecycle::Ready,
        }
    }
}

impl<T> Default for Lazily<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Lazily<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lazily")
            .field("lifecycle", &self.lifecycle())
            .field("value", &self.cell.get())
            .finish()
    }
}
