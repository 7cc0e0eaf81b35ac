//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time source (feedback rate limiting)
//! - Browser bindings (wasm32 only)

use std::cell::Cell;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Monotonic time source in seconds
pub trait Clock {
    fn now_secs(&self) -> f64;
}

/// Wall clock for the current platform
#[derive(Debug, Clone)]
pub struct SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    origin: std::time::Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            origin: std::time::Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    fn now_secs(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    // std::time::Instant is unavailable in the browser
    #[cfg(target_arch = "wasm32")]
    fn now_secs(&self) -> f64 {
        js_sys::Date::now() / 1000.0
    }
}

/// Hand-driven clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, secs: f64) {
        self.now.set(secs);
    }

    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> f64 {
        self.now.get()
    }
}

/// Seed for a new session from the platform clock
pub fn entropy_seed() -> u64 {
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5EED)
    }
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Math::random() * u64::MAX as f64) as u64
    }
}
