//! Cosmetic progress indicator shown while a zip batch is being refactored
//!
//! The server gives no progress information, so this is a synthetic
//! percentage paired with a rotating phase label. It is thrown away as soon
//! as the batch call resolves.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

/// Status messages cycled through while waiting
pub const ZIP_PHASES: [&str; 5] = [
    "Analyzing files...",
    "Refactoring code...",
    "Optimizing imports...",
    "Improving naming...",
    "Finalizing...",
];

pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(400);
pub const PHASE_INTERVAL: Duration = Duration::from_millis(1200);

/// Synthetic progress + phase label ticker
#[derive(Debug)]
pub struct ZipProgressTicker {
    percent: f64,
    phase_index: usize,
    next_progress: Instant,
    next_phase: Instant,
    rng: StdRng,
}

impl ZipProgressTicker {
    pub fn new(now: Instant) -> Self {
        Self::with_rng(now, StdRng::from_entropy())
    }

    pub fn with_seed(now: Instant, seed: u64) -> Self {
        Self::with_rng(now, StdRng::seed_from_u64(seed))
    }

    fn with_rng(now: Instant, rng: StdRng) -> Self {
        Self {
            percent: 0.0,
            phase_index: 0,
            next_progress: now + PROGRESS_INTERVAL,
            next_phase: now + PHASE_INTERVAL,
            rng,
        }
    }

    /// Apply every progress step and phase rotation due by `now`
    pub fn tick(&mut self, now: Instant) {
        while self.next_progress <= now {
            if self.percent < 100.0 {
                let step = self.rng.gen_range(2.0..9.0);
                self.percent = (self.percent + step).min(100.0);
            }
            self.next_progress += PROGRESS_INTERVAL;
        }

        while self.next_phase <= now {
            self.phase_index = (self.phase_index + 1) % ZIP_PHASES.len();
            self.next_phase += PHASE_INTERVAL;
        }
    }

    pub fn percent(&self) -> u8 {
        self.percent.floor() as u8
    }

    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    pub fn phase_label(&self) -> &'static str {
        ZIP_PHASES[self.phase_index]
    }
}
