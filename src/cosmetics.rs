//! Rocket paint selection
//!
//! Picked once per match. Purely cosmetic: nothing in the simulation reads it.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::sim::rules::GameMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RocketPaint {
    #[default]
    Crimson,
    Cobalt,
    Emerald,
    Amber,
    Violet,
    Ivory,
    Tangerine,
    Teal,
}

impl RocketPaint {
    pub const ALL: [RocketPaint; 8] = [
        RocketPaint::Crimson,
        RocketPaint::Cobalt,
        RocketPaint::Emerald,
        RocketPaint::Amber,
        RocketPaint::Violet,
        RocketPaint::Ivory,
        RocketPaint::Tangerine,
        RocketPaint::Teal,
    ];

    /// Body color (RGBA)
    pub fn color(&self) -> [f32; 4] {
        match self {
            RocketPaint::Crimson => [0.86, 0.15, 0.22, 1.0],
            RocketPaint::Cobalt => [0.18, 0.36, 0.90, 1.0],
            RocketPaint::Emerald => [0.10, 0.75, 0.45, 1.0],
            RocketPaint::Amber => [1.00, 0.75, 0.10, 1.0],
            RocketPaint::Violet => [0.58, 0.30, 0.90, 1.0],
            RocketPaint::Ivory => [0.95, 0.93, 0.86, 1.0],
            RocketPaint::Tangerine => [1.00, 0.50, 0.15, 1.0],
            RocketPaint::Teal => [0.10, 0.70, 0.72, 1.0],
        }
    }
}

/// Paints for both rockets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaintPair {
    pub left: RocketPaint,
    pub right: RocketPaint,
}

/// Cosmetic selection service used at match start
pub trait PaintSelector {
    fn pick(&mut self, mode: GameMode) -> PaintPair;
}

/// Seeded picker: two distinct paints for two-rocket modes, one shared paint otherwise
pub struct PaintPicker {
    rng: Pcg32,
}

impl PaintPicker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl PaintSelector for PaintPicker {
    fn pick(&mut self, mode: GameMode) -> PaintPair {
        let n = RocketPaint::ALL.len();
        let left = self.rng.random_range(0..n);
        if !mode.is_two_rocket() {
            let paint = RocketPaint::ALL[left];
            return PaintPair {
                left: paint,
                right: paint,
            };
        }
        // Draw from the remaining n-1 and skip over the left pick
        let mut right = self.rng.random_range(0..n - 1);
        if right >= left {
            right += 1;
        }
        PaintPair {
            left: RocketPaint::ALL[left],
            right: RocketPaint::ALL[right],
        }
    }
}
