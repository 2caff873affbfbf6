//! Probability wheel.
//!
//! A spin is decided the moment it starts: a roll in `[0, 100)` selects a
//! band, the band selects a payout, and a display angle inside one of the
//! zone's arcs becomes the rotation target. The result is held back until the
//! spin timer fires so the presentation layer can animate toward the target.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::WheelConfig;
use crate::errors::GameError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WheelZone {
    Negative,
    Positive,
    Neutral,
    Plus50,
    Minus50,
}

/// A slice of the `[0, 100)` roll range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WheelBand {
    pub zone: WheelZone,
    /// Width of the band in percent
    pub probability: f64,
    /// Payouts drawn uniformly once the band is hit
    pub payouts: Vec<i64>,
}

/// An arc of the wheel face in degrees, `start < end`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WheelArc {
    pub zone: WheelZone,
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WheelResult {
    pub gain: i64,
    pub zone: WheelZone,
    /// Total probability of `zone` across all its bands, in percent
    pub probability: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WheelHistoryItem {
    pub id: u64,
    pub spin: u32,
    pub zone: WheelZone,
    pub gain: i64,
    pub probability: f64,
    pub timestamp: DateTime<Utc>,
}

pub fn default_bands() -> Vec<WheelBand> {
    let band = |zone, probability, payouts: &[i64]| WheelBand {
        zone,
        probability,
        payouts: payouts.to_vec(),
    };
    vec![
        band(WheelZone::Negative, 20.0, &[-5, -5, -10, -10]),
        band(WheelZone::Positive, 20.0, &[5, 5, 10, 10]),
        band(WheelZone::Neutral, 48.0, &[0]),
        band(WheelZone::Plus50, 0.5, &[50]),
        band(WheelZone::Minus50, 1.5, &[-50]),
        band(WheelZone::Neutral, 10.0, &[0]),
    ]
}

/// Hand-tuned face layout. Each zone's total arc length is its probability
/// share of 360 degrees; zones are interleaved so the face reads evenly.
pub fn default_arcs() -> Vec<WheelArc> {
    use WheelZone::*;
    const LAYOUT: [(WheelZone, f64, f64); 21] = [
        (Neutral, 0.0, 52.2),
        (Negative, 52.2, 70.2),
        (Positive, 70.2, 86.2),
        (Neutral, 86.2, 130.2),
        (Negative, 130.2, 144.2),
        (Positive, 144.2, 156.2),
        (Neutral, 156.2, 192.2),
        (Negative, 192.2, 204.2),
        (Positive, 204.2, 214.2),
        (Neutral, 214.2, 244.2),
        (Negative, 244.2, 254.2),
        (Positive, 254.2, 268.2),
        (Neutral, 268.2, 293.2),
        (Negative, 293.2, 301.2),
        (Positive, 301.2, 309.2),
        (Neutral, 309.2, 330.8),
        (Negative, 330.8, 340.8),
        (Positive, 340.8, 352.8),
        (Minus50, 352.8, 355.2),
        (Plus50, 355.2, 357.0),
        (Minus50, 357.0, 360.0),
    ];
    LAYOUT
        .iter()
        .map(|&(zone, start, end)| WheelArc { zone, start, end })
        .collect()
}

/// Sum of the probabilities of every band belonging to `zone`.
pub fn zone_probability(bands: &[WheelBand], zone: WheelZone) -> f64 {
    bands
        .iter()
        .filter(|b| b.zone == zone)
        .map(|b| b.probability)
        .sum()
}

/// Maps a roll in `[0, 100)` onto the cumulative bands and draws a payout.
///
/// Rolls beyond the last band (only possible through float rounding) resolve
/// to the last band.
pub fn outcome_for_roll<R: Rng + ?Sized>(bands: &[WheelBand], roll: f64, rng: &mut R) -> WheelResult {
    let mut upper = 0.0;
    let mut hit = bands.last();
    for band in bands {
        upper += band.probability;
        if roll < upper {
            hit = Some(band);
            break;
        }
    }
    match hit {
        Some(band) => {
            let gain = band.payouts[rng.random_range(0..band.payouts.len())];
            WheelResult {
                gain,
                zone: band.zone,
                probability: zone_probability(bands, band.zone),
            }
        }
        None => WheelResult {
            gain: 0,
            zone: WheelZone::Neutral,
            probability: 100.0,
        },
    }
}

pub fn pick_outcome<R: Rng + ?Sized>(bands: &[WheelBand], rng: &mut R) -> WheelResult {
    let roll = rng.random::<f64>() * 100.0;
    outcome_for_roll(bands, roll, rng)
}

/// Uniform angle within the arcs owned by `zone`; longer arcs are proportionally
/// more likely. `None` when the zone owns no arc.
pub fn pick_display_angle<R: Rng + ?Sized>(arcs: &[WheelArc], zone: WheelZone, rng: &mut R) -> Option<f64> {
    let owned: Vec<&WheelArc> = arcs.iter().filter(|a| a.zone == zone).collect();
    let last = *owned.last()?;
    let total: f64 = owned.iter().map(|a| a.end - a.start).sum();
    let mut cursor = rng.random::<f64>() * total;
    for arc in &owned {
        let span = arc.end - arc.start;
        if cursor <= span {
            return Some(arc.start + rng.random::<f64>() * span);
        }
        cursor -= span;
    }
    Some(last.start + rng.random::<f64>() * (last.end - last.start))
}

/// Rotation that lands on `target` (degrees on the face) while only ever
/// turning forward from `current`.
pub fn spin_target(current: f64, target: f64, extra_turns: u32) -> f64 {
    let normalized = current.rem_euclid(360.0);
    let delta = (target - normalized).rem_euclid(360.0);
    current + 360.0 * f64::from(extra_turns) + delta
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpinState {
    Idle,
    /// Result decided, waiting for the settle timer
    Spinning(WheelResult),
}

#[derive(Debug, Clone)]
pub struct Wheel {
    config: WheelConfig,
    angle: f64,
    state: SpinState,
    spins: u32,
    streak: u32,
    last_gain: i64,
    zone: WheelZone,
    zone_probability: f64,
    history: VecDeque<WheelHistoryItem>,
    next_id: u64,
}

impl Wheel {
    pub fn new(config: WheelConfig) -> Self {
        let zone_probability = zone_probability(&config.bands, WheelZone::Neutral);
        Self {
            history: VecDeque::with_capacity(config.history_limit),
            config,
            angle: 0.0,
            state: SpinState::Idle,
            spins: 0,
            streak: 0,
            last_gain: 0,
            zone: WheelZone::Neutral,
            zone_probability,
            next_id: 1,
        }
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.state, SpinState::Spinning(_))
    }

    pub fn state(&self) -> &SpinState {
        &self.state
    }

    /// Current rotation in degrees; grows monotonically.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn spins(&self) -> u32 {
        self.spins
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn last_gain(&self) -> i64 {
        self.last_gain
    }

    pub fn zone(&self) -> WheelZone {
        self.zone
    }

    pub fn zone_probability(&self) -> f64 {
        self.zone_probability
    }

    pub fn spin_delay_ms(&self) -> u64 {
        self.config.spin_delay_ms
    }

    /// Most recent first.
    pub fn history(&self) -> impl Iterator<Item = &WheelHistoryItem> {
        self.history.iter()
    }

    /// Decides the outcome and moves the rotation target. Idle → Spinning.
    pub fn start_spin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<WheelResult, GameError> {
        if self.is_spinning() {
            return Err(GameError::WheelBusy);
        }
        let result = pick_outcome(&self.config.bands, rng);
        let face_angle = pick_display_angle(&self.config.arcs, result.zone, rng)
            .unwrap_or_else(|| self.angle.rem_euclid(360.0));
        self.angle = spin_target(self.angle, face_angle, self.config.extra_turns);
        tracing::debug!(zone = ?result.zone, gain = result.gain, angle = self.angle, "wheel spin started");
        self.state = SpinState::Spinning(result.clone());
        Ok(result)
    }

    /// Spinning → Idle, recording the pending result. `None` when idle.
    pub fn commit(&mut self, now: DateTime<Utc>) -> Option<WheelResult> {
        let result = match std::mem::replace(&mut self.state, SpinState::Idle) {
            SpinState::Spinning(r) => r,
            SpinState::Idle => return None,
        };
        self.spins += 1;
        self.last_gain = result.gain;
        self.zone = result.zone;
        self.zone_probability = result.probability;
        self.streak = if result.gain > 0 { self.streak + 1 } else { 0 };
        self.history.push_front(WheelHistoryItem {
            id: self.next_id,
            spin: self.spins,
            zone: result.zone,
            gain: result.gain,
            probability: result.probability,
            timestamp: now,
        });
        self.next_id += 1;
        self.history.truncate(self.config.history_limit);
        Some(result)
    }

    /// Drops a pending result without recording it.
    pub fn abort(&mut self) {
        if let SpinState::Spinning(r) = std::mem::replace(&mut self.state, SpinState::Idle) {
            tracing::debug!(zone = ?r.zone, "pending wheel result discarded");
        }
    }
}
