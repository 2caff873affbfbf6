//! Timed bonus roll. Every cycle opens with a short window during which the
//! roll is boosted.

use rand::Rng;
use serde::Serialize;

use crate::config::JackpotConfig;
use crate::ledger::round_score;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub struct JackpotPhase {
    pub window_open: bool,
    /// Seconds until the window closes (open) or reopens (closed)
    pub countdown: u32,
}

pub fn phase_at(unix_seconds: i64, config: &JackpotConfig) -> JackpotPhase {
    let cycle = i64::from(config.cycle_seconds);
    let window = i64::from(config.window_seconds);
    let phase = unix_seconds.rem_euclid(cycle);
    if phase < window {
        JackpotPhase {
            window_open: true,
            countdown: (window - phase) as u32,
        }
    } else {
        JackpotPhase {
            window_open: false,
            countdown: (cycle - phase) as u32,
        }
    }
}

/// Rolls a bonus. `fortune_overall` is the overall score of a ready fortune
/// profile, if there is one.
pub fn roll_gain<R: Rng + ?Sized>(
    rng: &mut R,
    phase: JackpotPhase,
    fortune_overall: Option<u32>,
    config: &JackpotConfig,
) -> i64 {
    let base = rng.random_range(20..=48);
    let wheel_boost = rng.random_range(0..=18);
    let fortune_boost = fortune_overall
        .map(|o| round_score(f64::from(o) / 6.0))
        .unwrap_or(0);
    let (phase_boost, multiplier) = if phase.window_open {
        (rng.random_range(38..=90), config.open_multiplier)
    } else {
        (rng.random_range(0..=16), 1.0)
    };
    round_score((base + wheel_boost + fortune_boost + phase_boost) as f64 * multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn window_opens_at_cycle_start() {
        let cfg = JackpotConfig::default();
        assert_eq!(
            phase_at(120, &cfg),
            JackpotPhase { window_open: true, countdown: 12 }
        );
        assert_eq!(
            phase_at(131, &cfg),
            JackpotPhase { window_open: true, countdown: 1 }
        );
        assert_eq!(
            phase_at(132, &cfg),
            JackpotPhase { window_open: false, countdown: 48 }
        );
        assert_eq!(
            phase_at(179, &cfg),
            JackpotPhase { window_open: false, countdown: 1 }
        );
    }

    #[test]
    fn rolls_stay_within_bounds() {
        let cfg = JackpotConfig::default();
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let open = JackpotPhase { window_open: true, countdown: 5 };
        let closed = JackpotPhase { window_open: false, countdown: 30 };
        for _ in 0..1_000 {
            let g = roll_gain(&mut rng, closed, None, &cfg);
            assert!((20..=82).contains(&g), "closed roll {g}");
            let g = roll_gain(&mut rng, open, Some(90), &cfg);
            // (20 + 0 + 15 + 38) * 1.4 ..= (48 + 18 + 15 + 90) * 1.4
            assert!((102..=239).contains(&g), "open roll {g}");
        }
    }
}
