use std::collections::HashMap;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use worldstage_engine::config::EngineConfig;
use worldstage_engine::wheel::{
    default_arcs, default_bands, outcome_for_roll, pick_outcome, zone_probability, WheelZone,
};

const ZONES: [WheelZone; 5] = [
    WheelZone::Negative,
    WheelZone::Positive,
    WheelZone::Neutral,
    WheelZone::Plus50,
    WheelZone::Minus50,
];

#[test]
fn bands_are_contiguous_and_sum_to_hundred() {
    let bands = default_bands();
    let mut lower = 0.0;
    for band in &bands {
        assert!(band.probability > 0.0);
        lower += band.probability;
    }
    assert!((lower - 100.0).abs() < 1e-12);
    assert!(EngineConfig::default().validate().is_ok());
}

#[test]
fn roll_of_ten_lands_in_negative_zone() {
    let bands = default_bands();
    let mut rng = ChaCha20Rng::seed_from_u64(0);
    for _ in 0..50 {
        let r = outcome_for_roll(&bands, 10.0, &mut rng);
        assert_eq!(r.zone, WheelZone::Negative);
        assert!([-5, -10].contains(&r.gain), "unexpected payout {}", r.gain);
        assert_eq!(r.probability, 20.0);
    }
}

#[test]
fn sampled_frequencies_match_configured_probabilities() {
    let bands = default_bands();
    let mut rng = ChaCha20Rng::seed_from_u64(2024);
    let draws = 100_000;
    let mut counts: HashMap<WheelZone, u32> = HashMap::new();
    for _ in 0..draws {
        *counts.entry(pick_outcome(&bands, &mut rng).zone).or_default() += 1;
    }
    for zone in ZONES {
        let expected = zone_probability(&bands, zone);
        let observed = f64::from(counts.get(&zone).copied().unwrap_or(0)) * 100.0 / draws as f64;
        // roughly six standard deviations for each zone
        let sigma = (expected * (100.0 - expected) / draws as f64).sqrt();
        assert!(
            (observed - expected).abs() <= 6.0 * sigma + 0.01,
            "{zone:?}: observed {observed:.3}%, expected {expected}%"
        );
    }
}

#[test]
fn payouts_come_from_the_zone_sets() {
    let bands = default_bands();
    let mut rng = ChaCha20Rng::seed_from_u64(5);
    for _ in 0..10_000 {
        let r = pick_outcome(&bands, &mut rng);
        let allowed: &[i64] = match r.zone {
            WheelZone::Negative => &[-5, -10],
            WheelZone::Positive => &[5, 10],
            WheelZone::Neutral => &[0],
            WheelZone::Plus50 => &[50],
            WheelZone::Minus50 => &[-50],
        };
        assert!(allowed.contains(&r.gain));
    }
}

#[test]
fn face_arcs_tile_the_circle_in_probability_proportion() {
    let bands = default_bands();
    let mut arcs = default_arcs();
    arcs.sort_by(|a, b| a.start.total_cmp(&b.start));
    assert_eq!(arcs.first().unwrap().start, 0.0);
    assert_eq!(arcs.last().unwrap().end, 360.0);
    for w in arcs.windows(2) {
        assert!((w[0].end - w[1].start).abs() < 1e-9, "gap or overlap at {}", w[0].end);
    }
    for zone in ZONES {
        let span: f64 = arcs
            .iter()
            .filter(|a| a.zone == zone)
            .map(|a| a.end - a.start)
            .sum();
        let share = span / 360.0 * 100.0;
        assert!(
            (share - zone_probability(&bands, zone)).abs() < 0.01,
            "{zone:?} covers {share:.3}% of the face"
        );
    }
}
