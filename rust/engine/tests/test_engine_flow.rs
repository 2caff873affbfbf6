use chrono::{DateTime, Duration, Utc};
use worldstage_engine::cards::{Card, Rank, Suit};
use worldstage_engine::clock::ManualClock;
use worldstage_engine::config::{EngineConfig, FortuneConfig};
use worldstage_engine::deck::Deck;
use worldstage_engine::engine::Engine;
use worldstage_engine::errors::GameError;
use worldstage_engine::fortune::{compose_key, profile_from_seed, seed_from, FortuneKey, Zodiac};
use worldstage_engine::hand::Category;
use worldstage_engine::ledger::ScoreSource;
use worldstage_engine::logging::TestLogSubscriber;
use worldstage_engine::snapshot::HIDDEN_CARD;
use worldstage_engine::texas::Outcome;

// 2027-01-15T08:00:00Z, the first second of a jackpot cycle
const START: i64 = 1_800_000_000;

fn start() -> DateTime<Utc> {
    DateTime::from_timestamp(START, 0).unwrap()
}

fn seeded_engine(seed: u64) -> (Engine, ManualClock) {
    let clock = ManualClock::new(start());
    let config = EngineConfig {
        seed: Some(seed),
        ..EngineConfig::default()
    };
    let engine = Engine::with_clock(config, Box::new(clock.clone())).unwrap();
    (engine, clock)
}

fn c(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, suit)
}

/// Player A♠ K♠, opponents 2♣ 3♦ and 4♥ 7♣, board Q♠ J♠ 10♠ 9♥ 2♦.
fn royal_flush_deck() -> Deck {
    Deck::from_cards(vec![
        c(Rank::Ace, Suit::Spades),
        c(Rank::King, Suit::Spades),
        c(Rank::Two, Suit::Clubs),
        c(Rank::Three, Suit::Diamonds),
        c(Rank::Four, Suit::Hearts),
        c(Rank::Seven, Suit::Clubs),
        c(Rank::Queen, Suit::Spades),
        c(Rank::Jack, Suit::Spades),
        c(Rank::Ten, Suit::Spades),
        c(Rank::Nine, Suit::Hearts),
        c(Rank::Two, Suit::Diamonds),
    ])
}

#[test]
fn stacked_royal_flush_wins_the_showdown() {
    let (mut engine, _clock) = seeded_engine(1);
    engine.deal_poker_from(royal_flush_deck()).unwrap();

    let before = engine.snapshot();
    assert_eq!(before.texas.player_cards, vec!["A♠", "K♠"]);
    assert_eq!(before.texas.board_cards, vec!["Q♠", "J♠", "10♠", "9♥", "2♦"]);
    for hole in &before.texas.opponents {
        assert_eq!(hole, &vec![HIDDEN_CARD.to_string(); 2]);
    }
    assert!(before.texas.can_reveal);
    assert_eq!(before.texas.outcome, Outcome::Pending);

    let showdown = engine.reveal_poker().unwrap().clone();
    assert_eq!(showdown.player.category, Category::StraightFlush);
    assert_eq!(showdown.player.rank_level(), 9);
    assert_eq!(showdown.outcome, Outcome::Win);
    assert_eq!(showdown.applied_gain, 106);
    assert_eq!(engine.total_score(), 106);

    let after = engine.snapshot();
    assert_eq!(after.texas.opponents[0], vec!["2♣", "3♦"]);
    assert_eq!(after.texas.opponents[1], vec!["4♥", "7♣"]);
    assert_eq!(after.texas.hand_code, Some(Category::StraightFlush));
    assert!(!after.texas.can_reveal);
}

#[test]
fn reveal_requires_a_fresh_deal() {
    let (mut engine, _clock) = seeded_engine(2);
    assert_eq!(engine.reveal_poker().unwrap_err(), GameError::NoRoundDealt);

    engine.deal_poker().unwrap();
    engine.reveal_poker().unwrap();
    let total = engine.total_score();
    assert_eq!(engine.reveal_poker().unwrap_err(), GameError::RoundAlreadyRevealed);
    assert_eq!(engine.total_score(), total);
    assert_eq!(engine.ledger().history().count(), 1);

    engine.deal_poker().unwrap();
    assert!(engine.texas().can_reveal());
    assert_eq!(engine.texas().hands(), 2);
}

#[test]
fn dealt_cards_are_distinct() {
    let (mut engine, _clock) = seeded_engine(3);
    for _ in 0..50 {
        let round = engine.deal_poker().unwrap().clone();
        let mut all: Vec<Card> = round.player.to_vec();
        all.extend(round.board);
        for hole in &round.opponents {
            all.extend(hole);
        }
        assert_eq!(all.len(), 11);
        let mut unique = all.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), all.len());
    }
}

#[test]
fn texas_losses_stop_at_the_floor() {
    let clock = ManualClock::new(start());
    let mut config = EngineConfig {
        seed: Some(4),
        ..EngineConfig::default()
    };
    config.ledger.initial_total = -118;
    let mut engine = Engine::with_clock(config, Box::new(clock)).unwrap();
    for _ in 0..40 {
        engine.deal_poker().unwrap();
        engine.reveal_poker().unwrap();
        assert!(engine.total_score() >= -120);
    }
}

#[test]
fn wheel_settles_exactly_at_the_deadline() {
    let (mut engine, clock) = seeded_engine(5);
    let result = engine.spin_wheel().unwrap();
    assert!(engine.wheel().is_spinning());
    assert_eq!(engine.spin_wheel().unwrap_err(), GameError::WheelBusy);
    assert_eq!(engine.pending_timers(), 1);

    clock.advance(Duration::milliseconds(959));
    assert_eq!(engine.tick(), 0);
    assert!(engine.wheel().is_spinning());
    assert_eq!(engine.wheel().spins(), 0);
    assert_eq!(engine.total_score(), 0);

    clock.advance(Duration::milliseconds(1));
    assert_eq!(engine.tick(), 1);
    assert!(!engine.wheel().is_spinning());
    assert_eq!(engine.wheel().spins(), 1);
    assert_eq!(engine.wheel().last_gain(), result.gain);
    assert_eq!(engine.wheel().zone(), result.zone);
    assert_eq!(engine.total_score(), result.gain);

    let rec = engine.ledger().latest().unwrap();
    assert_eq!(rec.source, ScoreSource::Wheel);
    assert_eq!(rec.timestamp, start() + Duration::milliseconds(960));
}

#[test]
fn wheel_angle_only_moves_forward() {
    let (mut engine, clock) = seeded_engine(6);
    let mut angle = engine.wheel().angle();
    let mut expected_total = 0;
    for _ in 0..30 {
        let result = engine.spin_wheel().unwrap();
        assert!(engine.wheel().angle() > angle);
        angle = engine.wheel().angle();
        clock.advance(Duration::seconds(1));
        engine.tick();
        expected_total += result.gain;
    }
    assert_eq!(engine.total_score(), expected_total);
    assert_eq!(engine.wheel().spins(), 30);
    let spins: Vec<u32> = engine.wheel().history().map(|h| h.spin).collect();
    assert_eq!(spins.len(), 24);
    assert_eq!(spins[0], 30);
}

#[test]
fn shutdown_drops_the_pending_spin() {
    let (mut engine, clock) = seeded_engine(7);
    engine.spin_wheel().unwrap();
    engine.shutdown();
    assert_eq!(engine.pending_timers(), 0);
    assert!(!engine.wheel().is_spinning());

    clock.advance(Duration::seconds(5));
    assert_eq!(engine.tick(), 0);
    assert_eq!(engine.wheel().spins(), 0);
    assert_eq!(engine.total_score(), 0);
    assert_eq!(engine.ledger().history().count(), 0);
}

#[test]
fn birthday_fortune_books_its_gain() {
    let (mut engine, _clock) = seeded_engine(8);
    let key = FortuneKey::Birthday("1990-05-17".into());
    let composed = compose_key(&key, start().date_naive()).unwrap();
    let expected = profile_from_seed(seed_from(&composed), &FortuneConfig::default());

    let profile = engine.generate_fortune(&key).unwrap().clone();
    assert_eq!(profile, expected);
    assert!(profile.ready);
    assert_eq!(engine.total_score(), expected.last_gain);
    assert_eq!(engine.ledger().latest().unwrap().source, ScoreSource::Fortune);
}

#[test]
fn malformed_birthday_clears_the_profile_and_keeps_the_score() {
    let (mut engine, _clock) = seeded_engine(9);
    engine
        .generate_fortune(&FortuneKey::Birthday("1990-05-17".into()))
        .unwrap();
    let total = engine.total_score();

    let err = engine
        .generate_fortune(&FortuneKey::Birthday("17/05/1990".into()))
        .unwrap_err();
    assert!(matches!(err, GameError::InvalidFortuneKey(_)));
    assert!(!engine.fortune().ready);
    assert_eq!(engine.total_score(), total);
}

#[test]
fn zodiac_choice_locks_the_fortune() {
    let (mut engine, _clock) = seeded_engine(10);
    let first = engine
        .generate_fortune(&FortuneKey::Zodiac(Zodiac::Pisces))
        .unwrap()
        .clone();
    let total = engine.total_score();
    assert_eq!(first.locked, Some(Zodiac::Pisces));

    for key in [
        FortuneKey::Zodiac(Zodiac::Aries),
        FortuneKey::Birthday("2000-01-01".into()),
    ] {
        assert_eq!(engine.generate_fortune(&key).unwrap_err(), GameError::FortuneLocked);
    }
    assert_eq!(engine.fortune(), &first);
    assert_eq!(engine.total_score(), total);
}

#[test]
fn jackpot_is_boosted_while_the_window_is_open() {
    let (mut engine, clock) = seeded_engine(11);
    let phase = engine.jackpot_phase();
    assert!(phase.window_open);
    assert_eq!(phase.countdown, 12);

    let gain = engine.play_jackpot();
    assert!((81..=218).contains(&gain), "open roll {gain}");
    assert_eq!(engine.jackpot_last_gain(), gain);
    assert_eq!(engine.total_score(), gain);

    clock.advance(Duration::seconds(30));
    let phase = engine.jackpot_phase();
    assert!(!phase.window_open);
    assert_eq!(phase.countdown, 30);
    let closed = engine.play_jackpot();
    assert!((20..=82).contains(&closed), "closed roll {closed}");
    assert_eq!(engine.total_score(), gain + closed);
}

#[test]
fn same_seed_plays_the_same_session() {
    let play = |seed| {
        let (mut engine, clock) = seeded_engine(seed);
        engine.deal_poker().unwrap();
        engine.reveal_poker().unwrap();
        engine.spin_wheel().unwrap();
        clock.advance(Duration::seconds(1));
        engine.tick();
        engine.place_stone(40).unwrap();
        engine.play_jackpot();
        engine.snapshot()
    };
    assert_eq!(play(99), play(99));
}

#[test]
fn snapshot_serializes_for_the_presentation_layer() {
    let (mut engine, _clock) = seeded_engine(12);
    engine.deal_poker_from(royal_flush_deck()).unwrap();
    engine.reveal_poker().unwrap();
    engine.place_stone(0).unwrap();

    let json = engine.snapshot().to_json().unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["total_score"], 106);
    assert_eq!(v["texas"]["outcome"], "win");
    assert_eq!(v["texas"]["hand_code"], "straight_flush");
    assert_eq!(v["score_history"][0]["source"], "texas");
    assert_eq!(v["board"]["cells"][0], "black");
    assert_eq!(v["board"]["current_player"], "black");
    assert_eq!(v["wheel"]["zone"], "neutral");
    assert_eq!(v["fortune"]["ready"], false);
    assert_eq!(v["jackpot"]["window_open"], true);
}

#[test]
fn showdown_is_logged_with_its_source() {
    let (mut engine, _clock) = seeded_engine(13);
    engine.deal_poker_from(royal_flush_deck()).unwrap();

    let logs = TestLogSubscriber::new();
    let applied = logs.capture(|| engine.reveal_poker().map(|s| s.applied_gain));
    assert_eq!(applied, Ok(106));

    let scored = logs.find("score applied");
    assert_eq!(scored.len(), 1);
    assert_eq!(scored[0].field("source"), Some("Texas"));
    assert_eq!(scored[0].field("applied_gain"), Some("106"));
    assert_eq!(logs.find("texas showdown").len(), 1);
}

#[test]
fn invalid_config_is_refused() {
    let mut config = EngineConfig::default();
    config.board.ai = "oracle".into();
    assert!(Engine::new(config).is_err());
}
