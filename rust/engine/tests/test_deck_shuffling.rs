use std::collections::HashSet;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use worldstage_engine::cards::{full_deck, Card};
use worldstage_engine::deck::Deck;
use worldstage_engine::errors::GameError;

#[test]
fn shuffled_deck_has_52_unique_cards() {
    let mut rng = ChaCha20Rng::seed_from_u64(42);
    let mut deck = Deck::shuffled(&mut rng);
    let mut set = HashSet::new();
    for i in 0..52 {
        let c = deck.deal_card().expect("should have 52 cards");
        assert!(set.insert(c), "card {:?} duplicated at position {}", c, i);
    }
    assert!(deck.deal_card().is_none(), "after 52 cards, deck should be empty");
}

#[test]
fn shuffle_is_deterministic_with_same_seed() {
    let mut d1 = Deck::shuffled(&mut ChaCha20Rng::seed_from_u64(12345));
    let mut d2 = Deck::shuffled(&mut ChaCha20Rng::seed_from_u64(12345));
    assert_eq!(d1.deal(52).unwrap(), d2.deal(52).unwrap());
}

#[test]
fn shuffle_differs_with_different_seed() {
    let mut d1 = Deck::shuffled(&mut ChaCha20Rng::seed_from_u64(1));
    let mut d2 = Deck::shuffled(&mut ChaCha20Rng::seed_from_u64(2));
    assert_ne!(
        d1.deal(10).unwrap(),
        d2.deal(10).unwrap(),
        "different seeds should produce different orders (high probability)"
    );
}

#[test]
fn shuffle_actually_permutes() {
    let mut deck = Deck::shuffled(&mut ChaCha20Rng::seed_from_u64(3));
    assert_ne!(deck.deal(52).unwrap(), full_deck());
}

#[test]
fn deal_consumes_front_to_back() {
    let mut deck = Deck::new();
    let first: Vec<Card> = deck.deal(2).unwrap();
    let next: Vec<Card> = deck.deal(3).unwrap();
    assert_eq!(first, full_deck()[..2].to_vec());
    assert_eq!(next, full_deck()[2..5].to_vec());
    assert_eq!(deck.remaining(), 47);
}

#[test]
fn over_dealing_reports_exhaustion_and_keeps_cards() {
    let mut deck = Deck::new();
    deck.deal(50).unwrap();
    assert_eq!(
        deck.deal(3),
        Err(GameError::DeckExhausted {
            requested: 3,
            remaining: 2
        })
    );
    assert_eq!(deck.remaining(), 2);
}

#[test]
fn every_position_receives_every_card_over_many_shuffles() {
    // coarse uniformity check on the first slot
    let mut rng = ChaCha20Rng::seed_from_u64(99);
    let mut seen = HashSet::new();
    for _ in 0..2_000 {
        let mut deck = Deck::shuffled(&mut rng);
        seen.insert(deck.deal_card().unwrap());
    }
    assert_eq!(seen.len(), 52);
}
