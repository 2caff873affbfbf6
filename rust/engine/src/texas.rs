use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::config::TexasConfig;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::hand::{best_with_board, compare_hands, Category, HandScore};
use crate::ledger::{round_score, ScoreLedger, ScoreSource};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pending,
    Win,
    Lose,
    Tie,
}

/// Cards of one hand, from deal to reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TexasRound {
    pub player: [Card; 2],
    pub board: [Card; 5],
    pub opponents: Vec<[Card; 2]>,
}

impl TexasRound {
    /// Deals the player, then each opponent, then the board.
    pub fn deal(deck: &mut Deck, opponents: usize) -> Result<Self, GameError> {
        let needed = 2 * (1 + opponents) + 5;
        if deck.remaining() < needed {
            return Err(GameError::DeckExhausted {
                requested: needed,
                remaining: deck.remaining(),
            });
        }
        let player = pair(deck)?;
        let opponents = (0..opponents)
            .map(|_| pair(deck))
            .collect::<Result<Vec<_>, _>>()?;
        let b = deck.deal(5)?;
        Ok(Self {
            player,
            board: [b[0], b[1], b[2], b[3], b[4]],
            opponents,
        })
    }
}

fn pair(deck: &mut Deck) -> Result<[Card; 2], GameError> {
    let c = deck.deal(2)?;
    Ok([c[0], c[1]])
}

/// Showdown of the player's best hand against every opponent's best hand.
pub fn resolve_showdown(player: &HandScore, opponents: &[HandScore]) -> Outcome {
    let mut tie = false;
    for opp in opponents {
        match compare_hands(opp, player) {
            Ordering::Greater => return Outcome::Lose,
            Ordering::Equal => tie = true,
            Ordering::Less => {}
        }
    }
    if tie {
        Outcome::Tie
    } else {
        Outcome::Win
    }
}

/// Base gain × outcome multiplier, rounded, then pushed away from zero to at
/// least `min_gain` in the outcome's direction.
pub fn showdown_gain(category: Category, outcome: Outcome, config: &TexasConfig) -> i64 {
    let base = config.base_gains.for_category(category) as f64;
    let multiplier = match outcome {
        Outcome::Win => config.win_multiplier,
        Outcome::Tie => config.tie_multiplier,
        Outcome::Lose => config.lose_multiplier,
        Outcome::Pending => return 0,
    };
    let gain = round_score(base * multiplier);
    match outcome {
        Outcome::Lose => gain.min(-config.min_gain),
        _ => gain.max(config.min_gain),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Showdown {
    pub player: HandScore,
    pub opponents: Vec<HandScore>,
    pub outcome: Outcome,
    /// Delta requested from the ledger
    pub base_gain: i64,
    /// Delta the ledger applied after the floor
    pub applied_gain: i64,
}

#[derive(Debug, Clone)]
pub struct TexasTable {
    config: TexasConfig,
    round: Option<TexasRound>,
    showdown: Option<Showdown>,
    hands: u32,
}

impl TexasTable {
    pub fn new(config: TexasConfig) -> Self {
        Self {
            config,
            round: None,
            showdown: None,
            hands: 0,
        }
    }

    pub fn round(&self) -> Option<&TexasRound> {
        self.round.as_ref()
    }

    pub fn showdown(&self) -> Option<&Showdown> {
        self.showdown.as_ref()
    }

    pub fn hands(&self) -> u32 {
        self.hands
    }

    pub fn can_reveal(&self) -> bool {
        self.round.is_some() && self.showdown.is_none()
    }

    pub fn deal<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&TexasRound, GameError> {
        self.deal_from(Deck::shuffled(rng))
    }

    /// Starts a hand from a prepared deck.
    pub fn deal_from(&mut self, mut deck: Deck) -> Result<&TexasRound, GameError> {
        let round = TexasRound::deal(&mut deck, self.config.opponents)?;
        self.hands += 1;
        self.showdown = None;
        tracing::debug!(hand = self.hands, opponents = round.opponents.len(), "texas hand dealt");
        Ok(self.round.insert(round))
    }

    /// Scores the current hand once and books the delta with the ledger.
    pub fn reveal(&mut self, ledger: &mut ScoreLedger, now: DateTime<Utc>) -> Result<&Showdown, GameError> {
        let round = self.round.as_ref().ok_or(GameError::NoRoundDealt)?;
        if self.showdown.is_some() {
            return Err(GameError::RoundAlreadyRevealed);
        }
        let player = best_with_board(&round.player, &round.board);
        let opponents: Vec<HandScore> = round
            .opponents
            .iter()
            .map(|hole| best_with_board(hole, &round.board))
            .collect();
        let outcome = resolve_showdown(&player, &opponents);
        let base_gain = showdown_gain(player.category, outcome, &self.config);
        let applied_gain =
            ledger.apply_delta(base_gain, ScoreSource::Texas, Some(self.config.min_total), now);
        tracing::info!(
            hand = self.hands,
            category = player.category.code(),
            outcome = ?outcome,
            base_gain,
            applied_gain,
            "texas showdown"
        );
        Ok(self.showdown.insert(Showdown {
            player,
            opponents,
            outcome,
            base_gain,
            applied_gain,
        }))
    }
}
