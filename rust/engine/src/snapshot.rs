//! Read-only view of the engine handed to the presentation layer.

use serde::Serialize;

use crate::cards::Card;
use crate::engine::Engine;
use crate::fortune::FortuneProfile;
use crate::gomoku::{Stone, Winner};
use crate::hand::Category;
use crate::ledger::ScoreRecord;
use crate::texas::Outcome;
use crate::wheel::{WheelHistoryItem, WheelZone};

/// Token shown for an opponent card before the reveal.
pub const HIDDEN_CARD: &str = "🂠";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ArcadeSnapshot {
    pub total_score: i64,
    pub score_history: Vec<ScoreRecord>,
    pub texas: TexasView,
    pub wheel: WheelView,
    pub fortune: FortuneProfile,
    pub board: BoardView,
    pub jackpot: JackpotView,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TexasView {
    pub player_cards: Vec<String>,
    pub board_cards: Vec<String>,
    pub opponents: Vec<Vec<String>>,
    pub hands: u32,
    pub hand_code: Option<Category>,
    pub outcome: Outcome,
    pub last_gain: i64,
    pub can_reveal: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WheelView {
    pub angle: f64,
    pub spinning: bool,
    pub spins: u32,
    pub streak: u32,
    pub last_gain: i64,
    pub zone: WheelZone,
    pub zone_probability: f64,
    pub history: Vec<WheelHistoryItem>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BoardView {
    pub size: usize,
    pub cells: Vec<Option<Stone>>,
    pub current_player: Stone,
    pub move_count: usize,
    pub winner: Option<Winner>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JackpotView {
    pub last_gain: i64,
    pub window_open: bool,
    pub countdown: u32,
}

fn tokens(cards: &[Card]) -> Vec<String> {
    cards.iter().map(Card::token).collect()
}

impl ArcadeSnapshot {
    pub fn capture(engine: &Engine) -> Self {
        let texas = engine.texas();
        let showdown = texas.showdown();
        let (player_cards, board_cards, opponents) = match texas.round() {
            Some(round) => {
                let opponents = round
                    .opponents
                    .iter()
                    .map(|hole| match showdown {
                        Some(_) => tokens(hole),
                        None => vec![HIDDEN_CARD.to_string(); hole.len()],
                    })
                    .collect();
                (tokens(&round.player), tokens(&round.board), opponents)
            }
            None => (Vec::new(), Vec::new(), Vec::new()),
        };

        let wheel = engine.wheel();
        let board = engine.board();
        let phase = engine.jackpot_phase();

        Self {
            total_score: engine.total_score(),
            score_history: engine.ledger().history().cloned().collect(),
            texas: TexasView {
                player_cards,
                board_cards,
                opponents,
                hands: texas.hands(),
                hand_code: showdown.map(|s| s.player.category),
                outcome: showdown.map(|s| s.outcome).unwrap_or(Outcome::Pending),
                last_gain: showdown.map(|s| s.applied_gain).unwrap_or(0),
                can_reveal: texas.can_reveal(),
            },
            wheel: WheelView {
                angle: wheel.angle(),
                spinning: wheel.is_spinning(),
                spins: wheel.spins(),
                streak: wheel.streak(),
                last_gain: wheel.last_gain(),
                zone: wheel.zone(),
                zone_probability: wheel.zone_probability(),
                history: wheel.history().cloned().collect(),
            },
            fortune: engine.fortune().clone(),
            board: BoardView {
                size: board.size(),
                cells: board.cells().to_vec(),
                current_player: board.current_player(),
                move_count: board.move_count(),
                winner: board.winner(),
            },
            jackpot: JackpotView {
                last_gain: engine.jackpot_last_gain(),
                window_open: phase.window_open,
                countdown: phase.countdown,
            },
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
