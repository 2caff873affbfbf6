//! Opponent policies for the five-in-a-row board.

use rand::seq::IndexedRandom;
use rand::RngCore;

use crate::gomoku::Board;

/// Chooses the white reply on a board that still has empty cells.
///
/// # Example
///
/// ```rust
/// use worldstage_engine::ai::StonePolicy;
/// use worldstage_engine::gomoku::Board;
/// use rand::RngCore;
///
/// /// Always answers in the first free cell.
/// struct FirstFree;
///
/// impl StonePolicy for FirstFree {
///     fn choose_move(&mut self, board: &Board, _rng: &mut dyn RngCore) -> Option<usize> {
///         board.empty_cells().first().copied()
///     }
///
///     fn name(&self) -> &str {
///         "first-free"
///     }
/// }
/// ```
pub trait StonePolicy: Send {
    /// Cell index to play, or `None` when the board is full.
    fn choose_move(&mut self, board: &Board, rng: &mut dyn RngCore) -> Option<usize>;

    fn name(&self) -> &str;
}

/// Uniform choice among empty cells, no look-ahead.
#[derive(Debug, Clone, Default)]
pub struct RandomPolicy;

impl StonePolicy for RandomPolicy {
    fn choose_move(&mut self, board: &Board, rng: &mut dyn RngCore) -> Option<usize> {
        board.empty_cells().choose(rng).copied()
    }

    fn name(&self) -> &str {
        "random"
    }
}

/// Builds a policy by name; `None` for unknown names.
pub fn create_policy(kind: &str) -> Option<Box<dyn StonePolicy>> {
    match kind {
        "random" => Some(Box::new(RandomPolicy)),
        _ => None,
    }
}
