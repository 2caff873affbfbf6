use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::ai::{RandomPolicy, StonePolicy};
use crate::errors::GameError;

/// Stones in a row needed to win.
pub const WIN_LENGTH: usize = 5;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stone {
    Black,
    White,
}

impl Stone {
    pub fn opponent(self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Black,
    White,
    Draw,
}

impl From<Stone> for Winner {
    fn from(s: Stone) -> Self {
        match s {
            Stone::Black => Winner::Black,
            Stone::White => Winner::White,
        }
    }
}

/// Square five-in-a-row board, cells indexed row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Stone>>,
    current: Stone,
    move_count: usize,
    winner: Option<Winner>,
}

impl Board {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
            current: Stone::Black,
            move_count: 0,
            winner: None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.size);
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cells(&self) -> &[Option<Stone>] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<Stone> {
        self.cells.get(index).copied().flatten()
    }

    pub fn current_player(&self) -> Stone {
        self.current
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn is_full(&self) -> bool {
        self.move_count == self.cells.len()
    }

    pub fn empty_cells(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.is_none().then_some(i))
            .collect()
    }

    /// Puts `stone` on `index`, updates the winner, and passes the turn.
    /// Returns the winner if this move ended the game.
    pub fn place(&mut self, index: usize, stone: Stone) -> Result<Option<Winner>, GameError> {
        if self.winner.is_some() {
            return Err(GameError::GameOver);
        }
        let cells = self.cells.len();
        match self.cells.get(index) {
            None => return Err(GameError::IndexOutOfRange { index, cells }),
            Some(Some(_)) => return Err(GameError::CellOccupied(index)),
            Some(None) => {}
        }
        self.cells[index] = Some(stone);
        self.move_count += 1;
        self.current = stone.opponent();

        if self.has_five(index, stone) {
            self.winner = Some(stone.into());
        } else if self.is_full() {
            self.winner = Some(Winner::Draw);
        }
        Ok(self.winner)
    }

    /// Whether the line through `index` holds five or more `stone`s.
    pub fn has_five(&self, index: usize, stone: Stone) -> bool {
        const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];
        if self.cell(index) != Some(stone) {
            return false;
        }
        let row = (index / self.size) as isize;
        let col = (index % self.size) as isize;
        DIRECTIONS.iter().any(|&(dr, dc)| {
            1 + self.run_length(row, col, dr, dc, stone) + self.run_length(row, col, -dr, -dc, stone)
                >= WIN_LENGTH
        })
    }

    // consecutive `stone`s starting one step away from (row, col)
    fn run_length(&self, row: isize, col: isize, dr: isize, dc: isize, stone: Stone) -> usize {
        let n = self.size as isize;
        let mut count = 0;
        let (mut r, mut c) = (row + dr, col + dc);
        while r >= 0 && r < n && c >= 0 && c < n && self.cells[(r * n + c) as usize] == Some(stone) {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }
}

/// What happened in one player turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Turn {
    pub black: usize,
    pub white: Option<usize>,
    pub winner: Option<Winner>,
}

/// Black plays `index`; unless that ends the game, `policy` answers with white.
///
/// A reply that is out of range, occupied or missing is a policy bug: it is
/// logged and replaced by a uniformly random empty cell, so black's move is
/// never left without an answer.
pub fn play_turn(
    board: &mut Board,
    index: usize,
    policy: &mut dyn StonePolicy,
    rng: &mut dyn RngCore,
) -> Result<Turn, GameError> {
    if board.winner().is_some() {
        return Err(GameError::GameOver);
    }
    let winner = board.place(index, Stone::Black)?;
    let mut turn = Turn {
        black: index,
        white: None,
        winner,
    };
    if winner.is_some() {
        return Ok(turn);
    }
    // the game is still running, so the board has at least one empty cell
    let reply = match policy.choose_move(board, rng) {
        Some(cell) if cell < board.cells.len() && board.cells[cell].is_none() => Some(cell),
        chosen => {
            tracing::error!(
                policy = policy.name(),
                chosen = ?chosen,
                "invariant violated: policy chose an unplayable cell"
            );
            RandomPolicy.choose_move(board, rng)
        }
    };
    if let Some(reply) = reply {
        turn.winner = board.place(reply, Stone::White)?;
        turn.white = Some(reply);
    }
    Ok(turn)
}
