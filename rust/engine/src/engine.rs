use chrono::Duration;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::ai::{create_policy, StonePolicy};
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::deck::Deck;
use crate::errors::{ConfigError, GameError};
use crate::fortune::{FortuneKey, FortuneProfile, FortuneTeller};
use crate::gomoku::{play_turn, Board, Turn, Winner};
use crate::jackpot::{self, JackpotPhase};
use crate::ledger::{ScoreLedger, ScoreSource};
use crate::snapshot::ArcadeSnapshot;
use crate::texas::{Showdown, TexasRound, TexasTable};
use crate::timer::TimerSet;
use crate::wheel::{Wheel, WheelResult};

/// Deferred work scheduled on the engine's timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Commit the pending wheel result
    WheelSettle,
}

/// Owns every mini-game and the score ledger they share.
///
/// All actions are synchronous. The wheel is the exception: [`Engine::spin_wheel`]
/// decides the outcome and schedules a settle timer, and the result reaches the
/// ledger on the first [`Engine::tick`] at or after the deadline.
///
/// # Examples
///
/// ```
/// use worldstage_engine::config::EngineConfig;
/// use worldstage_engine::engine::Engine;
///
/// let config = EngineConfig { seed: Some(42), ..EngineConfig::default() };
/// let mut engine = Engine::new(config).expect("valid config");
///
/// engine.deal_poker().expect("deal");
/// let showdown = engine.reveal_poker().expect("reveal").clone();
/// assert_eq!(engine.total_score(), showdown.applied_gain);
///
/// // revealing twice is refused and leaves the score alone
/// assert!(engine.reveal_poker().is_err());
/// assert_eq!(engine.total_score(), showdown.applied_gain);
/// ```
pub struct Engine {
    config: EngineConfig,
    rng: ChaCha20Rng,
    clock: Box<dyn Clock>,
    ledger: ScoreLedger,
    texas: TexasTable,
    wheel: Wheel,
    fortune: FortuneTeller,
    board: Board,
    policy: Box<dyn StonePolicy>,
    jackpot_last_gain: i64,
    timers: TimerSet<TimerEvent>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, Box::new(SystemClock))
    }

    pub fn with_clock(config: EngineConfig, clock: Box<dyn Clock>) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_rng(&mut rand::rng()),
        };
        let policy = create_policy(&config.board.ai)
            .ok_or_else(|| ConfigError::Invalid(format!("unknown board.ai: {}", config.board.ai)))?;
        tracing::info!(seed = ?config.seed, ai = policy.name(), "engine started");
        Ok(Self {
            rng,
            clock,
            ledger: ScoreLedger::new(config.ledger.initial_total, config.ledger.history_limit),
            texas: TexasTable::new(config.texas.clone()),
            wheel: Wheel::new(config.wheel.clone()),
            fortune: FortuneTeller::new(config.fortune.clone()),
            board: Board::new(config.board.size),
            policy,
            jackpot_last_gain: 0,
            timers: TimerSet::new(),
            config,
        })
    }

    /// Replaces the board opponent.
    pub fn set_policy(&mut self, policy: Box<dyn StonePolicy>) {
        self.policy = policy;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    pub fn total_score(&self) -> i64 {
        self.ledger.total()
    }

    pub fn texas(&self) -> &TexasTable {
        &self.texas
    }

    pub fn wheel(&self) -> &Wheel {
        &self.wheel
    }

    pub fn fortune(&self) -> &FortuneProfile {
        self.fortune.profile()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn jackpot_last_gain(&self) -> i64 {
        self.jackpot_last_gain
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn snapshot(&self) -> ArcadeSnapshot {
        ArcadeSnapshot::capture(self)
    }

    pub fn deal_poker(&mut self) -> Result<&TexasRound, GameError> {
        self.texas.deal(&mut self.rng).inspect_err(|e| rejected("deal_poker", e))
    }

    /// Deals from a prepared deck instead of a fresh shuffle.
    pub fn deal_poker_from(&mut self, deck: Deck) -> Result<&TexasRound, GameError> {
        self.texas
            .deal_from(deck)
            .inspect_err(|e| rejected("deal_poker", e))
    }

    pub fn reveal_poker(&mut self) -> Result<&Showdown, GameError> {
        let now = self.clock.now();
        self.texas
            .reveal(&mut self.ledger, now)
            .inspect_err(|e| rejected("reveal_poker", e))
    }

    /// Starts a spin. The returned result is committed when the settle timer
    /// fires; until then further spins are refused.
    pub fn spin_wheel(&mut self) -> Result<WheelResult, GameError> {
        let result = self
            .wheel
            .start_spin(&mut self.rng)
            .inspect_err(|e| rejected("spin_wheel", e))?;
        let delay = Duration::milliseconds(self.wheel.spin_delay_ms() as i64);
        self.timers
            .schedule(self.clock.now(), delay, TimerEvent::WheelSettle);
        Ok(result)
    }

    /// Fires every timer that is due. Returns how many fired.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();
        let fired = self.timers.fire_due(now);
        for (_, event) in &fired {
            match event {
                TimerEvent::WheelSettle => {
                    if let Some(result) = self.wheel.commit(now) {
                        self.ledger
                            .apply_delta(result.gain, ScoreSource::Wheel, None, now);
                    }
                }
            }
        }
        fired.len()
    }

    pub fn generate_fortune(&mut self, key: &FortuneKey) -> Result<&FortuneProfile, GameError> {
        let now = self.clock.now();
        let today = self.clock.today();
        let gain = match self.fortune.generate(key, today) {
            Ok(profile) => profile.last_gain,
            Err(e) => {
                rejected("generate_fortune", &e);
                return Err(e);
            }
        };
        self.ledger
            .apply_delta(gain, ScoreSource::Fortune, None, now);
        Ok(self.fortune.profile())
    }

    /// Black plays `index`; the opponent answers unless the game just ended.
    pub fn place_stone(&mut self, index: usize) -> Result<Turn, GameError> {
        let turn = play_turn(&mut self.board, index, self.policy.as_mut(), &mut self.rng)
            .inspect_err(|e| rejected("place_stone", e))?;
        if let Some(winner) = turn.winner {
            let gain = match winner {
                Winner::Black => self.config.board.win_gain,
                Winner::White => self.config.board.loss_gain,
                Winner::Draw => self.config.board.draw_gain,
            };
            tracing::info!(winner = ?winner, moves = self.board.move_count(), "board game finished");
            self.ledger
                .apply_delta(gain, ScoreSource::Gomoku, None, self.clock.now());
        }
        Ok(turn)
    }

    pub fn reset_board(&mut self) {
        self.board.reset();
    }

    pub fn jackpot_phase(&self) -> JackpotPhase {
        jackpot::phase_at(self.clock.now().timestamp(), &self.config.jackpot)
    }

    /// Rolls the timed bonus and books it. Returns the applied gain.
    pub fn play_jackpot(&mut self) -> i64 {
        let phase = self.jackpot_phase();
        let profile = self.fortune.profile();
        let overall = profile.ready.then_some(profile.overall);
        let gain = jackpot::roll_gain(&mut self.rng, phase, overall, &self.config.jackpot);
        self.jackpot_last_gain = gain;
        tracing::debug!(window_open = phase.window_open, gain, "jackpot rolled");
        self.ledger
            .apply_delta(gain, ScoreSource::Jackpot, None, self.clock.now())
    }

    /// Cancels pending timers and drops any result they would have committed.
    pub fn shutdown(&mut self) {
        let cancelled = self.timers.cancel_all();
        self.wheel.abort();
        tracing::debug!(cancelled, "engine shut down");
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if !self.timers.is_empty() {
            self.shutdown();
        }
    }
}

fn rejected(action: &'static str, err: &GameError) {
    match err {
        GameError::DeckExhausted { .. } => tracing::error!(action, error = %err, "invariant violated"),
        _ => tracing::debug!(action, error = %err, "action rejected"),
    }
}
