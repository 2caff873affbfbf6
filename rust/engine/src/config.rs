use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::hand::Category;
use crate::wheel::{WheelArc, WheelBand, WheelZone};

/// Tunables for every game. All sections fall back to their defaults when
/// omitted from a TOML document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the engine RNG; `None` seeds from OS entropy
    pub seed: Option<u64>,
    pub ledger: LedgerConfig,
    pub texas: TexasConfig,
    pub wheel: WheelConfig,
    pub fortune: FortuneConfig,
    pub board: BoardConfig,
    pub jackpot: JackpotConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LedgerConfig {
    pub initial_total: i64,
    pub history_limit: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            initial_total: 0,
            history_limit: 40,
        }
    }
}

/// Per-category base gains for a showdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HandGainTable {
    pub high_card: i64,
    pub pair: i64,
    pub two_pair: i64,
    pub three_kind: i64,
    pub straight: i64,
    pub flush: i64,
    pub full_house: i64,
    pub four_kind: i64,
    pub straight_flush: i64,
}

impl HandGainTable {
    pub fn for_category(&self, category: Category) -> i64 {
        match category {
            Category::HighCard => self.high_card,
            Category::OnePair => self.pair,
            Category::TwoPair => self.two_pair,
            Category::ThreeOfAKind => self.three_kind,
            Category::Straight => self.straight,
            Category::Flush => self.flush,
            Category::FullHouse => self.full_house,
            Category::FourOfAKind => self.four_kind,
            Category::StraightFlush => self.straight_flush,
        }
    }
}

impl Default for HandGainTable {
    fn default() -> Self {
        Self {
            high_card: 6,
            pair: 10,
            two_pair: 14,
            three_kind: 20,
            straight: 28,
            flush: 36,
            full_house: 48,
            four_kind: 66,
            straight_flush: 88,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TexasConfig {
    pub opponents: usize,
    /// Score floor applied to showdown deltas
    pub min_total: i64,
    /// Smallest magnitude a showdown delta may have
    pub min_gain: i64,
    pub win_multiplier: f64,
    pub tie_multiplier: f64,
    pub lose_multiplier: f64,
    pub base_gains: HandGainTable,
}

impl Default for TexasConfig {
    fn default() -> Self {
        Self {
            opponents: 2,
            min_total: -120,
            min_gain: 2,
            win_multiplier: 1.2,
            tie_multiplier: 0.75,
            lose_multiplier: -0.55,
            base_gains: HandGainTable::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WheelConfig {
    /// Cumulative probability bands, matched in order
    pub bands: Vec<WheelBand>,
    /// Visual arcs on the wheel face
    pub arcs: Vec<WheelArc>,
    pub spin_delay_ms: u64,
    /// Whole turns added to every spin animation
    pub extra_turns: u32,
    pub history_limit: usize,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            bands: crate::wheel::default_bands(),
            arcs: crate::wheel::default_arcs(),
            spin_delay_ms: 960,
            extra_turns: 4,
            history_limit: 24,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FortuneConfig {
    /// Divisor applied to the summed scores to obtain the delta
    pub gain_divisor: f64,
    pub lucky_colors: Vec<String>,
    pub lucky_times: Vec<String>,
}

impl Default for FortuneConfig {
    fn default() -> Self {
        Self {
            gain_divisor: 28.0,
            lucky_colors: ["Ruby Red", "Ocean Blue", "Mint Green", "Sun Gold", "Sky Purple"]
                .map(String::from)
                .to_vec(),
            lucky_times: [
                "09:00-11:00",
                "11:00-13:00",
                "14:00-16:00",
                "17:00-19:00",
                "20:00-22:00",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BoardConfig {
    pub size: usize,
    /// Opponent policy name, see [`crate::ai::create_policy`]
    pub ai: String,
    pub win_gain: i64,
    pub loss_gain: i64,
    pub draw_gain: i64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            size: 9,
            ai: "random".into(),
            win_gain: 24,
            loss_gain: -12,
            draw_gain: 6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JackpotConfig {
    pub cycle_seconds: u32,
    pub window_seconds: u32,
    pub open_multiplier: f64,
}

impl Default for JackpotConfig {
    fn default() -> Self {
        Self {
            cycle_seconds: 60,
            window_seconds: 12,
            open_multiplier: 1.4,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: EngineConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ledger.history_limit == 0 {
            return Err(invalid("ledger.history_limit must be >= 1"));
        }

        let t = &self.texas;
        if t.opponents == 0 {
            return Err(invalid("texas.opponents must be >= 1"));
        }
        if 2 * (1 + t.opponents) + 5 > 52 {
            return Err(invalid(format!(
                "texas.opponents = {} does not fit in one deck",
                t.opponents
            )));
        }
        if t.min_gain < 1 {
            return Err(invalid("texas.min_gain must be >= 1"));
        }
        if !(t.win_multiplier >= t.tie_multiplier
            && t.tie_multiplier >= 0.0
            && t.lose_multiplier < 0.0)
        {
            return Err(invalid(
                "texas multipliers must satisfy win >= tie >= 0 > lose",
            ));
        }
        let gains: Vec<i64> = Category::ALL
            .iter()
            .map(|&c| t.base_gains.for_category(c))
            .collect();
        if gains.windows(2).any(|w| w[0] > w[1]) {
            return Err(invalid("texas.base_gains must not decrease with hand strength"));
        }

        self.validate_wheel()?;

        if self.fortune.gain_divisor <= 0.0 {
            return Err(invalid("fortune.gain_divisor must be > 0"));
        }
        if self.fortune.lucky_colors.is_empty() || self.fortune.lucky_times.is_empty() {
            return Err(invalid("fortune lucky lists must not be empty"));
        }

        if self.board.size < 5 {
            return Err(invalid("board.size must be >= 5"));
        }
        if crate::ai::create_policy(&self.board.ai).is_none() {
            return Err(invalid(format!("unknown board.ai: {}", self.board.ai)));
        }

        let j = &self.jackpot;
        if j.cycle_seconds == 0 || j.window_seconds > j.cycle_seconds {
            return Err(invalid(
                "jackpot requires 0 < cycle_seconds and window_seconds <= cycle_seconds",
            ));
        }
        if j.open_multiplier < 1.0 {
            return Err(invalid("jackpot.open_multiplier must be >= 1"));
        }
        Ok(())
    }

    fn validate_wheel(&self) -> Result<(), ConfigError> {
        let w = &self.wheel;
        if w.bands.is_empty() {
            return Err(invalid("wheel.bands must not be empty"));
        }
        for band in &w.bands {
            if !(band.probability >= 0.0) {
                return Err(invalid("wheel band probability must be >= 0"));
            }
            if band.payouts.is_empty() {
                return Err(invalid(format!("wheel band {:?} has no payouts", band.zone)));
            }
            if band.zone == WheelZone::Neutral && band.payouts.iter().any(|&p| p != 0) {
                return Err(invalid("neutral wheel bands must pay 0"));
            }
            if !w.arcs.iter().any(|a| a.zone == band.zone) {
                return Err(invalid(format!("wheel zone {:?} has no arcs", band.zone)));
            }
        }
        let total: f64 = w.bands.iter().map(|b| b.probability).sum();
        if (total - 100.0).abs() > 1e-9 {
            return Err(invalid(format!(
                "wheel band probabilities sum to {total}, expected 100"
            )));
        }
        for arc in &w.arcs {
            if !(0.0 <= arc.start && arc.start < arc.end && arc.end <= 360.0) {
                return Err(invalid(format!(
                    "wheel arc [{}, {}] must lie within [0, 360]",
                    arc.start, arc.end
                )));
            }
        }
        if w.history_limit == 0 {
            return Err(invalid("wheel.history_limit must be >= 1"));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}
