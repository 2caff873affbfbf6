//! Daily fortune draw.
//!
//! The profile is a pure function of the key and the calendar day: the same
//! birthday gives the same reading all day and a new one tomorrow.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::FortuneConfig;
use crate::errors::GameError;
use crate::ledger::round_score;

const SEED_MODULUS: u64 = 2_147_483_647;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zodiac {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl Zodiac {
    pub fn as_str(self) -> &'static str {
        match self {
            Zodiac::Aries => "aries",
            Zodiac::Taurus => "taurus",
            Zodiac::Gemini => "gemini",
            Zodiac::Cancer => "cancer",
            Zodiac::Leo => "leo",
            Zodiac::Virgo => "virgo",
            Zodiac::Libra => "libra",
            Zodiac::Scorpio => "scorpio",
            Zodiac::Sagittarius => "sagittarius",
            Zodiac::Capricorn => "capricorn",
            Zodiac::Aquarius => "aquarius",
            Zodiac::Pisces => "pisces",
        }
    }
}

impl fmt::Display for Zodiac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the reading is keyed on.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum FortuneKey {
    /// Free text that must read `YYYY-MM-DD`
    Birthday(String),
    /// Fixed selection; the first one locks the profile
    Zodiac(Zodiac),
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct FortuneProfile {
    pub ready: bool,
    pub last_gain: i64,
    pub overall: u32,
    pub career: u32,
    pub love: u32,
    pub wealth: u32,
    pub lucky_number: u32,
    pub lucky_color: String,
    pub lucky_time: String,
    /// Zodiac selection the profile is locked to, if any
    pub locked: Option<Zodiac>,
}

/// Polynomial hash over UTF-16 code units, `seed = (seed * 31 + unit) mod (2^31 - 1)`.
pub fn seed_from(key: &str) -> u32 {
    let seed = key
        .encode_utf16()
        .fold(0u64, |seed, unit| (seed * 31 + u64::from(unit)) % SEED_MODULUS);
    seed as u32
}

/// Trims and checks `YYYY-MM-DD` shape and calendar validity.
fn normalize_birthday(raw: &str) -> Option<&str> {
    let s = raw.trim();
    let shaped = s.len() == 10
        && s.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(|_| s)
}

/// Key string hashed for `key` on `day`, or `None` when the key is malformed.
pub fn compose_key(key: &FortuneKey, day: NaiveDate) -> Option<String> {
    let day = day.format("%Y-%m-%d");
    match key {
        FortuneKey::Birthday(raw) => normalize_birthday(raw).map(|b| format!("{b}-{day}")),
        FortuneKey::Zodiac(z) => Some(format!("zodiac:{z}-{day}")),
    }
}

/// Derives every field of a ready profile from `seed`.
pub fn profile_from_seed(seed: u32, config: &FortuneConfig) -> FortuneProfile {
    let overall = 60 + seed % 41;
    let career = 50 + (seed >> 2) % 51;
    let love = 50 + (seed >> 4) % 51;
    let wealth = 50 + (seed >> 6) % 51;
    let sum = f64::from(overall + career + love + wealth);
    let colors = &config.lucky_colors;
    let times = &config.lucky_times;
    FortuneProfile {
        ready: true,
        last_gain: round_score(sum / config.gain_divisor),
        overall,
        career,
        love,
        wealth,
        lucky_number: seed % 9 + 1,
        lucky_color: colors[seed as usize % colors.len()].clone(),
        lucky_time: times[seed as usize % times.len()].clone(),
        locked: None,
    }
}

#[derive(Debug, Clone)]
pub struct FortuneTeller {
    config: FortuneConfig,
    profile: FortuneProfile,
}

impl FortuneTeller {
    pub fn new(config: FortuneConfig) -> Self {
        let profile = FortuneProfile {
            ready: false,
            last_gain: 0,
            overall: 0,
            career: 0,
            love: 0,
            wealth: 0,
            lucky_number: 0,
            lucky_color: config.lucky_colors.first().cloned().unwrap_or_default(),
            lucky_time: config.lucky_times.first().cloned().unwrap_or_default(),
            locked: None,
        };
        Self { config, profile }
    }

    pub fn profile(&self) -> &FortuneProfile {
        &self.profile
    }

    /// Draws today's reading. The returned profile's `last_gain` is the score
    /// delta to apply.
    ///
    /// A malformed birthday clears `ready`; once a zodiac selection has locked
    /// the profile every call is rejected without touching it.
    pub fn generate(&mut self, key: &FortuneKey, day: NaiveDate) -> Result<&FortuneProfile, GameError> {
        if self.profile.locked.is_some() {
            return Err(GameError::FortuneLocked);
        }
        let Some(composed) = compose_key(key, day) else {
            self.profile.ready = false;
            self.profile.last_gain = 0;
            let raw = match key {
                FortuneKey::Birthday(raw) => raw.clone(),
                FortuneKey::Zodiac(z) => z.to_string(),
            };
            return Err(GameError::InvalidFortuneKey(raw));
        };
        let mut profile = profile_from_seed(seed_from(&composed), &self.config);
        if let FortuneKey::Zodiac(z) = key {
            profile.locked = Some(*z);
        }
        tracing::debug!(key = %composed, overall = profile.overall, gain = profile.last_gain, "fortune drawn");
        self.profile = profile;
        Ok(&self.profile)
    }
}
