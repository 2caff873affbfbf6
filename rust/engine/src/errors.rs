use thiserror::Error;

/// Reasons an action is refused.
///
/// A rejected action leaves state untouched, so the presentation layer is free
/// to ignore the error and treat it as a no-op. The one exception is
/// [`GameError::InvalidFortuneKey`], which also clears the fortune profile's
/// `ready` flag.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum GameError {
    #[error("No poker round has been dealt")]
    NoRoundDealt,
    #[error("Poker round already revealed")]
    RoundAlreadyRevealed,
    #[error("Wheel is already spinning")]
    WheelBusy,
    #[error("Invalid fortune key: {0:?}")]
    InvalidFortuneKey(String),
    #[error("Fortune is locked to a previous selection")]
    FortuneLocked,
    #[error("Board index {index} out of range (cells: {cells})")]
    IndexOutOfRange { index: usize, cells: usize },
    #[error("Board cell {0} is already occupied")]
    CellOccupied(usize),
    #[error("Board game already finished")]
    GameOver,
    #[error("Deck exhausted: requested {requested}, remaining {remaining}")]
    DeckExhausted { requested: usize, remaining: usize },
}

/// Configuration failures raised while loading or validating [`crate::config::EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
