//! # worldstage-engine: Mini-Game Engine Core
//!
//! Four small games (a Texas Hold'em showdown, a probability wheel, a daily
//! fortune draw and a five-in-a-row duel) plus a timed jackpot, all writing to
//! one cumulative score ledger. Rendering lives elsewhere; this crate owns the
//! rules, the randomness and the score.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and deck construction
//! - [`deck`] - Fisher–Yates shuffling and dealing
//! - [`hand`] - Five-card scoring and best-of-seven selection
//! - [`texas`] - Deal / reveal lifecycle and showdown scoring
//! - [`wheel`] - Weighted outcome bands, face arcs and the spin state machine
//! - [`fortune`] - Seeded daily fortune profiles
//! - [`gomoku`] - Five-in-a-row board, win and draw detection
//! - [`ai`] - Board opponent policies
//! - [`jackpot`] - Timed bonus roll
//! - [`ledger`] - Floor-clamped score ledger with audit history
//! - [`timer`] - Scoped, cancelable one-shot timers
//! - [`engine`] - Facade owning every game and the ledger
//! - [`snapshot`] - Serializable read-only view for the presentation layer
//! - [`config`] - TOML configuration and validation
//! - [`clock`] - Injectable wall clock
//! - [`logging`] - `tracing` setup and a capturing test subscriber
//! - [`errors`] - Error types
//!
//! ## Quick Start
//!
//! ```rust
//! use worldstage_engine::cards::{Card, Rank, Suit};
//! use worldstage_engine::hand::{best_of_seven, Category};
//!
//! let cards = [
//!     Card::new(Rank::Ace, Suit::Hearts),
//!     Card::new(Rank::King, Suit::Hearts),
//!     Card::new(Rank::Queen, Suit::Hearts),
//!     Card::new(Rank::Jack, Suit::Hearts),
//!     Card::new(Rank::Ten, Suit::Hearts),
//!     Card::new(Rank::Two, Suit::Clubs),
//!     Card::new(Rank::Three, Suit::Diamonds),
//! ];
//!
//! let score = best_of_seven(&cards);
//! assert_eq!(score.category, Category::StraightFlush);
//! assert_eq!(score.rank_level(), 9);
//! ```
//!
//! ## Deterministic Play
//!
//! Every random draw comes from one seeded ChaCha20 generator:
//!
//! ```rust
//! use worldstage_engine::config::EngineConfig;
//! use worldstage_engine::engine::Engine;
//!
//! let config = EngineConfig { seed: Some(7), ..EngineConfig::default() };
//! let mut a = Engine::new(config.clone()).unwrap();
//! let mut b = Engine::new(config).unwrap();
//! assert_eq!(a.deal_poker().unwrap(), b.deal_poker().unwrap());
//! ```

pub mod ai;
pub mod cards;
pub mod clock;
pub mod config;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod fortune;
pub mod gomoku;
pub mod hand;
pub mod jackpot;
pub mod ledger;
pub mod logging;
pub mod snapshot;
pub mod texas;
pub mod timer;
pub mod wheel;
