//! Poker hand evaluation and chips x mult scoring. Keep this crate free of IO
//! and platform concerns.

pub mod card_instance;
pub mod cards;
pub mod config;
pub mod deck;
pub mod error;
pub mod events;
pub mod hand;
pub mod joker;
pub mod manager;
pub mod rng;
pub mod rules;
pub mod scoring;

pub use card_instance::*;
pub use cards::*;
pub use config::*;
pub use deck::*;
pub use error::*;
pub use events::*;
pub use hand::*;
pub use joker::*;
pub use manager::*;
pub use rng::*;
pub use rules::*;
pub use scoring::*;
