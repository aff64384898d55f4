//! JSON loading of scoring config, card definitions and joker rosters.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;
