//! Core data models for the Kardex viewer
//!
//! This module contains the data structures of the inventory movement
//! domain: movements, their flags, and the display category derived from
//! them.

pub mod category;
pub mod movement;

pub use category::DisplayCategory;
pub use movement::{Movement, MovementType, StockFlag};
