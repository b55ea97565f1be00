//! Vita Mahjong (workspace facade crate).
//!
//! Re-exports the engine crates under `vita_mahjong::{core,adapter,types}` so
//! hosts and integration tests need a single dependency.

pub mod autoplay;

pub use vita_mahjong_adapter as adapter;
pub use vita_mahjong_core as core;
pub use vita_mahjong_types as types;
