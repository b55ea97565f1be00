//! Environment-driven configuration for the game host.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `MAHJONG_DIFFICULTY` | `medium` |
//! | `MAHJONG_LANGUAGE` | `ru` |
//! | `MAHJONG_THEME` | `classic` |
//! | `MAHJONG_SEED` | fresh entropy |
//! | `MAHJONG_LIVE` | off |
//! | `MAHJONG_ADVICE_DISABLED` | off |
//!
//! Values that do not parse fall back to the default.

use crate::types::{Difficulty, Language, Theme};

pub const ENV_DIFFICULTY: &str = "MAHJONG_DIFFICULTY";
pub const ENV_LANGUAGE: &str = "MAHJONG_LANGUAGE";
pub const ENV_THEME: &str = "MAHJONG_THEME";
pub const ENV_SEED: &str = "MAHJONG_SEED";
pub const ENV_LIVE: &str = "MAHJONG_LIVE";
pub const ENV_ADVICE_DISABLED: &str = "MAHJONG_ADVICE_DISABLED";

/// "1" or "true" (any case)
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true")
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameConfig {
    pub difficulty: Difficulty,
    pub language: Language,
    pub theme: Theme,
    /// None means seed from entropy
    pub seed: Option<u64>,
    pub live: bool,
    pub advice_disabled: bool,
}

impl GameConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (tests pass a map instead of the process env)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            difficulty: lookup(ENV_DIFFICULTY)
                .and_then(|s| Difficulty::from_str(s.trim()))
                .unwrap_or(defaults.difficulty),
            language: lookup(ENV_LANGUAGE)
                .and_then(|s| Language::from_str(s.trim()))
                .unwrap_or(defaults.language),
            theme: lookup(ENV_THEME)
                .and_then(|s| Theme::from_str(s.trim()))
                .unwrap_or(defaults.theme),
            seed: lookup(ENV_SEED).and_then(|s| s.trim().parse().ok()),
            live: lookup(ENV_LIVE).is_some_and(|s| is_truthy(&s)),
            advice_disabled: lookup(ENV_ADVICE_DISABLED).is_some_and(|s| is_truthy(&s)),
        }
    }
}
