//! Selector and scenario configuration loading and validation (TOML).

pub mod config;
pub mod validate;

pub use config::{
    DEFAULT_GOOD_ENOUGH_SCORE, OracleConfig, ScenarioConfig, SelectorConfig, SessionSpec,
};
pub use validate::{validate_scenario, validate_selector};
