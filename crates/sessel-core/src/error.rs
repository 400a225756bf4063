/// Failure of a single `select` call. Pool state is left untouched in every case.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    #[error("Failed to read stake weights for selection: {0}")]
    StakeLookup(String),

    #[error("Stake-weighted draw {draw} matched no session (total stake {total})")]
    DrawExhausted { draw: u128, total: u128 },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("good_enough_score must be a finite non-negative number, got {0}")]
    InvalidThreshold(f64),

    #[error("oracle_timeout_ms must be greater than zero")]
    ZeroOracleTimeout,

    #[error("Duplicate session id '{0}'")]
    DuplicateSessionId(String),

    #[error("Session '{id}' has invalid latency score {score}")]
    InvalidLatencyScore { id: String, score: f64 },

    #[error("Conflicting stake for address {address}: {first} vs {second}")]
    ConflictingStake {
        address: String,
        first: u64,
        second: u64,
    },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressParseError {
    #[error("Invalid stake address '{input}': expected 40 hex digits, got {digits}")]
    InvalidLength { input: String, digits: usize },

    #[error("Invalid stake address '{0}': not hex")]
    InvalidHex(String),
}
