//! Shared types for broadcast session selection: stake addresses, the
//! session abstraction selectors operate on, and error enums.

pub mod address;
pub mod error;
pub mod session;
pub mod types;

pub use address::{ADDRESS_LEN, StakeAddress};
pub use error::{AddressParseError, ConfigError, SelectError};
pub use session::{ScoredSession, Session};
pub use types::{OutputFormat, SelectorKind};
