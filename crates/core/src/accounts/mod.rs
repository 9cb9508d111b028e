//! Chart-of-accounts types and semantic account resolution.

pub mod resolver;
pub mod types;

pub use resolver::{AccountCodeResolver, SemanticRole};
pub use types::{AccountType, BalanceType, ParentTypeMismatch, validate_parent_type};
