pub mod category;
pub mod money;
pub mod transaction;

pub use category::CategoryRuleSet;
pub use money::Money;
pub use transaction::{Bank, TransactionRecord, UnknownBank, DEFAULT_CATEGORY};
