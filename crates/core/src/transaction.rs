use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::money::Money;

/// Uncategorized marker, used both as the fallback entry type and the
/// fallback category.
pub const DEFAULT_CATEGORY: &str = "Outros";

/// The bank an import batch came from. Selects the memo strategy applied to
/// every block in the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bank {
    /// Generic exporter whose memos follow the `type - description` convention.
    BancoDoBrasil,
    /// Secondary bank: memo text is unstructured, `TRNTYPE` carries the kind.
    C6,
}

impl Bank {
    pub fn display_name(self) -> &'static str {
        match self {
            Bank::BancoDoBrasil => "Banco do Brasil",
            Bank::C6 => "C6",
        }
    }

    pub fn short_code(self) -> &'static str {
        match self {
            Bank::BancoDoBrasil => "BB",
            Bank::C6 => "C6",
        }
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown bank: '{0}'")]
pub struct UnknownBank(pub String);

impl std::str::FromStr for Bank {
    type Err = UnknownBank;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bb" | "banco do brasil" | "banco_do_brasil" => Ok(Bank::BancoDoBrasil),
            "c6" => Ok(Bank::C6),
            other => Err(UnknownBank(other.to_string())),
        }
    }
}

/// One parsed ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub bank: Bank,
    /// `None` when the export carried no usable posting date. The ledger
    /// store decides the default when persisting.
    pub date: Option<NaiveDate>,
    pub entry_type: String,
    pub description: String,
    pub amount: Money,
    pub category: String,
}

impl TransactionRecord {
    /// Text the category rules match against: `type + " " + description`.
    pub fn rule_text(&self) -> String {
        format!("{} {}", self.entry_type, self.description)
    }
}
