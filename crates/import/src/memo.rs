use extrato_core::{Bank, DEFAULT_CATEGORY};
use serde::{Deserialize, Serialize};

use crate::c6::C6Classifier;
use crate::splitter::HyphenSplitter;

/// Display-ready `(type, description)` pair extracted from a memo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoParts {
    pub entry_type: String,
    pub description: String,
}

impl MemoParts {
    pub fn new(entry_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            entry_type: entry_type.into(),
            description: description.into(),
        }
    }

    /// `("Outros", "")`, returned whenever a memo carries nothing usable.
    pub fn fallback() -> Self {
        Self::new(DEFAULT_CATEGORY, "")
    }

    /// `type + " " + description`, the text handed to the category resolver.
    pub fn rule_text(&self) -> String {
        format!("{} {}", self.entry_type, self.description)
    }
}

/// Turns one raw memo (plus the block's `TRNTYPE`, when present) into
/// display parts. One implementation per bank export convention.
pub trait MemoStrategy: Send + Sync {
    fn classify(&self, memo: &str, trn_type: Option<&str>) -> MemoParts;
}

/// The strategy an import batch from `bank` is parsed with.
pub fn memo_strategy(bank: Bank) -> &'static dyn MemoStrategy {
    match bank {
        Bank::BancoDoBrasil => &HyphenSplitter,
        Bank::C6 => &C6Classifier,
    }
}
