#[macro_use]
pub(crate) mod util;

pub mod c6;
pub mod memo;
pub mod normalize;
pub mod ofx;
pub mod rules;
pub mod splitter;

pub use c6::{classify_c6, C6Classifier};
pub use memo::{memo_strategy, MemoParts, MemoStrategy};
pub use normalize::{normalize, normalize_str, title_case};
pub use ofx::{OfxBlock, OfxError, OfxParser};
pub use rules::{
    known_categories, learn_overrides, overrides_from_rows, CategoryResolver, DictionaryEntry,
    DictionaryError, StaticCategoryDictionary,
};
pub use splitter::{split_memo, HyphenSplitter};

pub mod import {
    use crate::*;
    use extrato_core::{Bank, CategoryRuleSet, TransactionRecord};

    pub fn import_ofx(
        data: &[u8],
        bank: Bank,
        overrides: &CategoryRuleSet,
    ) -> Vec<TransactionRecord> {
        OfxParser::new(bank).parse_bytes(data, overrides)
    }

    pub fn import_ofx_file(
        path: &std::path::Path,
        bank: Bank,
        overrides: &CategoryRuleSet,
    ) -> Result<Vec<TransactionRecord>, OfxError> {
        let text = crate::ofx::read_file(path)?;
        Ok(OfxParser::new(bank).parse(&text, overrides))
    }

    pub fn create_resolver(dictionary: Option<StaticCategoryDictionary>) -> CategoryResolver {
        CategoryResolver::new(dictionary.unwrap_or_default())
    }
}
