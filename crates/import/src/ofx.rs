use std::borrow::Cow;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use encoding_rs::WINDOWS_1252;
use extrato_core::{Bank, CategoryRuleSet, Money, TransactionRecord};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::memo::{memo_strategy, MemoParts};
use crate::rules::CategoryResolver;

re!(re_block, r"(?s)<STMTTRN>(.*?)</STMTTRN>");
re!(re_posted, r"<DTPOSTED>([0-9]+)");
re!(re_amount, r"<TRNAMT>(-?[0-9]+\.[0-9]+)");
re!(re_memo, r"<MEMO>(.*)");
re!(re_trn_type, r"<TRNTYPE>([A-Z]+)");

#[derive(Error, Debug)]
pub enum OfxError {
    #[error("Failed to read OFX file: {0}")]
    Io(#[from] std::io::Error),
}

/// Raw fields of one `<STMTTRN>` block. Every field is optional in the
/// export and degrades to a default here.
#[derive(Debug, Clone, PartialEq)]
pub struct OfxBlock<'a> {
    pub date: Option<NaiveDate>,
    pub amount: Money,
    pub memo: &'a str,
    pub trn_type: Option<&'a str>,
}

impl<'a> OfxBlock<'a> {
    fn from_body(body: &'a str) -> Self {
        let date = capture(re_posted(), body).and_then(parse_ofx_date);
        let amount = capture(re_amount(), body)
            .and_then(parse_ofx_amount)
            .unwrap_or_else(Money::zero);
        let memo = capture(re_memo(), body).map(str::trim).unwrap_or_default();
        let trn_type = capture(re_trn_type(), body);
        Self {
            date,
            amount,
            memo,
            trn_type,
        }
    }
}

fn capture<'a>(re: &regex::Regex, text: &'a str) -> Option<&'a str> {
    re.captures(text).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Every `<STMTTRN>…</STMTTRN>` block in document order. Text outside the
/// markers, including unterminated blocks, is ignored.
pub fn blocks(text: &str) -> impl Iterator<Item = OfxBlock<'_>> + '_ {
    re_block()
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| OfxBlock::from_body(m.as_str()))
}

/// Parses statement text for one bank into categorized records.
pub struct OfxParser {
    bank: Bank,
    resolver: CategoryResolver,
}

impl OfxParser {
    pub fn new(bank: Bank) -> Self {
        Self::with_resolver(bank, CategoryResolver::default())
    }

    pub fn with_resolver(bank: Bank, resolver: CategoryResolver) -> Self {
        Self { bank, resolver }
    }

    /// Lazily yields one record per block; call again to restart.
    pub fn records<'a>(
        &'a self,
        text: &'a str,
        overrides: &'a CategoryRuleSet,
    ) -> impl Iterator<Item = TransactionRecord> + 'a {
        let strategy = memo_strategy(self.bank);
        blocks(text).map(move |block| {
            let parts = strategy.classify(block.memo, block.trn_type);
            self.build_record(block, parts, overrides)
        })
    }

    pub fn parse(&self, text: &str, overrides: &CategoryRuleSet) -> Vec<TransactionRecord> {
        let records: Vec<_> = self.records(text, overrides).collect();
        tracing::debug!(
            bank = %self.bank,
            records = records.len(),
            overrides = overrides.len(),
            "parsed OFX statement"
        );
        records
    }

    pub fn parse_bytes(&self, data: &[u8], overrides: &CategoryRuleSet) -> Vec<TransactionRecord> {
        self.parse(&decode(data), overrides)
    }

    fn build_record(
        &self,
        block: OfxBlock<'_>,
        parts: MemoParts,
        overrides: &CategoryRuleSet,
    ) -> TransactionRecord {
        let category = self.resolver.resolve(&parts.rule_text(), overrides);
        tracing::trace!(
            memo = block.memo,
            amount = %block.amount,
            entry_type = %parts.entry_type,
            category = %category,
            "classified block"
        );
        TransactionRecord {
            bank: self.bank,
            date: block.date,
            entry_type: parts.entry_type,
            description: parts.description,
            amount: block.amount,
            category,
        }
    }
}

/// Decodes exported bytes as a single-byte Western encoding. Never fails:
/// every byte value maps to some character. Leading bytes that look like a
/// byte-order mark are decoded as text too.
pub fn decode(data: &[u8]) -> Cow<'_, str> {
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(data);
    text
}

pub fn read_file(path: &Path) -> Result<String, OfxError> {
    let data = std::fs::read(path)?;
    Ok(decode(&data).into_owned())
}

/// Parses with the built-in category dictionary.
pub fn parse(text: &str, bank: Bank, overrides: &CategoryRuleSet) -> Vec<TransactionRecord> {
    OfxParser::new(bank).parse(text, overrides)
}

/// Only the leading `YYYYMMDD` is read; any time or zone suffix is ignored.
fn parse_ofx_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.len() < 8 || !s.is_char_boundary(8) {
        return None;
    }
    let y: i32 = s[0..4].parse().ok()?;
    let m: u32 = s[4..6].parse().ok()?;
    let d: u32 = s[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(y, m, d)
}

/// Amounts that cannot be stored as `i64` cents are treated as unreadable.
fn parse_ofx_amount(s: &str) -> Option<Money> {
    let amount = Money::from_decimal(Decimal::from_str(s.trim()).ok()?);
    amount.to_cents().map(|_| amount)
}
