//! Generic memo splitting for exports that write `type - description`.
//!
//! Hyphen count decides the split:
//! - two or more: the type runs up to the second hyphen (so
//!   `Pix - Enviado - Joao` gives `Pix Enviado` / `Joao`);
//! - exactly one: type before it, description after it;
//! - none: first word is the type, the rest is the description.
//!
//! Descriptions that themselves contain hyphens split imprecisely. User
//! category overrides are keyed on these exact splits, so the behavior is
//! kept as is.

use crate::memo::{MemoParts, MemoStrategy};
use crate::normalize::{normalize_str, title_case};
use crate::util::collapse_whitespace;

re!(re_memo_tag, r"(?i)</?MEMO>");
re!(re_memo_word, r"(?i)\bmemo\b");
re!(re_separator, r"\s*-\s*");
re!(re_hyphens_only, r"^\s*-+\s*$");
re!(re_leading_dates, r"^(\d{4,8}\s*)+");
re!(re_leading_times, r"^(\d{1,2}[:h]\d{2}\s*)+");

/// Splits a raw memo into display-ready type and description.
pub fn split_memo(raw: Option<&str>) -> MemoParts {
    let Some(raw) = raw else {
        return MemoParts::fallback();
    };

    let text = strip_memo_markup(raw);
    if text.is_empty() || is_hyphens_only(&text) {
        return MemoParts::fallback();
    }

    let Some((entry_type, rest)) = split_on_separators(&text) else {
        return MemoParts::fallback();
    };
    if entry_type.is_empty() || is_hyphens_only(&entry_type) {
        return MemoParts::fallback();
    }

    let rest = strip_leading_timestamps(&rest);
    let entry_type = normalize_str(&entry_type);
    let description = normalize_str(&rest);
    if entry_type.is_empty() || is_hyphens_only(&entry_type) {
        return MemoParts::fallback();
    }

    MemoParts::new(title_case(&entry_type), title_case(&description))
}

fn strip_memo_markup(raw: &str) -> String {
    let text = re_memo_tag().replace_all(raw.trim(), " ");
    let text = re_memo_word().replace_all(&text, " ");
    collapse_whitespace(&text)
}

fn is_hyphens_only(text: &str) -> bool {
    re_hyphens_only().is_match(text)
}

/// Returns `(type, rest)` per the hyphen-count rule, or `None` when nothing
/// usable is left.
fn split_on_separators(text: &str) -> Option<(String, String)> {
    let separators: Vec<_> = re_separator().find_iter(text).collect();
    match separators.as_slice() {
        [_, second, ..] => {
            let entry_type = text[..second.start()].replace('-', " ");
            Some((
                entry_type.trim().to_string(),
                text[second.end()..].trim().to_string(),
            ))
        }
        [only] => Some((
            text[..only.start()].trim().to_string(),
            text[only.end()..].trim().to_string(),
        )),
        [] => {
            let mut words = text.split_whitespace();
            let first = words.next()?;
            let rest: Vec<&str> = words.collect();
            if rest.is_empty() && is_hyphens_only(first) {
                return None;
            }
            Some((first.to_string(), rest.join(" ")))
        }
    }
}

/// Drops any run of leading date-like, then time-like, tokens.
fn strip_leading_timestamps(text: &str) -> String {
    let text = re_leading_dates().replace(text, "");
    let text = re_leading_times().replace(&text, "");
    text.trim_start().to_string()
}

/// Memo strategy for exports following the `type - description` convention.
pub struct HyphenSplitter;

impl MemoStrategy for HyphenSplitter {
    fn classify(&self, memo: &str, _trn_type: Option<&str>) -> MemoParts {
        split_memo(Some(memo))
    }
}
