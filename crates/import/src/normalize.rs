//! Matching-key normalization for bank memo text.
//!
//! Every step is a small pure `&str -> String` transform so the rules can
//! be tested (and evolved) one at a time. [`normalize_str`] chains them in
//! a fixed order; the output only ever contains `a-z`, `0-9` and single
//! spaces, and normalizing twice yields the same string.

use unicode_normalization::char::canonical_combining_class;
use unicode_normalization::UnicodeNormalization;

use crate::util::collapse_whitespace;

re!(re_non_word, r"[^a-z0-9\s]");
re!(re_date_token, r"\b\d{4,8}\b");
re!(re_time_token, r"\b\d{1,2}[:h]\d{2}\b");
re!(re_memo_token, r"\bmemo\b");
re!(re_rs_memo_token, r"\brs\s*memo\b");
re!(re_loose_hyphen, r"\s*-\s*");

/// Normalizes optional text; absent input becomes the empty string.
pub fn normalize(text: Option<&str>) -> String {
    text.map(normalize_str).unwrap_or_default()
}

pub fn normalize_str(text: &str) -> String {
    let text = text.to_lowercase();
    let text = strip_accents(text.trim());
    let text = keep_word_chars(&text);
    let text = strip_date_tokens(&text);
    let text = strip_time_tokens(&text);
    let text = strip_memo_tokens(&text);
    let text = collapse_whitespace(&text);
    let text = strip_loose_hyphens(&text);
    // Removals above can leave a date-like token standing on its own.
    let text = strip_date_tokens(text.trim());
    collapse_whitespace(&text)
}

/// NFKD-decomposes and drops every combining mark (`ç` → `c`, `ã` → `a`).
pub fn strip_accents(text: &str) -> String {
    text.nfkd()
        .filter(|c| canonical_combining_class(*c) == 0)
        .collect()
}

pub fn keep_word_chars(text: &str) -> String {
    re_non_word().replace_all(text, "").into_owned()
}

/// Blanks standalone 4–8 digit runs such as `0205` or `20240501`.
pub fn strip_date_tokens(text: &str) -> String {
    re_date_token().replace_all(text, " ").into_owned()
}

/// Blanks clock times such as `10:20` or `19h30`.
pub fn strip_time_tokens(text: &str) -> String {
    re_time_token().replace_all(text, " ").into_owned()
}

pub fn strip_memo_tokens(text: &str) -> String {
    let text = re_memo_token().replace_all(text, " ");
    re_rs_memo_token().replace_all(&text, " ").into_owned()
}

pub fn strip_loose_hyphens(text: &str) -> String {
    re_loose_hyphen().replace_all(text, " ").trim().to_string()
}

/// Display casing: a letter is upper-cased when it starts the string or
/// follows a non-letter, and lower-cased otherwise.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut after_letter = false;
    for c in text.chars() {
        if after_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        after_letter = c.is_alphabetic();
    }
    out
}
