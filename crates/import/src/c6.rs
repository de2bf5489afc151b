//! C6 exports do not follow the `type - description` memo convention: the
//! memo is free text and the kind of movement lives in `TRNTYPE`. Types are
//! assigned from the code plus a few memo keywords, and anything with an
//! unrecognized code falls back to the generic splitter.

use crate::memo::{MemoParts, MemoStrategy};
use crate::normalize::{normalize_str, title_case};
use crate::splitter::split_memo;
use crate::util::collapse_whitespace;

re!(re_rs_memo, r"(?i)\brs\s*memo\b");
re!(re_memo, r"(?i)\bmemo\b");

pub fn classify_c6(raw_memo: &str, trn_type: Option<&str>) -> MemoParts {
    let memo = raw_memo.to_lowercase();
    let code = trn_type.map(|c| c.trim().to_uppercase());

    let parts = match code.as_deref() {
        Some("DEBIT") => classify_debit(&memo),
        Some("CREDIT") => classify_credit(&memo),
        _ => split_memo(Some(raw_memo)),
    };

    MemoParts::new(
        title_case(&normalize_str(&parts.entry_type)),
        clean_memo(&parts.description),
    )
}

fn classify_debit(memo: &str) -> MemoParts {
    if memo.contains("boleto") {
        MemoParts::new("Pagamento De Boleto", "Boleto")
    } else if memo.contains("fatura") {
        MemoParts::new("Pagamento Fatura Cartão", "Fatura Cartão")
    } else if memo.contains("pix") || memo.contains("enviado") {
        MemoParts::new("Pix Enviado", clean_memo(memo))
    } else {
        MemoParts::new("Compra Com Cartão", clean_memo(memo))
    }
}

fn classify_credit(memo: &str) -> MemoParts {
    if memo.contains("pix") || memo.contains("recebido") {
        MemoParts::new("Pix Recebido", clean_memo(memo))
    } else {
        MemoParts::new("Crédito", clean_memo(memo))
    }
}

/// Normalized, noise-free, title-cased memo text.
pub fn clean_memo(text: &str) -> String {
    let text = normalize_str(text);
    let text = re_rs_memo().replace_all(&text, " ");
    let text = re_memo().replace_all(&text, " ");
    title_case(&collapse_whitespace(&text))
}

/// Memo strategy for C6 Bank exports.
pub struct C6Classifier;

impl MemoStrategy for C6Classifier {
    fn classify(&self, memo: &str, trn_type: Option<&str>) -> MemoParts {
        classify_c6(memo, trn_type)
    }
}
