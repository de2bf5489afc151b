use extrato_core::{CategoryRuleSet, TransactionRecord, DEFAULT_CATEGORY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::normalize::normalize_str;

/// Built-in keyword dictionary. Declared order is significant: the first
/// keyword found in the text wins.
const BUILTIN_CATEGORIES: &[(&str, &str)] = &[
    ("aluguel", "Aluguel"),
    ("imovel", "Aluguel"),
    ("supermercado", "Mercado"),
    ("mercado", "Mercado"),
    ("padaria", "Mercado"),
    ("farmacia", "Saúde"),
    ("droga", "Saúde"),
    ("hospital", "Saúde"),
    ("consultorio", "Saúde"),
    ("saude", "Saúde"),
    ("bb rende fácil", "Investimento Automático"),
    ("bb rf ref di", "Investimento Automático"),
    ("rende facil", "Investimento Automático"),
    ("depósito online taa", "Depósito Caixa Eletrônico"),
    ("atm", "Depósito Caixa Eletrônico"),
    ("samantha treib", "Pensão"),
    ("rge", "Energia Elétrica"),
    ("ebanx", "Lazer"),
    ("pix - recebido", "PIX Recebimento"),
    ("comercial zaffari", "Mercado"),
    ("telecom", "Internet"),
    ("pet", "Pet-Shop"),
    ("impostos", "Impostos"),
    ("posto", "Veículo"),
    ("seguros", "Seguros"),
    ("seguro", "Seguros"),
    ("tarifa", "Tarifa"),
    ("não identificado", "Não identificado"),
    ("compras", "Compras"),
    ("desenvolvimento h", "Saúde"),
    ("regis gruber leivas", "Mesada"),
    ("colegio maua", "Educacao"),
    ("transferência entre contas", "Transferência Pessoal"),
    ("empréstimo", "Empréstimo"),
    ("vestuário", "Vestuário"),
    ("borba imoveis", "Aluguel"),
    ("manutencao", "Manutenção"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub keyword: String,
    pub category: String,
}

#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("Failed to parse category dictionary: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Fixed, ordered keyword → category list, matched by substring.
///
/// Keywords are compared verbatim against normalized text, so a keyword
/// with accents or punctuation can never match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticCategoryDictionary {
    entries: Vec<DictionaryEntry>,
}

#[derive(Deserialize)]
struct DictionaryFile {
    #[serde(rename = "entry", default)]
    entries: Vec<DictionaryEntry>,
}

impl StaticCategoryDictionary {
    pub fn new(entries: Vec<DictionaryEntry>) -> Self {
        Self { entries }
    }

    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_CATEGORIES.iter().copied())
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(keyword, category)| DictionaryEntry {
                    keyword: keyword.to_string(),
                    category: category.to_string(),
                })
                .collect(),
        )
    }

    /// Reads `[[entry]]` tables, keeping file order:
    ///
    /// ```toml
    /// [[entry]]
    /// keyword = "supermercado"
    /// category = "Mercado"
    /// ```
    pub fn from_toml(toml_content: &str) -> Result<Self, DictionaryError> {
        let file: DictionaryFile = toml::from_str(toml_content)?;
        Ok(Self::new(file.entries))
    }

    /// Category of the first entry whose keyword occurs in `normalized`.
    pub fn lookup(&self, normalized: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| normalized.contains(e.keyword.as_str()))
            .map(|e| e.category.as_str())
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.category.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StaticCategoryDictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Assigns a category: user overrides (exact match on normalized text),
/// then the static dictionary (substring, declared order), then `"Outros"`.
#[derive(Debug, Clone, Default)]
pub struct CategoryResolver {
    dictionary: StaticCategoryDictionary,
}

impl CategoryResolver {
    pub fn new(dictionary: StaticCategoryDictionary) -> Self {
        Self { dictionary }
    }

    pub fn dictionary(&self) -> &StaticCategoryDictionary {
        &self.dictionary
    }

    pub fn resolve(&self, text: &str, overrides: &CategoryRuleSet) -> String {
        let normalized = normalize_str(text);
        overrides
            .get(&normalized)
            .or_else(|| self.dictionary.lookup(&normalized))
            .unwrap_or(DEFAULT_CATEGORY)
            .to_string()
    }
}

/// Builds an override set from stored `(description, category)` rows,
/// normalizing each key. Later rows replace earlier ones.
pub fn overrides_from_rows<K, V>(rows: impl IntoIterator<Item = (K, V)>) -> CategoryRuleSet
where
    K: AsRef<str>,
    V: Into<String>,
{
    rows.into_iter()
        .map(|(key, category)| (normalize_str(key.as_ref()), category.into()))
        .collect()
}

/// Learns overrides from a (user-corrected) ledger: each record teaches
/// `normalize(type + " " + description) → category`.
pub fn learn_overrides<'a>(records: impl IntoIterator<Item = &'a TransactionRecord>) -> CategoryRuleSet {
    overrides_from_rows(
        records
            .into_iter()
            .map(|r| (r.rule_text(), r.category.clone())),
    )
}

/// Every category a user may pick when editing: those already in the
/// ledger, the dictionary's labels and the default, sorted and unique.
pub fn known_categories<'a>(
    history: impl IntoIterator<Item = &'a TransactionRecord>,
    dictionary: &StaticCategoryDictionary,
) -> Vec<String> {
    let mut set: BTreeSet<String> = history.into_iter().map(|r| r.category.clone()).collect();
    set.extend(dictionary.categories().map(str::to_string));
    set.insert(DEFAULT_CATEGORY.to_string());
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use extrato_core::{Bank, Money};

    fn record(entry_type: &str, description: &str, category: &str) -> TransactionRecord {
        TransactionRecord {
            bank: Bank::BancoDoBrasil,
            date: None,
            entry_type: entry_type.to_string(),
            description: description.to_string(),
            amount: Money::from_cents(-1000),
            category: category.to_string(),
        }
    }

    fn resolver() -> CategoryResolver {
        CategoryResolver::default()
    }

    // ── precedence ────────────────────────────────────────────────────────────

    #[test]
    fn override_beats_dictionary() {
        let overrides: CategoryRuleSet =
            [("compra supermercado", "Alimentação")].into_iter().collect();
        assert_eq!(
            resolver().resolve("Compra Supermercado", &overrides),
            "Alimentação"
        );
        assert_eq!(
            resolver().resolve("Compra Supermercado", &CategoryRuleSet::new()),
            "Mercado"
        );
    }

    #[test]
    fn override_requires_exact_match() {
        let overrides: CategoryRuleSet = [("compra", "Compras Online")].into_iter().collect();
        assert_eq!(
            resolver().resolve("Compra Supermercado", &overrides),
            "Mercado"
        );
    }

    #[test]
    fn override_key_compared_after_normalization() {
        let overrides: CategoryRuleSet =
            [("pix enviado joao silva", "Mesada")].into_iter().collect();
        assert_eq!(
            resolver().resolve("Pix Enviado  João Silva 0205", &overrides),
            "Mesada"
        );
    }

    #[test]
    fn unknown_text_falls_back_to_outros() {
        assert_eq!(
            resolver().resolve("xyz unknown text", &CategoryRuleSet::new()),
            "Outros"
        );
        assert_eq!(resolver().resolve("", &CategoryRuleSet::new()), "Outros");
    }

    // ── dictionary ────────────────────────────────────────────────────────────

    #[test]
    fn first_declared_keyword_wins() {
        // "posto" (Veículo) is declared before "tarifa" (Tarifa).
        assert_eq!(
            resolver().resolve("Tarifa Posto Ipiranga", &CategoryRuleSet::new()),
            "Veículo"
        );
    }

    #[test]
    fn keywords_match_as_substrings() {
        // "pet" is found inside "competencia".
        assert_eq!(
            resolver().resolve("Debito Competencia", &CategoryRuleSet::new()),
            "Pet-Shop"
        );
    }

    #[test]
    fn accented_keywords_never_match_normalized_text() {
        let dict = StaticCategoryDictionary::builtin();
        assert_eq!(dict.lookup("bb rende facil"), Some("Investimento Automático"));
        assert_eq!(dict.lookup("emprestimo pessoal"), None);
    }

    #[test]
    fn builtin_keeps_declared_order() {
        let dict = StaticCategoryDictionary::builtin();
        assert_eq!(dict.len(), 37);
        let labels: Vec<&str> = dict.categories().collect();
        assert_eq!(labels[0], "Aluguel");
        assert_eq!(labels[36], "Manutenção");
    }

    #[test]
    fn injected_dictionary_replaces_builtin() {
        let resolver = CategoryResolver::new(StaticCategoryDictionary::from_pairs([
            ("uber", "Transporte"),
        ]));
        assert_eq!(
            resolver.resolve("Compra Uber Trip", &CategoryRuleSet::new()),
            "Transporte"
        );
        assert_eq!(
            resolver.resolve("Compra Supermercado", &CategoryRuleSet::new()),
            "Outros"
        );
    }

    #[test]
    fn from_toml_keeps_file_order() {
        let toml = r#"
[[entry]]
keyword = "mercado"
category = "Mercado"

[[entry]]
keyword = "supermercado"
category = "Supermercado"
"#;
        let dict = StaticCategoryDictionary::from_toml(toml).unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.lookup("compra supermercado"), Some("Mercado"));
    }

    #[test]
    fn from_toml_rejects_malformed() {
        assert!(StaticCategoryDictionary::from_toml("[[entry]]\nkeyword = 3").is_err());
    }

    // ── learning ──────────────────────────────────────────────────────────────

    #[test]
    fn learn_overrides_normalizes_and_last_wins() {
        let history = vec![
            record("Pix Enviado", "João Silva", "Mesada"),
            record("Compra Com Cartao", "Posto Shell", "Veículo"),
            record("Pix Enviado", "Joao Silva", "Pensão"),
        ];
        let overrides = learn_overrides(&history);
        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides.get("pix enviado joao silva"), Some("Pensão"));
        assert_eq!(overrides.get("compra com cartao posto shell"), Some("Veículo"));
    }

    #[test]
    fn learned_overrides_take_effect() {
        let history = vec![record("Pix Enviado", "Joao Silva", "Mesada")];
        let overrides = learn_overrides(&history);
        assert_eq!(
            resolver().resolve("Pix Enviado Joao Silva", &overrides),
            "Mesada"
        );
    }

    #[test]
    fn overrides_from_rows_normalizes_keys() {
        let set = overrides_from_rows([("Compra  Padaria 1505", "Mercado")]);
        assert_eq!(set.get("compra padaria"), Some("Mercado"));
    }

    #[test]
    fn known_categories_are_sorted_and_unique() {
        let history = vec![
            record("Pix", "A", "Mesada"),
            record("Pix", "B", "Mercado"),
        ];
        let cats = known_categories(&history, &StaticCategoryDictionary::from_pairs([
            ("padaria", "Mercado"),
        ]));
        assert_eq!(cats, vec!["Mercado", "Mesada", "Outros"]);
    }
}
