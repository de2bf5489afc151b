use anyhow::{Context, Result};
use extrato_core::{Bank, CategoryRuleSet, TransactionRecord};
use extrato_import::{
    known_categories, learn_overrides, ofx, overrides_from_rows, CategoryResolver, OfxParser,
};
use extrato_storage::DbPool;
use std::path::Path;

use crate::config::Config;

async fn open_ledger(config: &Config) -> Result<DbPool> {
    if let Some(parent) = config.database.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create {}", parent.display()))?;
    }
    extrato_storage::create_db(&config.database)
        .await
        .with_context(|| format!("open ledger {}", config.database.display()))
}

/// Stored overrides, with keys re-normalized in case the file was edited by hand.
fn load_overrides(config: &Config) -> Result<CategoryRuleSet> {
    let stored = extrato_storage::load_overrides(&config.overrides)
        .with_context(|| format!("read overrides {}", config.overrides.display()))?;
    Ok(overrides_from_rows(stored.iter()))
}

async fn relearn(config: &Config, pool: &DbPool, owner: &str) -> Result<CategoryRuleSet> {
    let history = extrato_storage::load_history(pool, owner).await?;
    let learned = learn_overrides(&history);
    extrato_storage::save_overrides(&config.overrides, &learned)
        .with_context(|| format!("write overrides {}", config.overrides.display()))?;
    tracing::info!(owner, rules = learned.len(), "relearned category overrides");
    Ok(learned)
}

/// Parses one statement. With `save`, the records are appended to the
/// owner's ledger and the overrides are relearned from the full history.
pub async fn import(
    config: &Config,
    file: &Path,
    bank: Bank,
    save: bool,
    owner: &str,
) -> Result<Vec<TransactionRecord>> {
    let text = ofx::read_file(file).with_context(|| format!("read {}", file.display()))?;
    let overrides = load_overrides(config)?;
    let parser = OfxParser::with_resolver(bank, CategoryResolver::new(config.load_dictionary()?));
    let records = parser.parse(&text, &overrides);
    tracing::info!(file = %file.display(), %bank, records = records.len(), "imported statement");

    if save {
        let pool = open_ledger(config).await?;
        extrato_storage::append_records(&pool, owner, &records).await?;
        relearn(config, &pool, owner).await?;
        pool.close().await;
    }

    Ok(records)
}

pub async fn history(config: &Config, owner: &str) -> Result<Vec<TransactionRecord>> {
    let pool = open_ledger(config).await?;
    let history = extrato_storage::load_history(&pool, owner).await?;
    pool.close().await;
    Ok(history)
}

pub async fn learn(config: &Config, owner: &str) -> Result<CategoryRuleSet> {
    let pool = open_ledger(config).await?;
    let learned = relearn(config, &pool, owner).await?;
    pool.close().await;
    Ok(learned)
}

pub async fn categories(config: &Config, owner: &str) -> Result<Vec<String>> {
    let history = history(config, owner).await?;
    Ok(known_categories(&history, &config.load_dictionary()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATEMENT: &str = "<STMTTRN>\n<TRNTYPE>DEBIT\n<DTPOSTED>20240115\n<TRNAMT>-80.00\n<MEMO>PIX ENVIADO JOAO SILVA\n</STMTTRN>\n<STMTTRN>\n<TRNTYPE>DEBIT\n<TRNAMT>-35.50\n<MEMO>PADARIA CENTRAL\n</STMTTRN>";

    fn temp_config(dir: &Path) -> Config {
        Config {
            database: dir.join("data").join("ledger.db"),
            overrides: dir.join("data").join("categorias.csv"),
            dictionary: None,
            user: "ana".to_string(),
        }
    }

    fn write_statement(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("extrato.ofx");
        std::fs::write(&path, STATEMENT).unwrap();
        path
    }

    #[tokio::test]
    async fn import_without_save_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = temp_config(dir.path());
        let file = write_statement(dir.path());

        let records = import(&config, &file, Bank::C6, false, "ana").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].category, "Mercado");
        assert!(!config.database.exists());
        assert!(!config.overrides.exists());
    }

    #[tokio::test]
    async fn save_persists_and_learns() {
        let dir = tempfile::tempdir().unwrap();
        let config = temp_config(dir.path());
        let file = write_statement(dir.path());

        import(&config, &file, Bank::C6, true, "ana").await.unwrap();
        let stored = history(&config, "ana").await.unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored[1].date.is_some());

        let rules = extrato_storage::load_overrides(&config.overrides).unwrap();
        assert_eq!(
            rules.get("pix enviado pix enviado joao silva"),
            Some("Outros")
        );
    }

    #[tokio::test]
    async fn corrected_history_drives_next_import() {
        let dir = tempfile::tempdir().unwrap();
        let config = temp_config(dir.path());
        let file = write_statement(dir.path());

        let mut records = import(&config, &file, Bank::C6, false, "ana").await.unwrap();
        records[0].category = "Mesada".to_string();
        let pool = open_ledger(&config).await.unwrap();
        extrato_storage::append_records(&pool, "ana", &records).await.unwrap();
        pool.close().await;

        let learned = learn(&config, "ana").await.unwrap();
        assert_eq!(learned.len(), 2);

        let again = import(&config, &file, Bank::C6, false, "ana").await.unwrap();
        assert_eq!(again[0].category, "Mesada");
    }

    #[tokio::test]
    async fn categories_include_history_and_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = temp_config(dir.path());
        let file = write_statement(dir.path());

        let mut records = import(&config, &file, Bank::C6, false, "ana").await.unwrap();
        records[0].category = "Mesada".to_string();
        let pool = open_ledger(&config).await.unwrap();
        extrato_storage::append_records(&pool, "ana", &records).await.unwrap();
        pool.close().await;

        let cats = categories(&config, "ana").await.unwrap();
        assert!(cats.contains(&"Mesada".to_string()));
        assert!(cats.contains(&"Outros".to_string()));
        assert!(cats.contains(&"Saúde".to_string()));
    }

    #[tokio::test]
    async fn missing_statement_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = temp_config(dir.path());
        let err = import(&config, &dir.path().join("nope.ofx"), Bank::C6, false, "ana")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("nope.ofx"));
    }
}
