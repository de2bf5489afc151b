use extrato_core::CategoryRuleSet;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::StorageError;

/// One `descricao,tag` row of the override file.
#[derive(Debug, Serialize, Deserialize)]
struct OverrideRow {
    #[serde(rename = "descricao")]
    key: String,
    #[serde(rename = "tag")]
    category: String,
}

/// Reads the override file. A missing file is an empty set; unreadable
/// rows are skipped with a warning. Later rows replace earlier ones.
pub fn load_overrides(path: &Path) -> Result<CategoryRuleSet, StorageError> {
    if !path.exists() {
        return Ok(CategoryRuleSet::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut set = CategoryRuleSet::new();
    for (line, result) in reader.deserialize::<OverrideRow>().enumerate() {
        match result {
            Ok(row) => {
                set.insert(row.key, row.category);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), row = line + 1, "skipping override row: {e}");
            }
        }
    }
    Ok(set)
}

/// Rewrites the override file with exactly the rows of `rules`.
pub fn save_overrides(path: &Path, rules: &CategoryRuleSet) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    for (key, category) in rules.iter() {
        writer.serialize(OverrideRow {
            key: key.to_string(),
            category: category.to_string(),
        })?;
    }
    writer.flush()?;

    tracing::debug!(path = %path.display(), rules = rules.len(), "saved category overrides");
    Ok(())
}
