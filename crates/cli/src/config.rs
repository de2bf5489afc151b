use anyhow::{Context, Result};
use extrato_import::StaticCategoryDictionary;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "extrato.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite ledger file.
    pub database: PathBuf,
    /// CSV file holding the learned category overrides.
    pub overrides: PathBuf,
    /// Optional TOML dictionary replacing the built-in keyword list.
    pub dictionary: Option<PathBuf>,
    /// Ledger owner used when a command gets no `--user`.
    pub user: String,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = data_dir();
        Self {
            database: data_dir.join("ledger.db"),
            overrides: data_dir.join("categorias_personalizadas.csv"),
            dictionary: None,
            user: "default".to_string(),
        }
    }
}

impl Config {
    pub fn load_dictionary(&self) -> Result<StaticCategoryDictionary> {
        let Some(path) = &self.dictionary else {
            return Ok(StaticCategoryDictionary::builtin());
        };
        let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        StaticCategoryDictionary::from_toml(&s)
            .with_context(|| format!("parse dictionary {}", path.display()))
    }

    pub fn owner<'a>(&'a self, user: Option<&'a str>) -> &'a str {
        user.unwrap_or(self.user.as_str())
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("br", "extrato", "Extrato")
}

pub fn data_dir() -> PathBuf {
    project_dirs()
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".extrato"))
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join(CONFIG_FILE))
}

/// An explicit path must exist; the default location may be absent, in
/// which case built-in defaults apply.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(Config::default()),
        },
    };
    let s = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    Ok(toml::from_str(s)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn partial_file_overrides_fields() {
        let cfg = parse_config(
            r#"
database = "/tmp/x/ledger.db"
user = "ana"
"#,
        )
        .unwrap();
        assert_eq!(cfg.database, PathBuf::from("/tmp/x/ledger.db"));
        assert_eq!(cfg.user, "ana");
        assert_eq!(cfg.overrides, Config::default().overrides);
        assert!(cfg.dictionary.is_none());
    }

    #[test]
    fn malformed_config_errors() {
        assert!(parse_config("database = [").is_err());
    }

    #[test]
    fn explicit_missing_path_errors() {
        assert!(load_config(Some(Path::new("/definitely/not/extrato.toml"))).is_err());
    }

    #[test]
    fn owner_prefers_flag() {
        let cfg = Config::default();
        assert_eq!(cfg.owner(Some("bruno")), "bruno");
        assert_eq!(cfg.owner(None), "default");
    }

    #[test]
    fn dictionary_file_replaces_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dict.toml");
        fs::write(&path, "[[entry]]\nkeyword = \"uber\"\ncategory = \"Transporte\"\n").unwrap();
        let cfg = Config {
            dictionary: Some(path),
            ..Config::default()
        };
        let dict = cfg.load_dictionary().unwrap();
        assert_eq!(dict.lookup("compra uber"), Some("Transporte"));
        assert_eq!(Config::default().load_dictionary().unwrap().len(), 37);
    }
}
