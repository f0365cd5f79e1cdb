use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;

const DB_VAR: &str = "AREABUDGET_DB";
const USER_VAR: &str = "AREABUDGET_USER";
const ALLOWANCE_VAR: &str = "AREABUDGET_WEEKLY_ALLOWANCE";

pub(crate) struct Config {
    pub(crate) db_path: PathBuf,
    /// Every read and write is scoped to this user.
    pub(crate) user_id: String,
    /// Expected variable spending per week, used for the month-end projection.
    pub(crate) weekly_allowance: Decimal,
}

impl Config {
    pub(crate) fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), default_db_path)
    }

    fn from_lookup<F, D>(lookup: F, default_db: D) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
        D: FnOnce() -> Result<PathBuf>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let db_path = match non_empty(DB_VAR) {
            Some(path) => PathBuf::from(path),
            None => default_db()?,
        };

        let user_id = non_empty(USER_VAR)
            .or_else(|| non_empty("USER"))
            .unwrap_or_else(|| "local".to_string());

        let weekly_allowance = match non_empty(ALLOWANCE_VAR) {
            Some(raw) => Decimal::from_str(raw.trim())
                .with_context(|| format!("{ALLOWANCE_VAR} is not a number: {raw}"))?,
            None => Decimal::from(200),
        };

        Ok(Self {
            db_path,
            user_id,
            weekly_allowance,
        })
    }
}

fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "areabudget", "AreaBudget")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("areabudget.db"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn load_with(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned(), || Ok(PathBuf::from("/default.db")))
    }

    #[test]
    fn test_defaults() {
        let config = load_with(&[]).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/default.db"));
        assert_eq!(config.user_id, "local");
        assert_eq!(config.weekly_allowance, dec!(200));
    }

    #[test]
    fn test_overrides() {
        let config = load_with(&[
            (DB_VAR, "/tmp/x.db"),
            (USER_VAR, "alice"),
            ("USER", "root"),
            (ALLOWANCE_VAR, " 150.50 "),
        ])
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.user_id, "alice");
        assert_eq!(config.weekly_allowance, dec!(150.50));
    }

    #[test]
    fn test_falls_back_to_login_user() {
        let config = load_with(&[("USER", "bob"), (USER_VAR, "  ")]).unwrap();
        assert_eq!(config.user_id, "bob");
    }

    #[test]
    fn test_bad_allowance_is_error() {
        let err = load_with(&[(ALLOWANCE_VAR, "lots")]).err().unwrap();
        assert!(err.to_string().contains(ALLOWANCE_VAR));
    }

    #[test]
    fn test_default_db_not_consulted_when_overridden() {
        let config = Config::from_lookup(
            |key| (key == DB_VAR).then(|| "/tmp/y.db".to_string()),
            || anyhow::bail!("should not be called"),
        )
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/y.db"));
    }
}
