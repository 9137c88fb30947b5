use crate::commands::{CmdMessage, CmdResult, GreenGrowPaths};
use crate::config::GreenGrowConfig;
use crate::error::Result;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(paths: &GreenGrowPaths, action: ConfigAction) -> Result<CmdResult> {
    let dir = &paths.data_dir;
    match action {
        ConfigAction::ShowAll => {
            let config = GreenGrowConfig::load(dir)?;
            Ok(CmdResult::default().with_config(config))
        }
        ConfigAction::ShowKey(key) => {
            let config = GreenGrowConfig::load(dir)?;
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::info(config.get(&key)?));
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            let mut config = GreenGrowConfig::load(dir)?;
            config.set(&key, &value)?;
            config.save(dir)?;
            let display_val = config.get(&key)?;
            let mut result = CmdResult::default().with_config(config);
            result.add_message(CmdMessage::success(format!(
                "{} set to {}",
                key, display_val
            )));
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SalePolicy;
    use crate::error::GreenGrowError;
    use tempfile::TempDir;

    fn paths(temp: &TempDir) -> GreenGrowPaths {
        GreenGrowPaths {
            data_dir: temp.path().to_path_buf(),
            database: temp.path().join("store.db"),
        }
    }

    #[test]
    fn set_persists_and_show_reads_back() {
        let temp = TempDir::new().unwrap();
        let paths = paths(&temp);

        let result = run(
            &paths,
            ConfigAction::Set("sale-policy".into(), "single-entry".into()),
        )
        .unwrap();
        assert_eq!(result.messages[0].content, "sale-policy set to single-entry");

        let shown = run(&paths, ConfigAction::ShowKey("sale_policy".into())).unwrap();
        assert_eq!(shown.messages[0].content, "single-entry");

        let all = run(&paths, ConfigAction::ShowAll).unwrap();
        assert_eq!(all.config.unwrap().sale_policy, SalePolicy::SingleEntry);
    }

    #[test]
    fn unknown_key_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = run(&paths(&temp), ConfigAction::ShowKey("colour".into())).unwrap_err();
        assert!(matches!(err, GreenGrowError::Config(_)));
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn invalid_value_is_not_saved() {
        let temp = TempDir::new().unwrap();
        let paths = paths(&temp);
        assert!(run(
            &paths,
            ConfigAction::Set("sale-policy".into(), "lifo".into())
        )
        .is_err());
        assert!(!temp.path().join("config.json").exists());
    }
}
