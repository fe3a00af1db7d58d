//! 設定ファイルの読み込み

use std::io::ErrorKind;
use std::path::Path;

use super::{
    AdapterSettings,
    ConfigError,
};

/// 設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".translate-fallback.json";

/// `dir` の設定ファイルを読み込み、検証済みの設定を返す
///
/// ファイルがなければデフォルト設定になる。
///
/// # Errors
/// - ファイル読み込みエラー
/// - JSON パースエラー
/// - バリデーションエラー
pub fn load_settings(dir: &Path) -> Result<AdapterSettings, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    let settings = match std::fs::read_to_string(&path) {
        Ok(content) => {
            tracing::debug!("Loading configuration from: {:?}", path);
            serde_json::from_str::<AdapterSettings>(&content)?
        }
        Err(error) if error.kind() == ErrorKind::NotFound => {
            tracing::debug!("No configuration at {:?}, using defaults", path);
            AdapterSettings::default()
        }
        Err(error) => return Err(error.into()),
    };

    settings.validate().map_err(ConfigError::ValidationErrors)?;
    Ok(settings)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::*;
    use tempfile::TempDir;

    use super::*;

    #[fixture]
    fn dir() -> TempDir {
        TempDir::new().unwrap()
    }

    #[rstest]
    fn reads_partial_file(dir: TempDir) {
        fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{"rootPrefix": "app."}"#).unwrap();

        let settings = load_settings(dir.path()).unwrap();

        assert_that!(settings.root_prefix, eq("app."));
        assert_that!(settings.not_found_message, eq("translation-not-found"));
    }

    #[rstest]
    fn missing_file_gives_defaults(dir: TempDir) {
        assert_that!(load_settings(dir.path()), ok(eq(&AdapterSettings::default())));
    }

    #[rstest]
    #[case::not_json("invalid json")]
    #[case::wrong_type(r#"{"trimMarkupDefaults": "yes"}"#)]
    fn unparsable_file_is_a_parse_error(dir: TempDir, #[case] content: &str) {
        fs::write(dir.path().join(CONFIG_FILE_NAME), content).unwrap();

        let result = load_settings(dir.path());

        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[rstest]
    fn invalid_values_are_rejected(dir: TempDir) {
        fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{"notFoundMessage": ""}"#).unwrap();

        let result = load_settings(dir.path());

        assert!(matches!(result, Err(ConfigError::ValidationErrors(errors)) if errors.len() == 1));
    }

    #[rstest]
    fn directory_in_place_of_file_is_an_io_error(dir: TempDir) {
        fs::create_dir(dir.path().join(CONFIG_FILE_NAME)).unwrap();

        let result = load_settings(dir.path());

        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
