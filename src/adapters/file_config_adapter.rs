//! INI file configuration adapter.
//!
//! Section and key names are case-insensitive; `configparser` lowercases
//! them on load.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }

    fn has_section(&self, section: &str) -> bool {
        let wanted = section.to_lowercase();
        self.config.sections().iter().any(|s| *s == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[backtest]
instruments = RELIANCE.NS, INFY.NS, TCS.NS
lookback_days = 180
end_date = 2024-06-30

[strategy]
rsi_period = 14
rsi_entry_threshold = 30.0
hold_days = 5

[data]
source = csv
csv_dir = data

[output]
results_dir = backtest_results
"#;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_backtest_config() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(
            adapter.get_string("backtest", "instruments"),
            Some("RELIANCE.NS, INFY.NS, TCS.NS".to_string())
        );
        assert_eq!(adapter.get_int("backtest", "lookback_days", 0), 180);
        assert_eq!(adapter.get_double("strategy", "rsi_entry_threshold", 0.0), 30.0);
        assert_eq!(adapter.get_string("data", "source"), Some("csv".to_string()));
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_string("backtest", "missing"), None);
        assert_eq!(adapter.get_string("telegram", "token"), None);
    }

    #[test]
    fn numeric_getters_fall_back_to_default() {
        let adapter =
            FileConfigAdapter::from_string("[strategy]\nhold_days = abc\nrsi_entry_threshold = x\n")
                .unwrap();
        assert_eq!(adapter.get_int("strategy", "hold_days", 5), 5);
        assert_eq!(adapter.get_int("strategy", "rsi_period", 14), 14);
        assert_eq!(adapter.get_double("strategy", "rsi_entry_threshold", 30.0), 30.0);
    }

    #[test]
    fn get_bool_variants() {
        let adapter =
            FileConfigAdapter::from_string("[telegram]\na = yes\nb = FALSE\nc = maybe\n").unwrap();
        assert!(adapter.get_bool("telegram", "a", false));
        assert!(!adapter.get_bool("telegram", "b", true));
        assert!(adapter.get_bool("telegram", "c", true));
        assert!(!adapter.get_bool("telegram", "missing", false));
    }

    #[test]
    fn has_section_is_case_insensitive() {
        let adapter = FileConfigAdapter::from_string("[Telegram]\ntoken = abc\n").unwrap();
        assert!(adapter.has_section("telegram"));
        assert!(adapter.has_section("TELEGRAM"));
        assert!(!adapter.has_section("data"));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config(SAMPLE);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("output", "results_dir"),
            Some("backtest_results".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        assert!(FileConfigAdapter::from_file("/nonexistent/path/config.ini").is_err());
    }
}
