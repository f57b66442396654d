// Loader settings: where each granularity's feed lives and how to read it.
use crate::error::EngineError;
use serde::Deserialize;
use shared::models::Granularity;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoaderSettings {
    /// Feed address per granularity: a file path or an http(s) URL.
    pub feeds: HashMap<Granularity, String>,
    /// Forces the field delimiter; `None` detects it from the header line.
    pub delimiter: Option<char>,
    /// Instrument name used in the chart title.
    pub symbol: String,
    pub request_timeout_secs: u64,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        LoaderSettings {
            feeds: HashMap::from([
                (Granularity::Second1, "data/nifty_1s.csv".to_string()),
                (Granularity::Minute1, "data/nifty_1m.csv".to_string()),
            ]),
            delimiter: None,
            symbol: "NIFTY".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl LoaderSettings {
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let settings: LoaderSettings = serde_json::from_str(json)
            .map_err(|e| EngineError::ConfigError(format!("Invalid loader settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if let Some((granularity, _)) = self.feeds.iter().find(|(_, address)| address.trim().is_empty()) {
            return Err(EngineError::ConfigError(format!("Empty feed address for {}", granularity)));
        }
        if let Some(d) = self.delimiter {
            if !d.is_ascii() || d == '"' || d == '\n' || d == '\r' {
                return Err(EngineError::ConfigError(format!("Unsupported delimiter {:?}", d)));
            }
        }
        Ok(())
    }

    pub fn feed_address(&self, granularity: Granularity) -> Option<&str> {
        self.feeds.get(&granularity).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_map_both_granularities() {
        let settings = LoaderSettings::default();
        assert_eq!(settings.feed_address(Granularity::Second1), Some("data/nifty_1s.csv"));
        assert_eq!(settings.feed_address(Granularity::Minute1), Some("data/nifty_1m.csv"));
        assert_eq!(settings.symbol, "NIFTY");
    }

    #[test]
    fn test_partial_json_keeps_defaults_for_missing_fields() {
        let settings = LoaderSettings::from_json_str(r#"{"feeds": {"1m": "http://localhost/m.csv"}, "delimiter": ";"}"#).unwrap();
        assert_eq!(settings.feed_address(Granularity::Minute1), Some("http://localhost/m.csv"));
        assert_eq!(settings.feed_address(Granularity::Second1), None);
        assert_eq!(settings.delimiter, Some(';'));
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn test_unknown_granularity_key_is_rejected() {
        let result = LoaderSettings::from_json_str(r#"{"feeds": {"5m": "five.csv"}}"#);
        assert!(matches!(result, Err(EngineError::ConfigError(_))));
    }

    #[test]
    fn test_empty_address_is_rejected() {
        let result = LoaderSettings::from_json_str(r#"{"feeds": {"1s": "  "}}"#);
        assert!(result.unwrap_err().to_string().contains("Empty feed address for 1s"));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"symbol": "BANKNIFTY"}}"#).unwrap();
        let settings = LoaderSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.symbol, "BANKNIFTY");
        assert_eq!(settings.feeds.len(), 2);
    }
}
