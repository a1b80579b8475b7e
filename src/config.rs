use std::path::PathBuf;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";

const ENV_BACKEND_URL: &str = "FLASHCARDS_BACKEND_URL";
const ENV_DATA_DIR: &str = "FLASHCARDS_DATA_DIR";
const ENV_EXPORT_DIR: &str = "FLASHCARDS_EXPORT_DIR";
const ENV_EMPTY_EXPORT: &str = "FLASHCARDS_EXPORT_EMPTY_MEANS_ALL";

/// Which export formats accept an empty deck selection as "every deck".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptySelectionPolicy {
    #[default]
    JsonOnly,
    AnyFormat,
    Never,
}

impl EmptySelectionPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::JsonOnly),
            "all" | "any" => Some(Self::AnyFormat),
            "none" | "never" => Some(Self::Never),
            _ => None,
        }
    }

    pub fn allows(self, format: crate::models::ExportFormat) -> bool {
        match self {
            Self::JsonOnly => format == crate::models::ExportFormat::Json,
            Self::AnyFormat => true,
            Self::Never => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub backend_url: String,
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
    pub empty_selection: EmptySelectionPolicy,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend_url = non_empty(ENV_BACKEND_URL)
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        let data_dir = non_empty(ENV_DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| default_data_dir(&lookup));
        let export_dir = non_empty(ENV_EXPORT_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let empty_selection = non_empty(ENV_EMPTY_EXPORT)
            .and_then(|v| EmptySelectionPolicy::parse(&v))
            .unwrap_or_default();

        Self {
            backend_url,
            data_dir,
            export_dir,
            empty_selection,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("flashcards.db")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("flashcards.log")
    }
}

fn default_data_dir<F>(lookup: &F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if cfg!(target_os = "windows") {
        let home = lookup("USERPROFILE").unwrap_or_else(|| "C:\\Users\\User".to_string());
        PathBuf::from(home).join(".local\\share\\sutra-flashcards")
    } else {
        let home = lookup("HOME").unwrap_or_else(|| "/home/user".to_string());
        PathBuf::from(home).join(".local/share/sutra-flashcards")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExportFormat;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[("HOME", "/tmp/home")]));
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.export_dir, PathBuf::from("."));
        assert_eq!(config.empty_selection, EmptySelectionPolicy::JsonOnly);
        if !cfg!(target_os = "windows") {
            assert_eq!(
                config.db_path(),
                PathBuf::from("/tmp/home/.local/share/sutra-flashcards/flashcards.db")
            );
        }
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("FLASHCARDS_BACKEND_URL", "https://cards.example.com"),
            ("FLASHCARDS_DATA_DIR", "/var/lib/cards"),
            ("FLASHCARDS_EXPORT_DIR", "/tmp/out"),
            ("FLASHCARDS_EXPORT_EMPTY_MEANS_ALL", "ALL"),
        ]));
        assert_eq!(config.backend_url, "https://cards.example.com");
        assert_eq!(config.log_path(), PathBuf::from("/var/lib/cards/flashcards.log"));
        assert_eq!(config.export_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.empty_selection, EmptySelectionPolicy::AnyFormat);
    }

    #[test]
    fn test_blank_and_unknown_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("FLASHCARDS_BACKEND_URL", "  "),
            ("FLASHCARDS_EXPORT_EMPTY_MEANS_ALL", "sometimes"),
        ]));
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.empty_selection, EmptySelectionPolicy::JsonOnly);
    }

    #[test]
    fn test_policy_allows() {
        assert!(EmptySelectionPolicy::JsonOnly.allows(ExportFormat::Json));
        assert!(!EmptySelectionPolicy::JsonOnly.allows(ExportFormat::Csv));
        assert!(EmptySelectionPolicy::AnyFormat.allows(ExportFormat::Pdf));
        assert!(!EmptySelectionPolicy::Never.allows(ExportFormat::Json));
    }
}
