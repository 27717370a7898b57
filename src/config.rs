//! Loading the filter configuration

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use zipdoc_core::{FilterConfig, TranscodeOptions};

use crate::cli::TranscodeArgs;

/// Read a JSON configuration, or the built-in defaults when no file is given.
pub fn load(path: Option<&Path>) -> Result<FilterConfig> {
    let Some(path) = path else {
        return Ok(FilterConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

/// Command-line flags take precedence over configured options.
pub fn apply_overrides(mut options: TranscodeOptions, args: &TranscodeArgs) -> TranscodeOptions {
    if let Some(level) = args.level {
        options.level = level;
    }
    if args.xml_line_breaks {
        options.xml_line_breaks = true;
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_path_gives_defaults() {
        assert_eq!(load(None).unwrap(), FilterConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "encode": [ {{ "pattern": "**.odt", "filter": "zipdocencode" }} ], "options": {{ "level": 1 }} }}"#
        )
        .unwrap();

        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.encode.len(), 1);
        assert!(config.decode.is_empty());
        assert_eq!(config.options.level, 1);
    }

    #[test]
    fn test_bad_json_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_overrides() {
        let args = TranscodeArgs {
            level: Some(9),
            xml_line_breaks: false,
        };
        let options = apply_overrides(TranscodeOptions::default(), &args);
        assert_eq!(options.level, 9);
        assert!(!options.xml_line_breaks);

        let configured = TranscodeOptions {
            level: 3,
            xml_line_breaks: true,
        };
        let options = apply_overrides(configured, &TranscodeArgs::default());
        assert_eq!(options, configured);
    }
}
