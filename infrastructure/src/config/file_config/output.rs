//! Output configuration from TOML (`[output]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Write session output as JSON instead of a text transcript
    pub json: bool,
    /// Indent JSON output
    pub pretty_print: bool,
    /// Enable colored terminal output
    pub color: bool,
    /// Show progress indicators
    pub show_progress: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            json: false,
            pretty_print: false,
            color: true,
            show_progress: true,
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_output_deserialize() {
        let toml_str = r#"
[output]
json = true
color = false
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.output.json);
        assert!(!config.output.color);
        assert!(config.output.show_progress);
    }
}
