//! Output format value object

use serde::{Deserialize, Serialize};

/// How debate results are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Every round with its breakdown
    Full,
    /// Final status, score trend and the latest answers (default)
    #[default]
    Summary,
    /// Raw session data as JSON
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(OutputFormat::Full),
            "summary" => Ok(OutputFormat::Summary),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_summary() {
        assert_eq!(OutputFormat::default(), OutputFormat::Summary);
    }

    #[test]
    fn test_serialize_lowercase() {
        let json = serde_json::to_string(&OutputFormat::Full).unwrap();
        assert_eq!(json, "\"full\"");
    }

    #[test]
    fn test_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
