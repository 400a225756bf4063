use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Selection policy backing a selector instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectorKind {
    /// Lowest latency score if good enough, otherwise a stake-weighted unscored session.
    #[default]
    MinLs,
    /// Most recently completed session first, no scoring.
    Lifo,
}

impl SelectorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MinLs => "min-ls",
            Self::Lifo => "lifo",
        }
    }
}

impl std::fmt::Display for SelectorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output format for CLI responses
#[derive(Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_kind_default_is_min_ls() {
        assert_eq!(SelectorKind::default(), SelectorKind::MinLs);
    }

    #[test]
    fn test_selector_kind_serde_kebab_case() {
        let json = serde_json::to_string(&SelectorKind::MinLs).unwrap();
        assert_eq!(json, "\"min-ls\"");
        let kind: SelectorKind = serde_json::from_str("\"lifo\"").unwrap();
        assert_eq!(kind, SelectorKind::Lifo);
    }

    #[test]
    fn test_selector_kind_display_matches_value_enum() {
        for kind in SelectorKind::value_variants() {
            let parsed = SelectorKind::from_str(kind.as_str(), false).unwrap();
            assert_eq!(&parsed, kind);
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }
}
