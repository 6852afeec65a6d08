//! Keyword-based severity classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Substrings that mark a line as an error.
///
/// `"erro"` also covers the English `"error"`.
pub const ERROR_TOKENS: &[&str] = &["erro"];

/// Substrings that mark a line as a warning.
pub const WARNING_TOKENS: &[&str] = &["warning", "aviso", "atenção"];

/// Severity of a log line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    #[default]
    Info,
    Warning,
    Error,
}

impl SeverityLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a raw log line by case-insensitive keyword match.
///
/// Error tokens are checked before warning tokens, so a line carrying both
/// is an error.
///
/// # Examples
///
/// ```
/// use logship::record::{classify, SeverityLevel};
///
/// assert_eq!(classify("Ocorreu um ERRO no sistema"), SeverityLevel::Error);
/// assert_eq!(classify("processo concluído"), SeverityLevel::Info);
/// ```
#[must_use]
pub fn classify(message: &str) -> SeverityLevel {
    let lower = message.to_lowercase();
    let contains_any = |tokens: &[&str]| tokens.iter().any(|t| lower.contains(t));

    if contains_any(ERROR_TOKENS) {
        SeverityLevel::Error
    } else if contains_any(WARNING_TOKENS) {
        SeverityLevel::Warning
    } else {
        SeverityLevel::Info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_error() {
        assert_eq!(classify("Ocorreu um ERRO no sistema"), SeverityLevel::Error);
        assert_eq!(classify("erro de conexão"), SeverityLevel::Error);
        assert_eq!(classify("Connection Error: refused"), SeverityLevel::Error);
    }

    #[test]
    fn test_classify_warning() {
        assert_eq!(classify("Atenção: disco quase cheio"), SeverityLevel::Warning);
        assert_eq!(classify("ATENÇÃO: disco quase cheio"), SeverityLevel::Warning);
        assert_eq!(classify("[AVISO] certificado expira"), SeverityLevel::Warning);
        assert_eq!(classify("Warning: low memory"), SeverityLevel::Warning);
    }

    #[test]
    fn test_classify_info() {
        assert_eq!(classify("processo concluído"), SeverityLevel::Info);
        assert_eq!(classify(""), SeverityLevel::Info);
    }

    #[test]
    fn test_error_wins_over_warning() {
        assert_eq!(
            classify("Aviso: erro ao gravar cupom"),
            SeverityLevel::Error
        );
        assert_eq!(classify("warning: fatal error"), SeverityLevel::Error);
    }

    #[test]
    fn test_token_matches_inside_words() {
        // "erros" and "errors" both contain the error token.
        assert_eq!(classify("3 erros encontrados"), SeverityLevel::Error);
    }

    #[test]
    fn test_display_and_serde_are_lowercase() {
        assert_eq!(SeverityLevel::Warning.to_string(), "warning");
        assert_eq!(
            serde_json::to_string(&SeverityLevel::Error).unwrap(),
            "\"error\""
        );
        let parsed: SeverityLevel = serde_json::from_str("\"info\"").unwrap();
        assert_eq!(parsed, SeverityLevel::Info);
    }

    #[test]
    fn test_default_is_info() {
        assert_eq!(SeverityLevel::default(), SeverityLevel::Info);
    }
}
