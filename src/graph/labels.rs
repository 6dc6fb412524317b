use regex::Regex;

use crate::config::{AbbreviationEntry, ConfigError};

#[derive(Debug, Clone)]
pub struct AbbreviationRule {
    pattern: Regex,
    replacement: String,
}

impl AbbreviationRule {
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self, ConfigError> {
        let compiled = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern: compiled,
            replacement: replacement.into(),
        })
    }
}

/// Ordered label rewrite rules. Rules are tried in declaration order and
/// only the first matching rule is applied.
#[derive(Debug, Clone, Default)]
pub struct Abbreviations {
    rules: Vec<AbbreviationRule>,
}

impl Abbreviations {
    pub fn new(rules: Vec<AbbreviationRule>) -> Self {
        Self { rules }
    }

    pub fn from_entries(entries: &[AbbreviationEntry]) -> Result<Self, ConfigError> {
        let rules = entries
            .iter()
            .map(|entry| AbbreviationRule::new(&entry.pattern, entry.replacement.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn apply(&self, label: &str) -> String {
        for rule in &self.rules {
            if rule.pattern.is_match(label) {
                return rule
                    .pattern
                    .replace_all(label, rule.replacement.as_str())
                    .into_owned();
            }
        }
        label.to_string()
    }
}
