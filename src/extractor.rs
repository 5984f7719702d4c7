use regex::Regex;

use crate::record::JobRecord;

/// Pulls a wage figure out of free text when the structured field is empty.
pub struct Extractor {
    // Portuguese notation: "1.500,00", "25.000,00", "950,50"
    wage_regex: Regex,
}

impl Default for Extractor {
    fn default() -> Self {
        Extractor::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        Extractor {
            wage_regex: Regex::new(r"\d{1,3}(?:\.\d{3})*,\d{2}").unwrap(),
        }
    }

    /// First amount found in the text, if any.
    pub fn extract_wage(&self, text: &str) -> Option<String> {
        self.wage_regex.find(text).map(|m| m.as_str().to_string())
    }

    pub fn resolve_wage(&self, record: &JobRecord) -> Option<String> {
        match record.wage.as_deref() {
            Some(wage) if !wage.trim().is_empty() => Some(wage.to_string()),
            _ => self.extract_wage(record.body_text()),
        }
    }
}
