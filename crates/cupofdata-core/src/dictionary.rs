use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Drink names in declaration order. Order breaks ties between equally long names.
pub const DRINKS: &[&str] = &[
    "珍珠奶茶",
    "波霸奶茶",
    "奶茶",
    "紅茶",
    "綠茶",
    "青茶",
    "四季春",
    "烏龍",
    "冬瓜茶",
    "蜜桃凍飲",
    "阿薩姆",
    "鐵觀音",
    "豆漿紅茶",
    "金蜜檸檬",
    "翡翠檸檬",
    "柳橙綠",
    "熟成紅茶",
    "紅茶拿鐵",
    "黑糖珍珠",
];

/// Sweetness levels in match priority.
pub const SUGARS: &[&str] = &["無糖", "微糖", "少糖", "半糖", "正常糖", "多糖"];

/// Ice levels in match priority.
pub const ICES: &[&str] = &["去冰", "微冰", "少冰", "正常冰", "多冰", "熱"];

/// Generic drink category words that say nothing about a specific brand.
pub const CATEGORY_TERMS: &[&str] = &["飲料", "手搖", "手搖飲", "茶飲", "飲品"];

/// Static reference data for rule-based extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordDictionary {
    pub drinks: Vec<String>,
    pub sugars: Vec<String>,
    pub ices: Vec<String>,
    #[serde(default = "default_category_terms")]
    pub category_terms: Vec<String>,
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn default_category_terms() -> Vec<String> {
    to_owned_list(CATEGORY_TERMS)
}

impl Default for KeywordDictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KeywordDictionary {
    /// The dictionary compiled into the binary.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            drinks: to_owned_list(DRINKS),
            sugars: to_owned_list(SUGARS),
            ices: to_owned_list(ICES),
            category_terms: default_category_terms(),
        }
    }

    /// Drinks sorted by descending character length, stable on declaration order.
    #[must_use]
    pub fn drinks_by_length(&self) -> Vec<&str> {
        let mut drinks: Vec<&str> = self.drinks.iter().map(String::as_str).collect();
        drinks.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
        drinks
    }

    /// First sweetness level (dictionary order) contained in `text`.
    #[must_use]
    pub fn find_sugar(&self, text: &str) -> Option<&str> {
        first_contained(&self.sugars, text)
    }

    /// First ice level (dictionary order) contained in `text`.
    #[must_use]
    pub fn find_ice(&self, text: &str) -> Option<&str> {
        first_contained(&self.ices, text)
    }

    #[must_use]
    pub fn mentions_any_drink(&self, text: &str) -> bool {
        self.drinks.iter().any(|d| text.contains(d.as_str()))
    }

    #[must_use]
    pub fn mentions_category(&self, text: &str) -> bool {
        self.category_terms.iter().any(|t| text.contains(t.as_str()))
    }
}

fn first_contained<'a>(terms: &'a [String], text: &str) -> Option<&'a str> {
    terms
        .iter()
        .find(|t| text.contains(t.as_str()))
        .map(String::as_str)
}

/// Load and validate a keyword dictionary from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_dictionary(path: &Path) -> Result<KeywordDictionary, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::DictionaryFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let dictionary: KeywordDictionary = serde_yaml::from_str(&content)?;

    validate_dictionary(&dictionary)?;

    Ok(dictionary)
}

fn validate_dictionary(dictionary: &KeywordDictionary) -> Result<(), ConfigError> {
    if dictionary.drinks.is_empty() {
        return Err(ConfigError::Validation(
            "dictionary must list at least one drink".to_string(),
        ));
    }

    for (kind, list) in [
        ("drink", &dictionary.drinks),
        ("sugar", &dictionary.sugars),
        ("ice", &dictionary.ices),
        ("category", &dictionary.category_terms),
    ] {
        let mut seen = HashSet::new();
        for entry in list {
            if entry.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "{kind} entries must be non-empty"
                )));
            }
            if !seen.insert(entry.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate {kind} entry: '{entry}'"
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn builtin_matches_constants() {
        let dict = KeywordDictionary::builtin();
        assert_eq!(dict.drinks.len(), DRINKS.len());
        assert_eq!(dict.sugars[0], "無糖");
        assert_eq!(dict.ices.last().map(String::as_str), Some("熱"));
    }

    #[test]
    fn drinks_by_length_puts_longer_names_first() {
        let dict = KeywordDictionary::builtin();
        let ordered = dict.drinks_by_length();
        let pearl = ordered.iter().position(|d| *d == "珍珠奶茶").unwrap();
        let milk_tea = ordered.iter().position(|d| *d == "奶茶").unwrap();
        assert!(pearl < milk_tea);
    }

    #[test]
    fn drinks_by_length_is_stable_on_ties() {
        let dict = KeywordDictionary::builtin();
        let ordered = dict.drinks_by_length();
        // Both four characters; 珍珠奶茶 is declared first.
        assert_eq!(ordered[0], "珍珠奶茶");
        assert_eq!(ordered[1], "波霸奶茶");
    }

    #[test]
    fn find_sugar_uses_dictionary_priority() {
        let dict = KeywordDictionary::builtin();
        // 半糖 appears first in the text but 無糖 has higher priority.
        assert_eq!(dict.find_sugar("半糖或無糖都可以"), Some("無糖"));
        assert_eq!(dict.find_sugar("沒有甜度"), None);
    }

    #[test]
    fn find_ice_returns_first_term_in_priority() {
        let dict = KeywordDictionary::builtin();
        assert_eq!(dict.find_ice("少冰比較好"), Some("少冰"));
    }

    #[test]
    fn validate_rejects_empty_drinks() {
        let mut dict = KeywordDictionary::builtin();
        dict.drinks.clear();
        let err = validate_dictionary(&dict).unwrap_err();
        assert!(err.to_string().contains("at least one drink"));
    }

    #[test]
    fn validate_rejects_blank_entry() {
        let mut dict = KeywordDictionary::builtin();
        dict.sugars.push("  ".to_string());
        let err = validate_dictionary(&dict).unwrap_err();
        assert!(err.to_string().contains("sugar entries must be non-empty"));
    }

    #[test]
    fn validate_rejects_duplicate_drink() {
        let mut dict = KeywordDictionary::builtin();
        dict.drinks.push("紅茶".to_string());
        let err = validate_dictionary(&dict).unwrap_err();
        assert!(err.to_string().contains("duplicate drink entry"));
    }

    #[test]
    fn load_dictionary_fills_default_categories() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "drinks: [紅茶, 綠茶]\nsugars: [無糖]\nices: [去冰]"
        )
        .unwrap();
        let dict = load_dictionary(file.path()).unwrap();
        assert_eq!(dict.drinks, vec!["紅茶", "綠茶"]);
        assert_eq!(dict.category_terms, default_category_terms());
    }

    #[test]
    fn load_dictionary_missing_file_is_io_error() {
        let result = load_dictionary(Path::new("/nonexistent/dictionary.yaml"));
        assert!(matches!(result, Err(ConfigError::DictionaryFileIo { .. })));
    }

    #[test]
    fn load_dictionary_from_repo_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("dictionary.yaml");
        let result = load_dictionary(&path);
        assert!(result.is_ok(), "failed to load dictionary.yaml: {result:?}");
        assert_eq!(result.unwrap(), KeywordDictionary::builtin());
    }
}
