use crate::error::HeirloomError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MAX_ID_LEN: usize = 64;

/// Identifier of a heirloom, also the name of its directory under the
/// records root.
///
/// Parsing only accepts names that stay inside the records root: ASCII
/// alphanumerics, `-` and `_`, not starting with a dot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HeirloomId(String);

impl HeirloomId {
    pub(crate) fn from_number(n: u64) -> Self {
        Self(n.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for HeirloomId {
    type Err = HeirloomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(HeirloomError::InvalidInput("id cannot be empty".into()));
        }
        if s.len() > MAX_ID_LEN {
            return Err(HeirloomError::InvalidInput(format!(
                "id is longer than {} characters",
                MAX_ID_LEN
            )));
        }
        if s.starts_with('.') {
            return Err(HeirloomError::InvalidInput(format!(
                "id cannot start with a dot: {}",
                s
            )));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(HeirloomError::InvalidInput(format!(
                "id contains invalid characters: {}",
                s
            )));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for HeirloomId {
    type Error = HeirloomError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HeirloomId> for String {
    fn from(id: HeirloomId) -> Self {
        id.0
    }
}

impl AsRef<str> for HeirloomId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HeirloomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heirloom {
    pub id: HeirloomId,
    pub description: String,
    pub image: Vec<u8>,
}

impl Heirloom {
    /// First line of the description, used as a title in listings.
    pub fn title(&self) -> &str {
        first_line(&self.description)
    }
}

/// A listing row: enough to show a record without loading its image.
#[derive(Debug, Clone)]
pub struct HeirloomSummary {
    pub id: HeirloomId,
    pub title: String,
    pub modified_at: Option<DateTime<Utc>>,
}

pub(crate) fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("").trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_ids() {
        let id: HeirloomId = "4821093552".parse().unwrap();
        assert_eq!(id.as_str(), "4821093552");
        assert_eq!(id, HeirloomId::from_number(4821093552));
    }

    #[test]
    fn rejects_ids_escaping_the_root() {
        for bad in ["", "..", "../etc", "a/b", ".staging-1", "a b", "\\x"] {
            assert!(
                matches!(bad.parse::<HeirloomId>(), Err(HeirloomError::InvalidInput(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn rejects_overlong_ids() {
        let long = "1".repeat(MAX_ID_LEN + 1);
        assert!(long.parse::<HeirloomId>().is_err());
        assert!("1".repeat(MAX_ID_LEN).parse::<HeirloomId>().is_ok());
    }

    #[test]
    fn ids_sort_lexicographically() {
        let mut ids: Vec<HeirloomId> = ["20", "100", "3"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        ids.sort();
        let names: Vec<_> = ids.iter().map(|i| i.as_str()).collect();
        assert_eq!(names, vec!["100", "20", "3"]);
    }

    #[test]
    fn title_is_first_trimmed_line() {
        let h = Heirloom {
            id: "1".parse().unwrap(),
            description: "  grandmother's ring \nmade in 1952".into(),
            image: vec![],
        };
        assert_eq!(h.title(), "grandmother's ring");
    }

    #[test]
    fn id_deserialization_validates() {
        let ok: HeirloomId = serde_json::from_str("\"123\"").unwrap();
        assert_eq!(ok.as_str(), "123");
        assert!(serde_json::from_str::<HeirloomId>("\"../x\"").is_err());
    }
}
