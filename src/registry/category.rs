//! Object categories and the classification table
//!
//! Classification is a pure function of the table: lower-case and trim the
//! type tag, strip the static marker and its coordinate suffix, test the
//! exclusion list (substring), then look for an exact keyword match in each
//! category in table order.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{DebriefError, Result};

/// Prefix marking a parked, pre-placed instance of a mobile unit type
pub const STATIC_MARKER: &str = "static_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectCategory {
    Air,
    Ground,
    Naval,
    Building,
    Excluded,
    Unknown,
}

impl ObjectCategory {
    /// Categories that count toward the ground-kill tally
    pub fn is_ground_target(&self) -> bool {
        matches!(self, ObjectCategory::Ground | ObjectCategory::Building)
    }
}

/// One category with its exact-match keywords
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub kind: ObjectCategory,
    #[serde(default)]
    pub types: Vec<String>,
}

/// Lookup table consumed by the registry
///
/// ```toml
/// exclude = ["botpilot", "parachute"]
///
/// [[category]]
/// kind = "Air"
/// types = ["bf 109 f-4", "yak-1 ser.69"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTable {
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default, rename = "category")]
    pub categories: Vec<CategoryRule>,
}

impl CategoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append of a category rule
    pub fn with_category<I, S>(mut self, kind: ObjectCategory, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories.push(CategoryRule {
            kind,
            types: types.into_iter().map(Into::into).collect(),
        });
        self.normalize();
        self
    }

    /// Builder-style append of exclusion keywords
    pub fn with_exclusions<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(keywords.into_iter().map(Into::into));
        self.normalize();
        self
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        let mut table: CategoryTable = toml::from_str(content)?;
        table.normalize();
        Ok(table)
    }

    /// Load a table from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            DebriefError::InputUnavailable {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::from_toml_str(&content).map_err(|source| DebriefError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Keywords are compared lower-cased and trimmed
    fn normalize(&mut self) {
        for keyword in &mut self.exclude {
            *keyword = keyword.trim().to_lowercase();
        }
        self.exclude.retain(|k| !k.is_empty());
        for rule in &mut self.categories {
            for keyword in &mut rule.types {
                *keyword = keyword.trim().to_lowercase();
            }
        }
    }
}

/// Result of classifying one raw type tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Classification {
    pub category: ObjectCategory,
    /// Type tag with the static marker and coordinate suffix removed, original case
    pub normalized_type: String,
    pub is_static: bool,
}

/// Strip the static marker and any `[x,y]` suffix
///
/// Returns the cleaned tag (original case) and whether the marker was present.
pub fn normalize_type(raw_type: &str) -> (String, bool) {
    let trimmed = raw_type.trim();
    let is_static = trimmed.to_lowercase().starts_with(STATIC_MARKER);
    if !is_static {
        return (trimmed.to_string(), false);
    }
    let without_marker = trimmed.get(STATIC_MARKER.len()..).unwrap_or_default();
    let cleaned = match without_marker.find('[') {
        Some(idx) => &without_marker[..idx],
        None => without_marker,
    };
    (cleaned.trim().to_string(), true)
}

/// Classify a raw type tag against the table
pub fn classify(table: &CategoryTable, raw_type: &str) -> Classification {
    let (normalized_type, is_static) = normalize_type(raw_type);
    let key = normalized_type.to_lowercase();

    let category = if table.exclude.iter().any(|k| key.contains(k.as_str())) {
        ObjectCategory::Excluded
    } else {
        table
            .categories
            .iter()
            .find(|rule| rule.types.iter().any(|t| *t == key))
            .map(|rule| rule.kind)
            .unwrap_or(ObjectCategory::Unknown)
    };

    Classification {
        category,
        normalized_type,
        is_static,
    }
}
