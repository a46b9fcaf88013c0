//! Product categories.

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a known category.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// The fixed set of catalog categories.
///
/// Serialized with the display names the admin surface shows
/// (`"Limited Edition"`, not `"limited_edition"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Essentials,
    Streetwear,
    Outerwear,
    #[serde(rename = "Limited Edition")]
    LimitedEdition,
}

impl Category {
    /// All categories, in the order the admin surface lists them.
    pub const ALL: [Self; 4] = [
        Self::Essentials,
        Self::Streetwear,
        Self::Outerwear,
        Self::LimitedEdition,
    ];

    /// The display name of the category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Essentials => "Essentials",
            Self::Streetwear => "Streetwear",
            Self::Outerwear => "Outerwear",
            Self::LimitedEdition => "Limited Edition",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Essentials" => Ok(Self::Essentials),
            "Streetwear" => Ok(Self::Streetwear),
            "Outerwear" => Ok(Self::Outerwear),
            "Limited Edition" => Ok(Self::LimitedEdition),
            other => Err(CategoryError(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_roundtrip() {
        for category in Category::ALL {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&Category::LimitedEdition).unwrap();
        assert_eq!(json, "\"Limited Edition\"");
    }

    #[test]
    fn test_unknown_category() {
        assert!("Activewear".parse::<Category>().is_err());
    }
}
