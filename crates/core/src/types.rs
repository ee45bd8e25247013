//! Closed vocabularies shared by the questionnaire, the catalog and the
//! recommendation engine.
//!
//! Every value that enters the system as free text (form selections,
//! catalog tags) is parsed into one of these enums at the boundary, so the
//! rest of the pipeline never compares raw strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Skin type
// ---------------------------------------------------------------------------

/// Skin type a user can select in the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkinType {
    Dry,
    Oily,
    Combination,
}

impl SkinType {
    pub const ALL: [SkinType; 3] = [Self::Dry, Self::Oily, Self::Combination];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dry => "dry",
            Self::Oily => "oily",
            Self::Combination => "combination",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dry => "Dry",
            Self::Oily => "Oily",
            Self::Combination => "Combination",
        }
    }
}

impl FromStr for SkinType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dry" => Ok(Self::Dry),
            "oily" => Ok(Self::Oily),
            "combination" => Ok(Self::Combination),
            _ => Err(CoreError::Validation(format!(
                "Invalid skin type '{s}'. Must be one of: dry, oily, combination"
            ))),
        }
    }
}

impl fmt::Display for SkinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Skin type tag attached to a catalog product.
///
/// A superset of [`SkinType`]: catalog entries may also target `normal`
/// skin (never selectable in the questionnaire) or the wildcard `all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkinTypeTag {
    Dry,
    Oily,
    Combination,
    Normal,
    All,
}

impl SkinTypeTag {
    /// Whether a product carrying this tag suits the given skin type.
    pub fn matches(self, skin_type: SkinType) -> bool {
        match self {
            Self::All => true,
            Self::Dry => skin_type == SkinType::Dry,
            Self::Oily => skin_type == SkinType::Oily,
            Self::Combination => skin_type == SkinType::Combination,
            Self::Normal => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Concerns
// ---------------------------------------------------------------------------

/// Skincare goal tag used to match products against a user's answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Concern {
    #[serde(rename = "acne")]
    Acne,
    #[serde(rename = "aging")]
    Aging,
    #[serde(rename = "pigmentation")]
    Pigmentation,
    #[serde(rename = "redness")]
    Redness,
    #[serde(rename = "dryness")]
    Dryness,
    #[serde(rename = "sun protection")]
    SunProtection,
    #[serde(rename = "tanning")]
    Tanning,
    #[serde(rename = "photo-aging")]
    PhotoAging,
    #[serde(rename = "blue light protection")]
    BlueLightProtection,
    #[serde(rename = "makeup priming")]
    MakeupPriming,
}

impl Concern {
    /// Concerns offered as checkboxes in the questionnaire.
    pub const QUESTIONNAIRE: [Concern; 5] = [
        Self::Acne,
        Self::Aging,
        Self::Pigmentation,
        Self::Redness,
        Self::Dryness,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Acne => "acne",
            Self::Aging => "aging",
            Self::Pigmentation => "pigmentation",
            Self::Redness => "redness",
            Self::Dryness => "dryness",
            Self::SunProtection => "sun protection",
            Self::Tanning => "tanning",
            Self::PhotoAging => "photo-aging",
            Self::BlueLightProtection => "blue light protection",
            Self::MakeupPriming => "makeup priming",
        }
    }
}

impl FromStr for Concern {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let concern = match s {
            "acne" => Self::Acne,
            "aging" => Self::Aging,
            "pigmentation" => Self::Pigmentation,
            "redness" => Self::Redness,
            "dryness" => Self::Dryness,
            "sun protection" => Self::SunProtection,
            "tanning" => Self::Tanning,
            "photo-aging" => Self::PhotoAging,
            "blue light protection" => Self::BlueLightProtection,
            "makeup priming" => Self::MakeupPriming,
            _ => return Err(CoreError::Validation(format!("Unknown concern '{s}'"))),
        };
        Ok(concern)
    }
}

impl fmt::Display for Concern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Product type
// ---------------------------------------------------------------------------

/// Product category; also the key of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    Cleanser,
    Moisturizer,
    Serum,
    Sunscreen,
}

impl ProductType {
    pub const ALL: [ProductType; 4] = [
        Self::Cleanser,
        Self::Moisturizer,
        Self::Serum,
        Self::Sunscreen,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cleanser => "cleanser",
            Self::Moisturizer => "moisturizer",
            Self::Serum => "serum",
            Self::Sunscreen => "sunscreen",
        }
    }

    /// Capitalized name, e.g. `Cleanser`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Cleanser => "Cleanser",
            Self::Moisturizer => "Moisturizer",
            Self::Serum => "Serum",
            Self::Sunscreen => "Sunscreen",
        }
    }
}

impl FromStr for ProductType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cleanser" => Ok(Self::Cleanser),
            "moisturizer" => Ok(Self::Moisturizer),
            "serum" => Ok(Self::Serum),
            "sunscreen" => Ok(Self::Sunscreen),
            _ => Err(CoreError::Validation(format!(
                "Invalid product type '{s}'. Must be one of: cleanser, moisturizer, serum, sunscreen"
            ))),
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skin_type_parses_known_values() {
        for skin_type in SkinType::ALL {
            assert_eq!(skin_type.as_str().parse::<SkinType>().unwrap(), skin_type);
        }
    }

    #[test]
    fn skin_type_rejects_unknown_values() {
        assert!("normal".parse::<SkinType>().is_err());
        assert!("Dry".parse::<SkinType>().is_err());
        assert!("".parse::<SkinType>().is_err());
    }

    #[test]
    fn wildcard_tag_matches_every_skin_type() {
        for skin_type in SkinType::ALL {
            assert!(SkinTypeTag::All.matches(skin_type));
        }
    }

    #[test]
    fn normal_tag_matches_no_selectable_skin_type() {
        for skin_type in SkinType::ALL {
            assert!(!SkinTypeTag::Normal.matches(skin_type));
        }
    }

    #[test]
    fn specific_tag_matches_only_its_skin_type() {
        assert!(SkinTypeTag::Oily.matches(SkinType::Oily));
        assert!(!SkinTypeTag::Oily.matches(SkinType::Dry));
        assert!(!SkinTypeTag::Dry.matches(SkinType::Combination));
    }

    #[test]
    fn concern_wire_names_match_display() {
        let json = serde_json::to_string(&Concern::SunProtection).unwrap();
        assert_eq!(json, "\"sun protection\"");
        assert_eq!(
            "photo-aging".parse::<Concern>().unwrap(),
            Concern::PhotoAging
        );
        assert_eq!(Concern::BlueLightProtection.to_string(), "blue light protection");
    }

    #[test]
    fn product_type_labels_are_capitalized() {
        for product_type in ProductType::ALL {
            let label = product_type.label();
            assert!(label.starts_with(|c: char| c.is_ascii_uppercase()));
            assert_eq!(label.to_lowercase(), product_type.as_str());
        }
    }

    #[test]
    fn product_type_rejects_unknown_values() {
        assert!("toner".parse::<ProductType>().is_err());
    }
}
