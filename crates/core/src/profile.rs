//! Skin profile decoding.
//!
//! The analysis service classifies a photo into a short positional code,
//! e.g. `OSPT`: position 0 is the skin type (`D`ry, `O`ily,
//! `C`ombination), position 1 is `S` for sensitive skin, position 2 is
//! `P` for pigmented skin. Anything after position 2 is ignored.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::SkinType;

/// Minimum number of characters in a classification code.
pub const MIN_CODE_LEN: usize = 2;

/// Skin type decoded from position 0 of a classification code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkinTypeCode {
    Dry,
    Oily,
    Combination,
    Unknown,
}

impl SkinTypeCode {
    pub fn from_char(c: char) -> Self {
        match c {
            'D' => Self::Dry,
            'O' => Self::Oily,
            'C' => Self::Combination,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dry => "Dry",
            Self::Oily => "Oily",
            Self::Combination => "Combination",
            Self::Unknown => "Unknown",
        }
    }

    /// The questionnaire skin type this code pre-selects, if any.
    pub fn skin_type(self) -> Option<SkinType> {
        match self {
            Self::Dry => Some(SkinType::Dry),
            Self::Oily => Some(SkinType::Oily),
            Self::Combination => Some(SkinType::Combination),
            Self::Unknown => None,
        }
    }
}

/// Normalized result of a successful image analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkinProfile {
    /// Raw classification code as returned by the service.
    pub code: String,
    pub skin_type: SkinTypeCode,
    pub sensitive: bool,
    pub pigmented: bool,
    /// Share of the image detected as skin, in percent.
    pub skin_coverage_percent: Option<f64>,
    /// Short descriptive text for the classification.
    pub summary: Option<String>,
}

impl SkinProfile {
    /// Decode a classification code and the optional response extras.
    ///
    /// Fails with [`CoreError::MalformedProfile`] when the code is shorter
    /// than [`MIN_CODE_LEN`] characters or the coverage is not a finite
    /// percentage. Never returns a partially populated profile.
    pub fn decode(
        code: &str,
        skin_coverage_percent: Option<f64>,
        summary: Option<String>,
    ) -> Result<Self, CoreError> {
        let chars: Vec<char> = code.chars().collect();
        if chars.len() < MIN_CODE_LEN {
            return Err(CoreError::MalformedProfile(format!(
                "classification code '{code}' must be at least {MIN_CODE_LEN} characters"
            )));
        }

        if let Some(pct) = skin_coverage_percent {
            if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
                return Err(CoreError::MalformedProfile(format!(
                    "skin coverage {pct} is outside 0..=100"
                )));
            }
        }

        Ok(Self {
            code: code.to_string(),
            skin_type: SkinTypeCode::from_char(chars[0]),
            sensitive: chars[1] == 'S',
            pigmented: chars.get(2) == Some(&'P'),
            skin_coverage_percent,
            summary: summary.filter(|s| !s.trim().is_empty()),
        })
    }

    pub fn sensitivity_label(&self) -> &'static str {
        if self.sensitive {
            "Sensitive"
        } else {
            "Resistant"
        }
    }

    pub fn pigmentation_label(&self) -> &'static str {
        if self.pigmented {
            "Pigmented"
        } else {
            "Non-pigmented"
        }
    }

    /// Coverage formatted with one decimal, e.g. `42.5%`.
    pub fn coverage_label(&self) -> Option<String> {
        self.skin_coverage_percent.map(|pct| format!("{pct:.1}%"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
