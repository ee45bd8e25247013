//! View model handed to the recommendation renderer.

use serde::Serialize;

use crate::catalog::Product;
use crate::types::ProductType;
use crate::wizard::Step;

pub const LOADING_MESSAGE: &str = "Analyzing your skin profile...";
pub const RESULTS_SUBHEADING: &str = "Based on your skin profile and concerns";
pub const NO_MATCHES_TITLE: &str = "No matching products found";
pub const NO_MATCHES_HINT: &str =
    "Try adjusting your skin profile or concerns to get more recommendations.";

/// Number of glyphs in a star rating.
pub const STAR_COUNT: usize = 5;

/// What the recommendations step currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecommendationView {
    /// Transient placeholder while the pacing delay runs.
    Loading,
    Matches {
        heading: String,
        products: Vec<Product>,
    },
    /// Empty result; the renderer offers a way back to `back_to`.
    NoMatches { back_to: Step },
}

impl RecommendationView {
    /// Build the view for an engine result.
    pub fn from_results(product_type: ProductType, products: &[&Product]) -> Self {
        if products.is_empty() {
            return Self::NoMatches {
                back_to: Step::Questionnaire,
            };
        }
        Self::Matches {
            heading: heading(product_type),
            products: products.iter().map(|p| (*p).clone()).collect(),
        }
    }
}

/// Heading for a result list, e.g. `Your Recommended Serums`.
pub fn heading(product_type: ProductType) -> String {
    format!("Your Recommended {}s", product_type.label())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Star {
    Full,
    Half,
    Empty,
}

/// Five-glyph rating: `floor(rating)` full stars, one half star when the
/// fractional part is at least 0.5, the rest empty. No rating renders as
/// five empty stars.
pub fn star_rating(rating: Option<f64>) -> [Star; STAR_COUNT] {
    let mut stars = [Star::Empty; STAR_COUNT];
    let Some(rating) = rating.filter(|r| r.is_finite() && *r > 0.0) else {
        return stars;
    };

    let full = (rating.floor() as usize).min(STAR_COUNT);
    let half = rating.fract() >= 0.5;
    for (i, star) in stars.iter_mut().enumerate() {
        if i < full {
            *star = Star::Full;
        } else if i == full && half {
            *star = Star::Half;
        }
    }
    stars
}
