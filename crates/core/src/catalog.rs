//! Static product catalog.
//!
//! The catalog is a versioned JSON data asset keyed by product type. The
//! default asset is embedded at compile time; [`Catalog::from_json`] loads
//! an alternative one. Tags are parsed into closed enums on load, so an
//! unknown skin type or concern rejects the whole catalog instead of
//! silently never matching.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Concern, ProductType, SkinType, SkinTypeTag};

/// The catalog shipped with the crate.
pub const BUILTIN_CATALOG_JSON: &str = include_str!("../assets/catalog.json");

/// Highest rating a product may carry.
pub const MAX_RATING: f64 = 5.0;

/// A single catalog entry. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub title: String,
    pub brand: String,
    pub description: String,
    /// Display string, e.g. `$9.99`.
    pub price: String,
    /// Icon reference for the renderer.
    pub icon: String,
    pub ingredients: Vec<String>,
    pub skin_types: BTreeSet<SkinTypeTag>,
    pub concerns: BTreeSet<Concern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl Product {
    /// Whether the product targets `skin_type`, directly or via `all`.
    pub fn suits_skin_type(&self, skin_type: SkinType) -> bool {
        self.skin_types.iter().any(|tag| tag.matches(skin_type))
    }

    /// Whether the product addresses at least one of `concerns`.
    pub fn addresses_any(&self, concerns: &BTreeSet<Concern>) -> bool {
        !self.concerns.is_disjoint(concerns)
    }

    /// Whether any allergy fragment occurs inside any ingredient name,
    /// ignoring case. An empty allergy list never matches.
    pub fn contains_allergen(&self, allergies: &[String]) -> bool {
        if allergies.is_empty() {
            return false;
        }
        self.ingredients.iter().any(|ingredient| {
            let ingredient = ingredient.to_lowercase();
            allergies
                .iter()
                .any(|allergy| ingredient.contains(&allergy.to_lowercase()))
        })
    }
}

/// Products grouped by product type, in catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    products: BTreeMap<ProductType, Vec<Product>>,
}

impl Catalog {
    /// Build a catalog, requiring an entry for every product type.
    pub fn new(products: BTreeMap<ProductType, Vec<Product>>) -> Result<Self, CoreError> {
        for product_type in ProductType::ALL {
            if !products.contains_key(&product_type) {
                return Err(CoreError::InvalidCatalog(format!(
                    "missing product list for '{product_type}'"
                )));
            }
        }

        for (product_type, list) in &products {
            for product in list {
                if let Some(rating) = product.rating {
                    if !rating.is_finite() || !(0.0..=MAX_RATING).contains(&rating) {
                        return Err(CoreError::InvalidCatalog(format!(
                            "{product_type} '{}' has rating {rating}, expected 0..={MAX_RATING}",
                            product.title
                        )));
                    }
                }
                if product.skin_types.is_empty() {
                    return Err(CoreError::InvalidCatalog(format!(
                        "{product_type} '{}' lists no skin types",
                        product.title
                    )));
                }
            }
        }

        Ok(Self { products })
    }

    /// Parse a catalog from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let products: BTreeMap<ProductType, Vec<Product>> = serde_json::from_str(json)
            .map_err(|e| CoreError::InvalidCatalog(e.to_string()))?;
        Self::new(products)
    }

    /// The embedded default catalog.
    pub fn builtin() -> Result<Self, CoreError> {
        Self::from_json(BUILTIN_CATALOG_JSON)
    }

    /// Candidates for a product type, in catalog order.
    pub fn products(&self, product_type: ProductType) -> &[Product] {
        self.products
            .get(&product_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of products across every type.
    pub fn len(&self) -> usize {
        self.products.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
