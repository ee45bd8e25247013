//! Recommendation engine: filter and rank catalog products for an
//! [`AnswerSet`].
//!
//! A candidate survives when it suits the user's skin type (or carries
//! the `all` wildcard), addresses at least one selected concern, and
//! contains none of the listed allergens. Survivors are ordered by
//! descending rating with a stable sort.

use std::cmp::Ordering;

use crate::answers::AnswerSet;
use crate::catalog::{Catalog, Product};

/// Filter and rank the catalog's products for `answers`.
///
/// Returns every match (no cap). An empty result is a valid outcome that
/// the consumer renders as "no matches".
pub fn recommend<'a>(answers: &AnswerSet, catalog: &'a Catalog) -> Vec<&'a Product> {
    let mut matches: Vec<&Product> = catalog
        .products(answers.product_type)
        .iter()
        .filter(|product| is_match(answers, product))
        .collect();

    rank(&mut matches);
    matches
}

/// Whether a single candidate passes all three filters.
pub fn is_match(answers: &AnswerSet, product: &Product) -> bool {
    product.suits_skin_type(answers.skin_type)
        && product.addresses_any(&answers.concerns)
        && !product.contains_allergen(&answers.allergies)
}

/// Stable sort by descending rating.
///
/// Unrated products behave as not-a-number: they order after every rated
/// product and keep their relative catalog order.
pub fn rank(products: &mut [&Product]) {
    products.sort_by(|a, b| compare_ratings(a.rating, b.rating));
}

fn compare_ratings(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
