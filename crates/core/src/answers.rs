//! Questionnaire answer model.
//!
//! [`AnswerForm`] mirrors the questionnaire's current selections, some of
//! which may still be missing. [`AnswerForm::current_answers`] turns a
//! complete form into the normalized [`AnswerSet`] consumed by the
//! recommendation engine.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::profile::SkinProfile;
use crate::types::{Concern, ProductType, SkinType};
use crate::wizard::{MissingField, ValidationFailed};

/// Normalized, complete questionnaire answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerSet {
    pub skin_type: SkinType,
    /// Never empty when produced by [`AnswerForm::current_answers`].
    pub concerns: BTreeSet<Concern>,
    pub product_type: ProductType,
    /// Lower-cased allergy fragments; empty means "no allergies".
    pub allergies: Vec<String>,
}

/// Live questionnaire state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerForm {
    skin_type: Option<SkinType>,
    sensitive: Option<bool>,
    concerns: BTreeSet<Concern>,
    product_type: Option<ProductType>,
    allergies_text: String,
}

impl AnswerForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skin_type(&self) -> Option<SkinType> {
        self.skin_type
    }

    pub fn sensitive(&self) -> Option<bool> {
        self.sensitive
    }

    pub fn concerns(&self) -> &BTreeSet<Concern> {
        &self.concerns
    }

    pub fn product_type(&self) -> Option<ProductType> {
        self.product_type
    }

    pub fn allergies_text(&self) -> &str {
        &self.allergies_text
    }

    pub fn select_skin_type(&mut self, skin_type: SkinType) {
        self.skin_type = Some(skin_type);
    }

    pub fn clear_skin_type(&mut self) {
        self.skin_type = None;
    }

    pub fn set_sensitive(&mut self, sensitive: bool) {
        self.sensitive = Some(sensitive);
    }

    /// Flip a concern checkbox. Returns whether it is now selected.
    pub fn toggle_concern(&mut self, concern: Concern) -> bool {
        if self.concerns.remove(&concern) {
            false
        } else {
            self.concerns.insert(concern);
            true
        }
    }

    pub fn select_product_type(&mut self, product_type: ProductType) {
        self.product_type = Some(product_type);
    }

    pub fn set_allergies_text(&mut self, text: impl Into<String>) {
        self.allergies_text = text.into();
    }

    /// Pre-select the fields an image analysis can infer.
    ///
    /// Sets skin type (cleared for an unknown code) and sensitivity.
    /// Concerns and product type are left untouched.
    pub fn apply_profile(&mut self, profile: &SkinProfile) {
        self.skin_type = profile.skin_type.skin_type();
        self.sensitive = Some(profile.sensitive);
    }

    /// Every required field that is still unset, in questionnaire order.
    pub fn missing_fields(&self) -> Vec<MissingField> {
        let mut missing = Vec::new();
        if self.skin_type.is_none() {
            missing.push(MissingField::SkinType);
        }
        if self.concerns.is_empty() {
            missing.push(MissingField::Concerns);
        }
        if self.product_type.is_none() {
            missing.push(MissingField::ProductType);
        }
        missing
    }

    /// Snapshot the form as a complete answer set.
    pub fn current_answers(&self) -> Result<AnswerSet, ValidationFailed> {
        match (self.skin_type, self.product_type) {
            (Some(skin_type), Some(product_type)) if !self.concerns.is_empty() => Ok(AnswerSet {
                skin_type,
                concerns: self.concerns.clone(),
                product_type,
                allergies: parse_allergies(&self.allergies_text),
            }),
            _ => Err(ValidationFailed::new(self.missing_fields())),
        }
    }
}

/// Split free-text allergies on commas, trim and lower-case each fragment,
/// and drop empty fragments.
pub fn parse_allergies(text: &str) -> Vec<String> {
    text.split(',')
        .map(|fragment| fragment.trim().to_lowercase())
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
