//! Domain logic for the skinwise intake wizard.
//!
//! Pure, I/O-free building blocks: the closed vocabularies (skin types,
//! concerns, product types), skin-profile decoding, the questionnaire
//! answer model, the product catalog, the recommendation engine, the
//! three-step wizard state machine, and the view model handed to
//! renderers.

pub mod answers;
pub mod catalog;
pub mod error;
pub mod presentation;
pub mod profile;
pub mod recommendation;
pub mod types;
pub mod wizard;
