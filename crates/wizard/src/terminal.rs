//! Line-oriented terminal front end: command parsing and text rendering.
//!
//! The binary reads one [`Command`] per line and prints what the
//! controller reports. Rendering functions return plain strings so they
//! can be checked without a terminal.

use std::path::PathBuf;

use skinwise_analysis::gateway::UploadError;
use skinwise_core::answers::AnswerForm;
use skinwise_core::error::CoreError;
use skinwise_core::presentation::{
    star_rating, RecommendationView, Star, LOADING_MESSAGE, NO_MATCHES_HINT, NO_MATCHES_TITLE,
    RESULTS_SUBHEADING,
};
use skinwise_core::profile::SkinProfile;
use skinwise_core::types::{Concern, ProductType, SkinType};
use skinwise_core::wizard::{Step, TransitionError, WizardState, MAX_STEP};

pub const HELP: &str = "\
Commands:
  upload <path>          send a photo for skin analysis
  skin <type>            dry | oily | combination
  sensitive <yes|no>     skin sensitivity
  concern <name>         toggle a concern (acne, aging, pigmentation, redness, dryness)
  product <type>         cleanser | moisturizer | serum | sunscreen
  allergies <list>       comma-separated ingredients to avoid (empty to clear)
  next | back            move between steps
  show                   print the current step
  help | quit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Upload(PathBuf),
    SkinType(SkinType),
    Sensitive(bool),
    ToggleConcern(Concern),
    ProductType(ProductType),
    Allergies(String),
    Next,
    Back,
    Show,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands")]
    Unknown(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("Expected yes or no, got '{0}'")]
    InvalidFlag(String),

    #[error(transparent)]
    Invalid(#[from] CoreError),
}

impl Command {
    /// Parse an input line. Returns `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let arg = |name: &'static str| {
            if rest.is_empty() {
                Err(CommandError::MissingArgument(name))
            } else {
                Ok(rest.to_lowercase())
            }
        };

        let command = match word.to_lowercase().as_str() {
            "upload" => {
                arg("upload")?;
                Self::Upload(PathBuf::from(rest))
            }
            "skin" => Self::SkinType(arg("skin")?.parse()?),
            "sensitive" => Self::Sensitive(parse_flag(&arg("sensitive")?)?),
            "concern" => Self::ToggleConcern(arg("concern")?.parse()?),
            "product" => Self::ProductType(arg("product")?.parse()?),
            "allergies" => Self::Allergies(rest.to_string()),
            "next" => Self::Next,
            "back" => Self::Back,
            "show" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn parse_flag(value: &str) -> Result<bool, CommandError> {
    match value {
        "yes" | "y" | "true" => Ok(true),
        "no" | "n" | "false" => Ok(false),
        other => Err(CommandError::InvalidFlag(other.to_string())),
    }
}

/// Progress line, e.g. `[1 Upload] > [2 Questionnaire] > 3 Recommendations`.
/// Reached steps are bracketed.
pub fn render_progress(state: &WizardState) -> String {
    (1..=MAX_STEP)
        .filter_map(|n| Step::from_number(n).ok())
        .map(|step| {
            if state.is_step_active(step) {
                format!("[{} {}]", step.to_number(), step.label())
            } else {
                format!("{} {}", step.to_number(), step.label())
            }
        })
        .collect::<Vec<_>>()
        .join(" > ")
}

pub fn render_profile(profile: &SkinProfile) -> String {
    let mut lines = vec![
        "Skin analysis".to_string(),
        format!("  Type:         {}", profile.skin_type.label()),
        format!("  Sensitivity:  {}", profile.sensitivity_label()),
        format!("  Pigmentation: {}", profile.pigmentation_label()),
    ];
    if let Some(coverage) = profile.coverage_label() {
        lines.push(format!("  Skin area:    {coverage}"));
    }
    if let Some(summary) = &profile.summary {
        lines.push(format!("  {summary}"));
    }
    block(lines)
}

pub fn render_form(form: &AnswerForm) -> String {
    let skin = form.skin_type().map_or("-", |s| s.label());
    let sensitive = match form.sensitive() {
        Some(true) => "yes",
        Some(false) => "no",
        None => "-",
    };
    let concerns = if form.concerns().is_empty() {
        "-".to_string()
    } else {
        form.concerns()
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let product = form.product_type().map_or("-", |p| p.label());

    block(vec![
        "Questionnaire".to_string(),
        format!("  Skin type:    {skin}"),
        format!("  Sensitive:    {sensitive}"),
        format!("  Concerns:     {concerns}"),
        format!("  Product type: {product}"),
        format!("  Allergies:    {}", form.allergies_text()),
    ])
}

/// Join lines into a newline-terminated block.
fn block(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn render_stars(rating: Option<f64>) -> String {
    star_rating(rating)
        .iter()
        .map(|star| match star {
            Star::Full => '★',
            Star::Half => '⯪',
            Star::Empty => '☆',
        })
        .collect()
}

pub fn render_view(view: &RecommendationView) -> String {
    match view {
        RecommendationView::Loading => LOADING_MESSAGE.to_string(),
        RecommendationView::NoMatches { back_to } => format!(
            "{NO_MATCHES_TITLE}\n{NO_MATCHES_HINT}\nType 'back' to return to the {}.",
            back_to.label().to_lowercase()
        ),
        RecommendationView::Matches { heading, products } => {
            let mut lines = vec![heading.clone(), RESULTS_SUBHEADING.to_string()];
            for product in products {
                lines.extend([
                    String::new(),
                    format!("{} ({})", product.title, product.brand),
                    format!("  {}", render_stars(product.rating)),
                    format!("  {}", product.description),
                    format!("  Key ingredients: {}", product.ingredients.join(", ")),
                    format!("  {}", product.price),
                ]);
            }
            block(lines)
        }
    }
}

pub fn render_upload_error(error: &UploadError) -> String {
    format!("! {}", error.user_message())
}

/// One line per blocking field.
pub fn render_transition_error(error: &TransitionError) -> String {
    match error {
        TransitionError::UploadInProgress => format!("! {error}"),
        TransitionError::ValidationFailed(failed) => failed
            .messages()
            .iter()
            .map(|m| format!("! {m}"))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}
