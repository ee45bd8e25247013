//! `skinwise-wizard` -- interactive skin-care recommendation wizard.
//!
//! Walks the user through three steps on the terminal: upload a face
//! photo for analysis, answer a short questionnaire, and read the
//! matching products from the catalog.
//!
//! # Environment variables
//!
//! | Variable                  | Required | Default                 | Description                     |
//! |---------------------------|----------|-------------------------|---------------------------------|
//! | `ANALYSIS_API_URL`        | no       | `http://localhost:8000` | Skin analysis service base URL  |
//! | `ANALYSIS_TIMEOUT_SECS`   | no       | `30`                    | Upper bound for one analysis    |
//! | `RECOMMENDATION_DELAY_MS` | no       | `1500`                  | Pause before results are shown  |
//! | `CATALOG_PATH`            | no       | embedded                | Product catalog JSON file       |

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use skinwise_analysis::gateway::{Submission, UploadGateway};
use skinwise_analysis::image_file::ImageFile;
use skinwise_core::presentation::RecommendationView;
use skinwise_core::wizard::Step;
use skinwise_wizard::config::WizardConfig;
use skinwise_wizard::controller::WizardController;
use skinwise_wizard::terminal::{self, Command};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skinwise_wizard=info,skinwise_analysis=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = WizardConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    let catalog = config.load_catalog().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to load product catalog");
        std::process::exit(1);
    });

    let gateway = UploadGateway::new(&config.analysis).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build analysis client");
        std::process::exit(1);
    });

    tracing::info!(
        api_url = %config.analysis.api_url,
        timeout_secs = config.analysis.timeout.as_secs(),
        products = catalog.len(),
        "Starting skinwise-wizard",
    );

    if !gateway.health_check().await {
        tracing::warn!(
            api_url = %config.analysis.api_url,
            "Analysis server is not responding; uploads will fail until it is up",
        );
    }

    let mut controller =
        WizardController::new(Arc::new(gateway), catalog, config.recommendation_delay);

    println!("{}", terminal::HELP);
    println!();
    println!("{}", terminal::render_progress(controller.state()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => break,
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read input");
                break;
            }
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("! {e}");
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        handle(&mut controller, command).await;
    }

    tracing::info!("Wizard closed");
}

async fn handle(controller: &mut WizardController, command: Command) {
    match command {
        Command::Upload(path) => upload(controller, &path).await,
        Command::SkinType(skin_type) => controller.form_mut().select_skin_type(skin_type),
        Command::Sensitive(sensitive) => controller.form_mut().set_sensitive(sensitive),
        Command::ToggleConcern(concern) => {
            let selected = controller.form_mut().toggle_concern(concern);
            println!("{concern}: {}", if selected { "selected" } else { "cleared" });
        }
        Command::ProductType(product_type) => {
            controller.form_mut().select_product_type(product_type)
        }
        Command::Allergies(text) => controller.form_mut().set_allergies_text(text),
        Command::Next => next(controller).await,
        Command::Back => {
            controller.back();
            show(controller);
        }
        Command::Show => show(controller),
        Command::Help => println!("{}", terminal::HELP),
        Command::Quit => {}
    }
}

async fn upload(controller: &mut WizardController, path: &std::path::Path) {
    if controller.current_step() != Step::Upload {
        println!("! Go back to the upload step to change your photo");
        return;
    }

    let file = match ImageFile::from_path(path).await {
        Ok(file) => file,
        Err(e) => {
            println!("! Cannot read {}: {e}", path.display());
            return;
        }
    };

    // Ctrl-C during the upload cancels it instead of quitting.
    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    println!("Analyzing {}...", file.file_name);
    let result = controller.upload_image(&file, &cancel).await;
    watcher.abort();

    match result {
        Ok(Submission::Completed(profile)) => {
            print!("{}", terminal::render_profile(&profile));
            println!("Type 'next' to continue to the questionnaire.");
        }
        Ok(Submission::Dropped) => println!("! An upload is already in progress"),
        Err(e) => println!("{}", terminal::render_upload_error(&e)),
    }
}

async fn next(controller: &mut WizardController) {
    let mut views = controller.subscribe_view();
    views.mark_unchanged();

    let result = {
        let advance = controller.next();
        tokio::pin!(advance);
        loop {
            tokio::select! {
                result = &mut advance => break result,
                Ok(()) = views.changed() => {
                    let loading = matches!(
                        *views.borrow_and_update(),
                        Some(RecommendationView::Loading)
                    );
                    if loading {
                        println!("{}", terminal::render_view(&RecommendationView::Loading));
                    }
                }
            }
        }
    };

    match result {
        Ok(_) => show(controller),
        Err(e) => println!("{}", terminal::render_transition_error(&e)),
    }
}

fn show(controller: &WizardController) {
    println!("{}", terminal::render_progress(controller.state()));
    match controller.current_step() {
        Step::Upload => match controller.profile() {
            Some(profile) => print!("{}", terminal::render_profile(profile)),
            None => println!("Upload a face photo with 'upload <path>'."),
        },
        Step::Questionnaire => print!("{}", terminal::render_form(controller.form())),
        Step::Recommendations => {
            if let Some(view) = controller.view() {
                println!("{}", terminal::render_view(&view));
            }
        }
    }
    if let Some(error) = controller.upload_error() {
        if controller.current_step() == Step::Upload {
            println!("{}", terminal::render_upload_error(error));
        }
    }
}
