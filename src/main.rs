use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use healthybot::app_state::{AppState, UploadOutcome};
use healthybot::compatibility;
use healthybot::config::AppConfig;
use healthybot::dietary::{is_known_restriction, DIETARY_OPTIONS};
use healthybot::geo::{self, Location};
use healthybot::image_queue::{ImageQueue, UploadedImage};
use healthybot::ingredient_model::Category;
use healthybot::localization::t_lang;
use healthybot::proxy_client::ProxyClient;
use healthybot::recipe_catalog::RecipeCatalog;
use healthybot::recipe_model::display_tag;
use healthybot::shopping_list;
use healthybot::venues::{describe_location, find_meeting_venues, PlacesClient};

#[derive(Parser)]
#[command(name = "healthybot", about = "Kitchen assistant and meeting-point finder")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rank recipes against what is in the fridge
    Recipes {
        /// Ingredients available at home
        #[arg(long = "have", num_args = 1..)]
        have: Vec<String>,
        /// Dietary restrictions every recipe must satisfy
        #[arg(long = "diet")]
        diet: Vec<String>,
    },
    /// List the dietary restrictions recipes can be filtered by
    Diets,
    /// List what a recipe still needs
    Shopping {
        recipe: String,
        #[arg(long = "have", num_args = 1..)]
        have: Vec<String>,
    },
    /// Suggest venues between two people ("lat,lng" each)
    Meet {
        #[arg(allow_hyphen_values = true)]
        me: Location,
        #[arg(allow_hyphen_values = true)]
        friend: Location,
    },
    /// Print a link that shares a location as the friend's position
    Share {
        base_url: String,
        #[arg(allow_hyphen_values = true)]
        location: Location,
    },
    /// Detect fridge ingredients in photos, one at a time
    Analyze {
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Ask the assistant a question
    Chat {
        message: String,
        #[arg(long = "have")]
        have: Vec<String>,
    },
    /// Fetch the demo dashboard payload
    Dashboard,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("HEALTHYBOT_LOG_JSON")
        .map(|value| value == "true")
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file before reading the log filter
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    match cli.command {
        Command::Recipes { have, diet } => {
            if let Some(unknown) = diet.iter().find(|d| !is_known_restriction(d)) {
                anyhow::bail!(
                    "Unknown dietary restriction '{}', expected one of: {}",
                    unknown,
                    DIETARY_OPTIONS.join(", ")
                );
            }

            let catalog = RecipeCatalog::builtin();
            let restrictions: BTreeSet<String> = diet.iter().map(|d| d.trim().to_lowercase()).collect();
            let ranked = compatibility::filter(catalog.recipes(), &have, &restrictions);

            if ranked.is_empty() {
                println!("No compatible recipes.");
            }
            for entry in ranked {
                let tags: Vec<String> = entry.recipe.dietary_tags.iter().map(|t| display_tag(t)).collect();
                println!(
                    "{:>5.1}%  {}  [{}]",
                    entry.compatibility_score,
                    entry.recipe,
                    tags.join(", ")
                );
            }
        }
        Command::Diets => {
            println!("{}", t_lang("dietary-title", Some(&config.language)));
            for option in DIETARY_OPTIONS {
                println!("- {}", display_tag(option));
            }
        }
        Command::Shopping { recipe, have } => {
            let catalog = RecipeCatalog::builtin();
            let recipe = catalog
                .find(&recipe)
                .with_context(|| format!("No recipe named '{recipe}'"))?;
            for name in shopping_list::missing_for(recipe, &have) {
                println!("- {name}");
            }
        }
        Command::Meet { me, friend } => {
            let places = PlacesClient::from_config(&config)?;
            let plan = find_meeting_venues(
                places.as_ref(),
                &me,
                &friend,
                config.search_radius_m,
                config.max_venues,
            )
            .await;

            let center_label = describe_location(places.as_ref(), &plan.center).await;
            println!("Midpoint: {center_label}");
            if plan.used_fallback {
                println!("{}", t_lang("venue-fallback", Some(&config.language)));
            }
            for ranked in &plan.venues {
                println!(
                    "{}  (you: {}, friend: {})  {}",
                    ranked.venue.name,
                    geo::format_distance(ranked.distance_to_user_a_km),
                    geo::format_distance(ranked.distance_to_user_b_km),
                    ranked.venue.address
                );
            }
        }
        Command::Share { base_url, location } => {
            println!("{}", geo::share_link(&base_url, &location)?);
        }
        Command::Analyze { images } => {
            let client = ProxyClient::from_config(&config)?;
            let mut app = AppState::new(RecipeCatalog::builtin(), &config);
            let mut queue = ImageQueue::new();

            for path in &images {
                match UploadedImage::from_path(path, config.max_upload_bytes) {
                    Ok(image) => queue.push(image),
                    Err(e) => eprintln!("Skipping {}: {}", path.display(), e),
                }
            }

            let outcomes = app.process_uploads(&client, &mut queue).await;
            for notice in app.take_notices() {
                println!("{notice}");
            }
            let failures = outcomes
                .iter()
                .filter(|outcome| matches!(outcome, UploadOutcome::Failed { .. }))
                .count();
            info!("{} image(s) analyzed, {} failed", outcomes.len(), failures);

            for item in app.store().list(Category::Fridge) {
                println!("- {item}");
            }
            for entry in app.recipes() {
                println!("{:>5.1}%  {}", entry.compatibility_score, entry.recipe.title);
            }
        }
        Command::Chat { message, have } => {
            let client = ProxyClient::from_config(&config)?;
            let mut app = AppState::new(RecipeCatalog::builtin(), &config);
            for name in &have {
                app.add_manual(name, "", Category::Fridge)?;
            }
            let reply = app.send_chat(&client, &message).await?;
            println!("{reply}");
        }
        Command::Dashboard => {
            let client = ProxyClient::from_config(&config)?;
            let payload = client.dashboard().await?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
    }

    Ok(())
}
