mod commands;
mod config;
mod search_runner;
mod spoonacular;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::commands::{
    cmd_favorite_add, cmd_favorite_list, cmd_plan_add, cmd_plan_list, cmd_plan_orphans,
    cmd_search, cmd_shopping_all, cmd_shopping_recipe, cmd_show,
};
use crate::config::Config;
use crate::spoonacular::SpoonacularClient;
use larder_core::export::DEFAULT_EXPORT_PATH;
use larder_core::models::{Diet, SearchQuery};
use larder_core::service::RecipeService;

#[derive(Parser)]
#[command(
    name = "larder",
    version,
    about = "Find recipes by ingredient, plan meals, build shopping lists"
)]
struct Cli {
    /// Database file (default: larder.db in the user data directory)
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,
    /// Show debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search recipes by the ingredients you have
    Search {
        /// Ingredients, comma separated (e.g. "eggs, milk, flour")
        ingredients: String,
        /// Diet filter: vegetarian, vegan, gluten-free
        #[arg(long)]
        diet: Option<String>,
        /// Maximum cooking time in minutes (0 = no limit)
        #[arg(long, value_name = "MINUTES")]
        max_time: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a recipe's ingredients, instructions and nutrition
    Show {
        /// Recipe ID
        recipe_id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage favorite recipes
    Favorite {
        #[command(subcommand)]
        command: FavoriteCommands,
    },
    /// Plan meals from favorite recipes
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Build shopping lists
    Shopping {
        #[command(subcommand)]
        command: ShoppingCommands,
    },
}

#[derive(Subcommand)]
enum FavoriteCommands {
    /// Add a recipe to favorites (re-adding refreshes it)
    Add {
        /// Recipe ID
        recipe_id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List favorites, most recent first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum PlanCommands {
    /// Schedule a recipe for a date and meal
    Add {
        /// Recipe ID
        recipe_id: i64,
        /// Date (YYYY-MM-DD or today/tomorrow/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Meal: breakfast, lunch, dinner, snack
        #[arg(short, long, default_value = "dinner")]
        meal: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show planned meals by date
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show planned meals hidden because their recipe isn't a favorite
    Orphans {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ShoppingCommands {
    /// Combined list for every planned meal
    All {
        /// Write the list to a text file
        #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = DEFAULT_EXPORT_PATH)]
        export: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List for a single recipe
    Recipe {
        /// Recipe ID
        recipe_id: i64,
        /// Write the list to a text file
        #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = DEFAULT_EXPORT_PATH)]
        export: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        debug!(error = ?e, "command failed");
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn recipe_client(config: &Config) -> Result<SpoonacularClient> {
    SpoonacularClient::new(&config.api_base(), config.api_key()?)
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.db)?;
    let svc = RecipeService::new(&config.db_path)?;

    match cli.command {
        Commands::Search {
            ingredients,
            diet,
            max_time,
            json,
        } => {
            let diet = diet
                .as_deref()
                .filter(|d| !d.eq_ignore_ascii_case("none"))
                .map(str::parse::<Diet>)
                .transpose()?;
            let query = SearchQuery::new(&ingredients)?
                .with_diet(diet)
                .with_max_ready_time(max_time);
            let client = Arc::new(recipe_client(&config)?);
            cmd_search(client, query, json).await
        }
        Commands::Show { recipe_id, json } => {
            cmd_show(&svc, &recipe_client(&config)?, recipe_id, json)
        }
        Commands::Favorite { command } => match command {
            FavoriteCommands::Add { recipe_id, json } => {
                cmd_favorite_add(&svc, &recipe_client(&config)?, recipe_id, json)
            }
            FavoriteCommands::List { json } => cmd_favorite_list(&svc, json),
        },
        Commands::Plan { command } => match command {
            PlanCommands::Add {
                recipe_id,
                date,
                meal,
                json,
            } => cmd_plan_add(&svc, recipe_id, date.as_deref(), &meal, json),
            PlanCommands::List { json } => cmd_plan_list(&svc, json),
            PlanCommands::Orphans { json } => cmd_plan_orphans(&svc, json),
        },
        Commands::Shopping { command } => match command {
            ShoppingCommands::All { export, json } => {
                cmd_shopping_all(&svc, &recipe_client(&config)?, export.as_deref(), json)
            }
            ShoppingCommands::Recipe {
                recipe_id,
                export,
                json,
            } => cmd_shopping_recipe(
                &svc,
                &recipe_client(&config)?,
                recipe_id,
                export.as_deref(),
                json,
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_export_flag_without_path_uses_default() {
        let cli = Cli::try_parse_from(["larder", "shopping", "all", "--export"]).unwrap();
        match cli.command {
            Commands::Shopping {
                command: ShoppingCommands::All { export, .. },
            } => assert_eq!(export, Some(PathBuf::from(DEFAULT_EXPORT_PATH))),
            _ => panic!("expected shopping all"),
        }
    }

    #[test]
    fn test_export_flag_with_path() {
        let cli =
            Cli::try_parse_from(["larder", "shopping", "recipe", "42", "--export", "out.txt"])
                .unwrap();
        match cli.command {
            Commands::Shopping {
                command:
                    ShoppingCommands::Recipe {
                        recipe_id, export, ..
                    },
            } => {
                assert_eq!(recipe_id, 42);
                assert_eq!(export, Some(PathBuf::from("out.txt")));
            }
            _ => panic!("expected shopping recipe"),
        }
    }

    #[test]
    fn test_plan_add_defaults() {
        let cli = Cli::try_parse_from(["larder", "plan", "add", "7"]).unwrap();
        match cli.command {
            Commands::Plan {
                command:
                    PlanCommands::Add {
                        recipe_id,
                        date,
                        meal,
                        ..
                    },
            } => {
                assert_eq!(recipe_id, 7);
                assert!(date.is_none());
                assert_eq!(meal, "dinner");
            }
            _ => panic!("expected plan add"),
        }
    }

    #[test]
    fn test_global_db_flag() {
        let cli = Cli::try_parse_from(["larder", "favorite", "list", "--db", "/tmp/x.db"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
    }
}
