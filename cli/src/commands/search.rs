use anyhow::Result;
use std::process;
use std::sync::Arc;
use tracing::debug;

use larder_core::models::SearchQuery;

use crate::search_runner::{SearchOutcome, SearchRunner};
use crate::spoonacular::SpoonacularClient;

use super::helpers::print_recipe_table;

/// Run the search in the background; Ctrl-C cancels it.
pub(crate) async fn cmd_search(
    client: Arc<SpoonacularClient>,
    query: SearchQuery,
    json: bool,
) -> Result<()> {
    let ingredients = query.ingredients.clone();
    let mut runner = SearchRunner::new(client);
    let pending = runner.submit(query);

    let outcome = tokio::select! {
        outcome = pending.wait() => outcome?,
        _ = tokio::signal::ctrl_c() => {
            debug!(in_flight = runner.is_searching(), "interrupted");
            runner.cancel();
            SearchOutcome::Cancelled
        }
    };

    let results = match outcome {
        SearchOutcome::Completed(results) => results,
        SearchOutcome::Cancelled => {
            eprintln!("Search cancelled");
            process::exit(130);
        }
    };

    if results.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No recipes found for '{ingredients}'");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_recipe_table(&results);
        println!("\nView one with: larder show <id>   Save one with: larder favorite add <id>");
    }

    Ok(())
}
