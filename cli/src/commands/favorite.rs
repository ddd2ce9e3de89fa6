use anyhow::Result;
use std::process;

use larder_core::service::{RecipeProvider, RecipeService};

use super::helpers::print_favorites_table;

pub(crate) fn cmd_favorite_add(
    svc: &RecipeService,
    provider: &dyn RecipeProvider,
    recipe_id: i64,
    json: bool,
) -> Result<()> {
    let favorite = svc.favorite_recipe(provider, recipe_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&favorite)?);
    } else {
        let title = &favorite.title;
        println!("Added '{title}' to favorites!");
    }

    Ok(())
}

pub(crate) fn cmd_favorite_list(svc: &RecipeService, json: bool) -> Result<()> {
    let favorites = svc.list_favorites()?;

    if favorites.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No favorite recipes yet!");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&favorites)?);
    } else {
        print_favorites_table(&favorites);
    }

    Ok(())
}
