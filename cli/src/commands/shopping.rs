use anyhow::{Context, Result};
use std::path::Path;
use std::process;

use larder_core::export::write_shopping_list;
use larder_core::service::{RecipeProvider, RecipeService};

use super::helpers::json_error;

pub(crate) fn cmd_shopping_all(
    svc: &RecipeService,
    provider: &dyn RecipeProvider,
    export: Option<&Path>,
    json: bool,
) -> Result<()> {
    let list = svc.combined_shopping_list(provider)?;

    if list.is_empty() {
        if json {
            println!("{}", json_error("No meals planned"));
        } else {
            eprintln!("No meals planned!");
        }
        process::exit(2);
    }

    let lines = list.flat_lines();
    if let Some(path) = export {
        write_shopping_list(path, "all planned meals", &lines)
            .with_context(|| format!("Failed to export shopping list to {}", path.display()))?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
    } else {
        println!("=== ALL ITEMS ===\n");
        for line in &lines {
            println!("□ {line}");
        }
        println!("\n=== BY MEAL ===");
        for meal in &list.by_meal {
            println!("\n{}", meal.header());
            for ingredient in &meal.ingredients {
                println!("□ {ingredient}");
            }
        }
        if let Some(path) = export {
            println!("\nShopping list exported to {}", path.display());
        }
    }

    Ok(())
}

pub(crate) fn cmd_shopping_recipe(
    svc: &RecipeService,
    provider: &dyn RecipeProvider,
    recipe_id: i64,
    export: Option<&Path>,
    json: bool,
) -> Result<()> {
    let list = svc.recipe_shopping_list(provider, recipe_id)?;

    if let Some(path) = export {
        write_shopping_list(path, &list.title, &list.ingredients)
            .with_context(|| format!("Failed to export shopping list to {}", path.display()))?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
    } else {
        let title = &list.title;
        println!("Shopping List for {title}\n");
        for ingredient in &list.ingredients {
            println!("□ {ingredient}");
        }
        if let Some(path) = export {
            println!("\nShopping list exported to {}", path.display());
        }
    }

    Ok(())
}
