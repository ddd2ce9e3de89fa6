use anyhow::Result;

use larder_core::service::{RecipeProvider, RecipeService};

pub(crate) fn cmd_show(
    svc: &RecipeService,
    provider: &dyn RecipeProvider,
    recipe_id: i64,
    json: bool,
) -> Result<()> {
    let recipe = svc.recipe_detail(provider, recipe_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
        return Ok(());
    }

    let title = &recipe.title;
    println!("=== {title} ===\n");

    let minutes = recipe
        .ready_in_minutes
        .map_or("N/A".to_string(), |m| m.to_string());
    let servings = recipe.servings.map_or("N/A".to_string(), |s| s.to_string());
    println!("  {minutes} minutes | Serves {servings}\n");

    println!("INGREDIENTS");
    for ingredient in &recipe.ingredients {
        println!("  • {ingredient}");
    }

    println!("\nINSTRUCTIONS");
    match recipe.plain_instructions() {
        Some(text) => println!("  {text}"),
        None => println!("  No instructions available."),
    }

    if !recipe.nutrients.is_empty() {
        println!("\nNUTRITION");
        for nutrient in &recipe.nutrients {
            println!("  {nutrient}");
        }
    }

    let id = recipe.id;
    println!("\nPlan it with: larder plan add {id} --date <YYYY-MM-DD> --meal dinner");
    Ok(())
}
