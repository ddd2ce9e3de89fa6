use anyhow::Result;
use std::process;

use larder_core::service::RecipeService;

use super::helpers::{print_meal_plan_table, print_orphans_table, resolve_date_keyword};

pub(crate) fn cmd_plan_add(
    svc: &RecipeService,
    recipe_id: i64,
    date: Option<&str>,
    meal: &str,
    json: bool,
) -> Result<()> {
    let date = resolve_date_keyword(date);
    let entry = svc.plan_meal(recipe_id, &date, meal)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
        return Ok(());
    }

    let date = &entry.planned_date;
    let slot = &entry.meal_slot;
    match svc.get_favorite(recipe_id)? {
        Some(fav) => {
            let title = &fav.title;
            println!("Added to meal plan: {date} - {slot}: {title}");
        }
        None => {
            println!("Added to meal plan: {date} - {slot} (recipe {recipe_id})");
            eprintln!(
                "Warning: recipe {recipe_id} is not a favorite, so it won't show in the plan. \
                 Add it with: larder favorite add {recipe_id}"
            );
        }
    }
    Ok(())
}

pub(crate) fn cmd_plan_list(svc: &RecipeService, json: bool) -> Result<()> {
    let meals = svc.list_meal_plan()?;
    let orphans = svc.list_orphaned_meal_plans()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&meals)?);
    } else if meals.is_empty() {
        eprintln!("No meals planned yet!");
    } else {
        print_meal_plan_table(&meals);
    }

    if !orphans.is_empty() && !json {
        let n = orphans.len();
        eprintln!(
            "Note: {n} planned meal(s) reference recipes that aren't favorites and are hidden. \
             See: larder plan orphans"
        );
    }

    if meals.is_empty() {
        process::exit(2);
    }
    Ok(())
}

pub(crate) fn cmd_plan_orphans(svc: &RecipeService, json: bool) -> Result<()> {
    let orphans = svc.list_orphaned_meal_plans()?;

    if orphans.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No hidden meal plan entries");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&orphans)?);
    } else {
        print_orphans_table(&orphans);
        println!("\nFavorite a recipe to bring its meals back: larder favorite add <recipe>");
    }
    Ok(())
}
