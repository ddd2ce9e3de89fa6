use chrono::{DateTime, Duration, Local};
use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use larder_core::models::{FavoriteEntry, MealPlanEntry, PlannedMeal, RecipeSummary};

/// Expand `today`, `tomorrow` and `yesterday` to `YYYY-MM-DD`. Anything else is
/// passed through for the service to validate.
pub(crate) fn resolve_date_keyword(date: Option<&str>) -> String {
    let today = Local::now().date_naive();
    let resolved = match date.map(str::trim) {
        None | Some("today") => today,
        Some("tomorrow") => today + Duration::days(1),
        Some("yesterday") => today - Duration::days(1),
        Some(other) => return other.to_string(),
    };
    resolved.format("%Y-%m-%d").to_string()
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

/// Stored UTC timestamp as local `YYYY-MM-DD HH:MM`; unparseable input is shown as is.
fn local_minutes(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp).map_or_else(
        |_| timestamp.to_string(),
        |t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
    )
}

fn opt_num(v: Option<u32>) -> String {
    v.map_or("-".into(), |n| n.to_string())
}

pub(crate) fn print_recipe_table(recipes: &[RecipeSummary]) {
    #[derive(Tabled)]
    struct RecipeRow {
        #[tabled(rename = "#")]
        idx: usize,
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Title")]
        title: String,
        #[tabled(rename = "Used")]
        used: u32,
        #[tabled(rename = "Missing")]
        missed: u32,
        #[tabled(rename = "Min")]
        minutes: String,
        #[tabled(rename = "Serves")]
        servings: String,
    }

    let rows: Vec<RecipeRow> = recipes
        .iter()
        .enumerate()
        .map(|(i, r)| RecipeRow {
            idx: i + 1,
            id: r.id,
            title: truncate(&r.title, 45),
            used: r.used_ingredient_count,
            missed: r.missed_ingredient_count,
            minutes: opt_num(r.ready_in_minutes),
            servings: opt_num(r.servings),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..7)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) fn print_favorites_table(favorites: &[FavoriteEntry]) {
    #[derive(Tabled)]
    struct FavoriteRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Title")]
        title: String,
        #[tabled(rename = "Added")]
        added: String,
    }

    let rows: Vec<FavoriteRow> = favorites
        .iter()
        .map(|f| FavoriteRow {
            id: f.recipe_id,
            title: truncate(&f.title, 45),
            added: local_minutes(&f.added_at),
        })
        .collect();

    println!("{}", Table::new(&rows).with(Style::rounded()));
}

pub(crate) fn print_meal_plan_table(meals: &[PlannedMeal]) {
    #[derive(Tabled)]
    struct MealRow {
        #[tabled(rename = "#")]
        id: i64,
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Meal")]
        slot: String,
        #[tabled(rename = "Recipe")]
        recipe_id: i64,
        #[tabled(rename = "Title")]
        title: String,
    }

    let rows: Vec<MealRow> = meals
        .iter()
        .map(|m| MealRow {
            id: m.id,
            date: m.planned_date.clone(),
            slot: m.meal_slot.clone(),
            recipe_id: m.recipe_id,
            title: truncate(&m.title, 45),
        })
        .collect();

    println!("{}", Table::new(&rows).with(Style::rounded()));
}

pub(crate) fn print_orphans_table(entries: &[MealPlanEntry]) {
    #[derive(Tabled)]
    struct OrphanRow {
        #[tabled(rename = "#")]
        id: i64,
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Meal")]
        slot: String,
        #[tabled(rename = "Recipe")]
        recipe_id: i64,
    }

    let rows: Vec<OrphanRow> = entries
        .iter()
        .map(|e| OrphanRow {
            id: e.id,
            date: e.planned_date.clone(),
            slot: e.meal_slot.clone(),
            recipe_id: e.recipe_id,
        })
        .collect();

    println!("{}", Table::new(&rows).with(Style::rounded()));
}
