use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::debug;

use crate::db::Database;
use crate::error::Result;
use crate::models::{
    CombinedShoppingList, MealShoppingList, Recipe, RecipeShoppingList, ShoppingItem,
};
use crate::service::RecipeProvider;

/// Build the flat and by-meal shopping lists for every planned meal.
///
/// Each distinct recipe is fetched once per call. Ingredients are counted by
/// their exact display string, so a string appears in the flat list once with
/// the number of planned meals that use it. Any fetch failure aborts the build.
pub fn build_combined_list(
    db: &Database,
    provider: &dyn RecipeProvider,
) -> Result<CombinedShoppingList> {
    let meals = db.list_meal_plan()?;
    let mut recipes: HashMap<i64, Recipe> = HashMap::new();
    let mut items: Vec<ShoppingItem> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut by_meal = Vec::with_capacity(meals.len());

    for meal in meals {
        let recipe = match recipes.entry(meal.recipe_id) {
            Entry::Occupied(e) => {
                debug!(recipe_id = meal.recipe_id, "recipe already fetched for this list");
                e.into_mut()
            }
            Entry::Vacant(e) => e.insert(provider.recipe_information(meal.recipe_id)?),
        };

        for ingredient in &recipe.ingredients {
            if let Some(&idx) = positions.get(ingredient) {
                items[idx].count += 1;
            } else {
                positions.insert(ingredient.clone(), items.len());
                items.push(ShoppingItem {
                    ingredient: ingredient.clone(),
                    count: 1,
                });
            }
        }

        by_meal.push(MealShoppingList {
            planned_date: meal.planned_date,
            meal_slot: meal.meal_slot,
            title: meal.title,
            recipe_id: meal.recipe_id,
            ingredients: recipe.ingredients.clone(),
        });
    }

    debug!(
        meals = by_meal.len(),
        recipes = recipes.len(),
        items = items.len(),
        "combined shopping list built"
    );
    Ok(CombinedShoppingList { items, by_meal })
}

pub fn build_single_recipe_list(
    provider: &dyn RecipeProvider,
    recipe_id: i64,
) -> Result<RecipeShoppingList> {
    let recipe = provider.recipe_information(recipe_id)?;
    Ok(RecipeShoppingList {
        recipe_id: recipe.id,
        title: recipe.title,
        ingredients: recipe.ingredients,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use chrono::NaiveDate;

    use super::*;
    use crate::LarderError;
    use crate::models::{MealSlot, NewMealPlanEntry, RecipeSummary, SearchQuery};

    /// In-memory provider that records every detail fetch.
    pub(crate) struct StubProvider {
        recipes: HashMap<i64, Recipe>,
        fail_on: Option<i64>,
        calls: Mutex<Vec<i64>>,
    }

    impl StubProvider {
        pub(crate) fn new() -> Self {
            Self {
                recipes: HashMap::new(),
                fail_on: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn with_recipe(mut self, id: i64, title: &str, ingredients: &[&str]) -> Self {
            self.recipes.insert(
                id,
                Recipe {
                    id,
                    title: title.to_string(),
                    image: Some(format!("https://img.example/{id}.jpg")),
                    ready_in_minutes: Some(20),
                    servings: Some(2),
                    ingredients: ingredients.iter().map(ToString::to_string).collect(),
                    instructions: None,
                    nutrients: vec![],
                },
            );
            self
        }

        pub(crate) fn failing_on(mut self, id: i64) -> Self {
            self.fail_on = Some(id);
            self
        }

        pub(crate) fn calls(&self) -> Vec<i64> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl RecipeProvider for StubProvider {
        fn search(&self, _query: &SearchQuery) -> Result<Vec<RecipeSummary>> {
            let mut results: Vec<RecipeSummary> = self
                .recipes
                .values()
                .map(|r| RecipeSummary {
                    id: r.id,
                    title: r.title.clone(),
                    image: r.image.clone(),
                    used_ingredient_count: 0,
                    missed_ingredient_count: 0,
                    ready_in_minutes: r.ready_in_minutes,
                    servings: r.servings,
                })
                .collect();
            results.sort_by_key(|r| r.id);
            Ok(results)
        }

        fn recipe_information(&self, recipe_id: i64) -> Result<Recipe> {
            self.calls.lock().unwrap().push(recipe_id);
            if self.fail_on == Some(recipe_id) {
                return Err(LarderError::fetch("connection reset by peer"));
            }
            self.recipes
                .get(&recipe_id)
                .cloned()
                .ok_or_else(|| LarderError::fetch(format!("404 Not Found for recipe {recipe_id}")))
        }
    }

    fn plan(db: &Database, recipe_id: i64, date: &str, slot: MealSlot) {
        db.insert_meal_plan_entry(&NewMealPlanEntry {
            recipe_id,
            planned_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            meal_slot: slot,
        })
        .unwrap();
    }

    #[test]
    fn test_same_recipe_twice_counts_each_ingredient_twice() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_favorite(1, "Pancakes", None).unwrap();
        plan(&db, 1, "2024-05-01", MealSlot::Breakfast);
        plan(&db, 1, "2024-05-03", MealSlot::Dinner);
        let provider = StubProvider::new().with_recipe(1, "Pancakes", &["2 eggs", "1 cup milk"]);

        let list = build_combined_list(&db, &provider).unwrap();
        assert_eq!(list.flat_lines(), vec!["2 eggs (x2)", "1 cup milk (x2)"]);
        assert_eq!(list.by_meal.len(), 2);
        assert_eq!(list.by_meal[0].header(), "2024-05-01 - Breakfast: Pancakes");
        assert_eq!(list.by_meal[1].header(), "2024-05-03 - Dinner: Pancakes");
        assert_eq!(list.by_meal[1].ingredients, vec!["2 eggs", "1 cup milk"]);
    }

    #[test]
    fn test_each_recipe_fetched_once_per_build() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_favorite(1, "Pancakes", None).unwrap();
        db.upsert_favorite(2, "Salad", None).unwrap();
        plan(&db, 1, "2024-05-01", MealSlot::Breakfast);
        plan(&db, 2, "2024-05-01", MealSlot::Lunch);
        plan(&db, 1, "2024-05-02", MealSlot::Breakfast);
        plan(&db, 1, "2024-05-03", MealSlot::Breakfast);
        let provider = StubProvider::new()
            .with_recipe(1, "Pancakes", &["2 eggs"])
            .with_recipe(2, "Salad", &["1 head lettuce"]);

        let list = build_combined_list(&db, &provider).unwrap();
        assert_eq!(provider.calls(), vec![1, 2]);
        assert_eq!(list.by_meal.len(), 4);
        assert_eq!(list.flat_lines(), vec!["2 eggs (x3)", "1 head lettuce"]);

        // The cache does not outlive the call.
        build_combined_list(&db, &provider).unwrap();
        assert_eq!(provider.calls(), vec![1, 2, 1, 2]);
    }

    #[test]
    fn test_phrasing_variants_are_not_merged() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_favorite(1, "Bread", None).unwrap();
        db.upsert_favorite(2, "Cake", None).unwrap();
        plan(&db, 1, "2024-05-01", MealSlot::Lunch);
        plan(&db, 2, "2024-05-01", MealSlot::Snack);
        let provider = StubProvider::new()
            .with_recipe(1, "Bread", &["2 cups flour", "1 tsp salt"])
            .with_recipe(2, "Cake", &["2 cup flour", "1 tsp salt"]);

        let list = build_combined_list(&db, &provider).unwrap();
        assert_eq!(
            list.flat_lines(),
            vec!["2 cups flour", "1 tsp salt (x2)", "2 cup flour"]
        );
    }

    #[test]
    fn test_flat_list_keeps_first_seen_order() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_favorite(1, "A", None).unwrap();
        db.upsert_favorite(2, "B", None).unwrap();
        plan(&db, 2, "2024-05-02", MealSlot::Lunch);
        plan(&db, 1, "2024-05-01", MealSlot::Lunch);
        let provider = StubProvider::new()
            .with_recipe(1, "A", &["salt", "pepper"])
            .with_recipe(2, "B", &["oil", "salt"]);

        // Listing order is by date, so recipe 1 is seen first.
        let list = build_combined_list(&db, &provider).unwrap();
        assert_eq!(list.flat_lines(), vec!["salt (x2)", "pepper", "oil"]);
        assert_eq!(provider.calls(), vec![1, 2]);
    }

    #[test]
    fn test_fetch_failure_aborts_whole_build() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_favorite(1, "Pancakes", None).unwrap();
        db.upsert_favorite(2, "Salad", None).unwrap();
        plan(&db, 1, "2024-05-01", MealSlot::Breakfast);
        plan(&db, 2, "2024-05-02", MealSlot::Lunch);
        let provider = StubProvider::new()
            .with_recipe(1, "Pancakes", &["2 eggs"])
            .with_recipe(2, "Salad", &["1 head lettuce"])
            .failing_on(2);

        let err = build_combined_list(&db, &provider).unwrap_err();
        assert!(matches!(err, LarderError::Fetch(_)));
        assert_eq!(provider.calls(), vec![1, 2]);
    }

    #[test]
    fn test_orphans_are_not_fetched() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_favorite(1, "Pancakes", None).unwrap();
        plan(&db, 1, "2024-05-01", MealSlot::Breakfast);
        plan(&db, 77, "2024-05-01", MealSlot::Dinner);
        let provider = StubProvider::new().with_recipe(1, "Pancakes", &["2 eggs"]);

        let list = build_combined_list(&db, &provider).unwrap();
        assert_eq!(provider.calls(), vec![1]);
        assert_eq!(list.by_meal.len(), 1);
    }

    #[test]
    fn test_empty_plan_makes_no_calls() {
        let db = Database::open_in_memory().unwrap();
        let provider = StubProvider::new();
        let list = build_combined_list(&db, &provider).unwrap();
        assert!(list.is_empty());
        assert!(list.items.is_empty());
        assert!(provider.calls().is_empty());
    }

    #[test]
    fn test_single_recipe_list() {
        let provider = StubProvider::new().with_recipe(3, "Soup", &["1 onion", "2 carrots"]);
        let list = build_single_recipe_list(&provider, 3).unwrap();
        assert_eq!(list.recipe_id, 3);
        assert_eq!(list.title, "Soup");
        assert_eq!(list.ingredients, vec!["1 onion", "2 carrots"]);
    }

    #[test]
    fn test_single_recipe_list_fetch_failure() {
        let provider = StubProvider::new();
        let err = build_single_recipe_list(&provider, 3).unwrap_err();
        assert!(matches!(err, LarderError::Fetch(_)));
    }
}
