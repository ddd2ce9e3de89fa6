use std::path::Path;

use tracing::{debug, warn};

use crate::db::Database;
use crate::error::{LarderError, Result};
use crate::models::{
    CombinedShoppingList, FavoriteEntry, MealPlanEntry, MealSlot, NewMealPlanEntry, PlannedMeal,
    Recipe, RecipeShoppingList, RecipeSummary, SearchQuery, parse_planned_date,
};
use crate::shopping;

/// Source of recipe data.
///
/// The CLI implements this over reqwest. Calls are blocking; failures of any
/// kind are reported as [`crate::LarderError::Fetch`].
pub trait RecipeProvider: Send + Sync {
    fn search(&self, query: &SearchQuery) -> Result<Vec<RecipeSummary>>;
    fn recipe_information(&self, recipe_id: i64) -> Result<Recipe>;
}

pub struct RecipeService {
    db: Database,
}

impl RecipeService {
    pub fn new(db_path: &Path) -> Result<Self> {
        let db = Database::open(db_path)?;
        Ok(Self { db })
    }

    pub fn new_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self { db })
    }

    // --- Provider pass-through ---

    pub fn search(
        &self,
        provider: &dyn RecipeProvider,
        query: &SearchQuery,
    ) -> Result<Vec<RecipeSummary>> {
        if query.ingredients.trim().is_empty() {
            return Err(LarderError::validation(
                "Please enter ingredients to search for recipes",
            ));
        }
        provider.search(query)
    }

    pub fn recipe_detail(&self, provider: &dyn RecipeProvider, recipe_id: i64) -> Result<Recipe> {
        provider.recipe_information(recipe_id)
    }

    // --- Favorites ---

    pub fn add_favorite(
        &self,
        recipe_id: i64,
        title: &str,
        image: Option<&str>,
    ) -> Result<FavoriteEntry> {
        self.db.upsert_favorite(recipe_id, title, image)
    }

    /// Fetch the recipe's title and image from the provider, then favorite it.
    pub fn favorite_recipe(
        &self,
        provider: &dyn RecipeProvider,
        recipe_id: i64,
    ) -> Result<FavoriteEntry> {
        let recipe = provider.recipe_information(recipe_id)?;
        self.db
            .upsert_favorite(recipe.id, &recipe.title, recipe.image.as_deref())
    }

    pub fn get_favorite(&self, recipe_id: i64) -> Result<Option<FavoriteEntry>> {
        self.db.get_favorite(recipe_id)
    }

    pub fn list_favorites(&self) -> Result<Vec<FavoriteEntry>> {
        self.db.list_favorites()
    }

    // --- Meal plan ---

    /// Validate `date` and `slot`, then append a meal-plan row. Nothing is
    /// written when either is malformed.
    pub fn plan_meal(&self, recipe_id: i64, date: &str, slot: &str) -> Result<MealPlanEntry> {
        let planned_date = parse_planned_date(date)?;
        let meal_slot: MealSlot = slot.parse()?;
        if self.db.get_favorite(recipe_id)?.is_none() {
            warn!(
                recipe_id,
                "planning a recipe that is not a favorite; it will be hidden from the plan"
            );
        }
        self.db.insert_meal_plan_entry(&NewMealPlanEntry {
            recipe_id,
            planned_date,
            meal_slot,
        })
    }

    pub fn list_meal_plan(&self) -> Result<Vec<PlannedMeal>> {
        self.db.list_meal_plan()
    }

    pub fn list_orphaned_meal_plans(&self) -> Result<Vec<MealPlanEntry>> {
        let orphans = self.db.list_orphaned_meal_plans()?;
        debug!(count = orphans.len(), "orphaned meal plan rows");
        Ok(orphans)
    }

    // --- Shopping lists ---

    pub fn combined_shopping_list(
        &self,
        provider: &dyn RecipeProvider,
    ) -> Result<CombinedShoppingList> {
        shopping::build_combined_list(&self.db, provider)
    }

    pub fn recipe_shopping_list(
        &self,
        provider: &dyn RecipeProvider,
        recipe_id: i64,
    ) -> Result<RecipeShoppingList> {
        shopping::build_single_recipe_list(provider, recipe_id)
    }
}
