use std::path::Path;

use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, params};
use tracing::debug;

use crate::error::Result;
use crate::models::{FavoriteEntry, MealPlanEntry, NewMealPlanEntry, PlannedMeal};

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "opening database");
        let conn = Connection::open(path)?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            debug!(from = version, to = 1, "migrating schema");
            // meal_plans.recipe_id is a soft reference: rows may outlive or
            // predate their favorite.
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS favorites (
                    recipe_id INTEGER PRIMARY KEY,
                    title TEXT NOT NULL,
                    image_url TEXT,
                    added_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS meal_plans (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    recipe_id INTEGER NOT NULL,
                    planned_date TEXT NOT NULL,
                    meal_slot TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_meal_plans_date ON meal_plans(planned_date);
                CREATE INDEX IF NOT EXISTS idx_meal_plans_recipe ON meal_plans(recipe_id);

                PRAGMA user_version = 1;",
            )?;
        }

        Ok(())
    }

    /// UTC with a fixed `Z` suffix, so stored timestamps sort as text.
    fn now() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    // --- Row mapping helpers ---

    fn favorite_from_row(row: &rusqlite::Row) -> rusqlite::Result<FavoriteEntry> {
        Ok(FavoriteEntry {
            recipe_id: row.get(0)?,
            title: row.get(1)?,
            image: row.get(2)?,
            added_at: row.get(3)?,
        })
    }

    fn meal_plan_from_row(row: &rusqlite::Row) -> rusqlite::Result<MealPlanEntry> {
        Ok(MealPlanEntry {
            id: row.get(0)?,
            recipe_id: row.get(1)?,
            planned_date: row.get(2)?,
            meal_slot: row.get(3)?,
        })
    }

    // Expects columns:
    // 0: mp.id, 1: mp.recipe_id, 2: mp.planned_date, 3: mp.meal_slot, 4: f.title
    fn planned_meal_from_row(row: &rusqlite::Row) -> rusqlite::Result<PlannedMeal> {
        Ok(PlannedMeal {
            id: row.get(0)?,
            recipe_id: row.get(1)?,
            planned_date: row.get(2)?,
            meal_slot: row.get(3)?,
            title: row.get(4)?,
        })
    }

    // --- Favorites ---

    /// Insert or replace the favorite for `recipe_id`, refreshing its timestamp.
    pub fn upsert_favorite(
        &self,
        recipe_id: i64,
        title: &str,
        image: Option<&str>,
    ) -> Result<FavoriteEntry> {
        let now = Self::now();
        self.conn.execute(
            "INSERT OR REPLACE INTO favorites (recipe_id, title, image_url, added_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![recipe_id, title, image, now],
        )?;
        debug!(recipe_id, "favorite saved");
        Ok(FavoriteEntry {
            recipe_id,
            title: title.to_string(),
            image: image.map(str::to_string),
            added_at: now,
        })
    }

    pub fn get_favorite(&self, recipe_id: i64) -> Result<Option<FavoriteEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT recipe_id, title, image_url, added_at FROM favorites WHERE recipe_id = ?1",
        )?;
        let mut rows = stmt.query(params![recipe_id])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Self::favorite_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    /// Most recently added first.
    pub fn list_favorites(&self) -> Result<Vec<FavoriteEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT recipe_id, title, image_url, added_at FROM favorites
             ORDER BY added_at DESC, recipe_id DESC",
        )?;
        let favorites = stmt
            .query_map([], Self::favorite_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(favorites)
    }

    // --- Meal Plans ---

    pub fn insert_meal_plan_entry(&self, entry: &NewMealPlanEntry) -> Result<MealPlanEntry> {
        let date_str = entry.planned_date.format("%Y-%m-%d").to_string();
        self.conn.execute(
            "INSERT INTO meal_plans (recipe_id, planned_date, meal_slot) VALUES (?1, ?2, ?3)",
            params![entry.recipe_id, date_str, entry.meal_slot.as_str()],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, recipe_id = entry.recipe_id, "meal plan entry added");
        Ok(MealPlanEntry {
            id,
            recipe_id: entry.recipe_id,
            planned_date: date_str,
            meal_slot: entry.meal_slot.as_str().to_string(),
        })
    }

    /// Planned meals joined with their favorites, by date then meal slot.
    ///
    /// Ordering compares the stored text. Rows whose recipe is not a favorite
    /// are left out; see [`Database::list_orphaned_meal_plans`].
    pub fn list_meal_plan(&self) -> Result<Vec<PlannedMeal>> {
        let mut stmt = self.conn.prepare(
            "SELECT mp.id, mp.recipe_id, mp.planned_date, mp.meal_slot, f.title
             FROM meal_plans mp
             JOIN favorites f ON mp.recipe_id = f.recipe_id
             ORDER BY mp.planned_date, mp.meal_slot, mp.id",
        )?;
        let meals = stmt
            .query_map([], Self::planned_meal_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(meals)
    }

    /// Meal-plan rows with no matching favorite.
    pub fn list_orphaned_meal_plans(&self) -> Result<Vec<MealPlanEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT mp.id, mp.recipe_id, mp.planned_date, mp.meal_slot
             FROM meal_plans mp
             LEFT JOIN favorites f ON mp.recipe_id = f.recipe_id
             WHERE f.recipe_id IS NULL
             ORDER BY mp.planned_date, mp.meal_slot, mp.id",
        )?;
        let entries = stmt
            .query_map([], Self::meal_plan_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    #[cfg(test)]
    fn count_rows(&self, table: &str) -> i64 {
        self.conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap()
    }

    #[cfg(test)]
    fn set_added_at(&self, recipe_id: i64, added_at: &str) {
        self.conn
            .execute(
                "UPDATE favorites SET added_at = ?1 WHERE recipe_id = ?2",
                params![added_at, recipe_id],
            )
            .unwrap();
    }
}
