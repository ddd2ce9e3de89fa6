use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{LarderError, Result};

/// Number of candidates requested per ingredient search.
pub const DEFAULT_RESULT_COUNT: u32 = 9;

/// Full recipe detail as returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub ready_in_minutes: Option<u32>,
    pub servings: Option<u32>,
    /// Ingredient display strings, in provider order.
    pub ingredients: Vec<String>,
    /// Provider instructions, may contain HTML tags.
    pub instructions: Option<String>,
    pub nutrients: Vec<Nutrient>,
}

impl Recipe {
    /// Instructions with markup removed, or `None` when the provider sent none.
    #[must_use]
    pub fn plain_instructions(&self) -> Option<String> {
        self.instructions
            .as_deref()
            .map(strip_html)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nutrient {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}{}", self.name, self.amount, self.unit)
    }
}

/// A candidate recipe from an ingredient search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub used_ingredient_count: u32,
    pub missed_ingredient_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ready_in_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FavoriteEntry {
    pub recipe_id: i64,
    pub title: String,
    pub image: Option<String>,
    pub added_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MealPlanEntry {
    pub id: i64,
    pub recipe_id: i64,
    pub planned_date: String,
    pub meal_slot: String,
}

#[derive(Debug, Clone)]
pub struct NewMealPlanEntry {
    pub recipe_id: i64,
    pub planned_date: NaiveDate,
    pub meal_slot: MealSlot,
}

/// A meal-plan row joined with its favorite's title.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedMeal {
    pub id: i64,
    pub recipe_id: i64,
    pub planned_date: String,
    pub meal_slot: String,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Snack,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::Lunch => "Lunch",
            MealSlot::Dinner => "Dinner",
            MealSlot::Snack => "Snack",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealSlot {
    type Err = LarderError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        MealSlot::ALL
            .into_iter()
            .find(|slot| slot.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                LarderError::validation(format!(
                    "Invalid meal slot '{s}'. Must be one of: {}",
                    MealSlot::ALL.map(MealSlot::as_str).join(", ")
                ))
            })
    }
}

/// Parse a planned date in `YYYY-MM-DD` form.
pub fn parse_planned_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| LarderError::validation(format!("Invalid date '{s}'. Use YYYY-MM-DD")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diet {
    Vegetarian,
    Vegan,
    GlutenFree,
}

impl Diet {
    /// Value sent in the provider's `diet` query parameter.
    #[must_use]
    pub fn query_value(self) -> &'static str {
        match self {
            Diet::Vegetarian => "vegetarian",
            Diet::Vegan => "vegan",
            Diet::GlutenFree => "gluten free",
        }
    }
}

impl FromStr for Diet {
    type Err = LarderError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match normalized.as_str() {
            "vegetarian" => Ok(Diet::Vegetarian),
            "vegan" => Ok(Diet::Vegan),
            "glutenfree" => Ok(Diet::GlutenFree),
            _ => Err(LarderError::validation(format!(
                "Invalid diet '{s}'. Must be one of: vegetarian, vegan, gluten-free"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub ingredients: String,
    pub diet: Option<Diet>,
    pub max_ready_time: Option<u32>,
    pub number: u32,
}

impl SearchQuery {
    /// Build a query from a comma-separated ingredient list. Empty input is rejected.
    pub fn new(ingredients: &str) -> Result<Self> {
        let ingredients = ingredients
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(",");
        if ingredients.is_empty() {
            return Err(LarderError::validation(
                "Please enter ingredients to search for recipes",
            ));
        }
        Ok(Self {
            ingredients,
            diet: None,
            max_ready_time: None,
            number: DEFAULT_RESULT_COUNT,
        })
    }

    #[must_use]
    pub fn with_diet(mut self, diet: Option<Diet>) -> Self {
        self.diet = diet;
        self
    }

    /// A limit of zero means no limit.
    #[must_use]
    pub fn with_max_ready_time(mut self, minutes: Option<u32>) -> Self {
        self.max_ready_time = minutes.filter(|m| *m > 0);
        self
    }
}

/// One line of a flat shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingItem {
    pub ingredient: String,
    pub count: usize,
}

impl fmt::Display for ShoppingItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count > 1 {
            write!(f, "{} (x{})", self.ingredient, self.count)
        } else {
            f.write_str(&self.ingredient)
        }
    }
}

/// Ingredients for one planned meal, under its header.
#[derive(Debug, Clone, Serialize)]
pub struct MealShoppingList {
    pub planned_date: String,
    pub meal_slot: String,
    pub title: String,
    pub recipe_id: i64,
    pub ingredients: Vec<String>,
}

impl MealShoppingList {
    #[must_use]
    pub fn header(&self) -> String {
        format!("{} - {}: {}", self.planned_date, self.meal_slot, self.title)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CombinedShoppingList {
    pub items: Vec<ShoppingItem>,
    pub by_meal: Vec<MealShoppingList>,
}

impl CombinedShoppingList {
    /// Rendered flat list, first-seen order, counts suffixed.
    #[must_use]
    pub fn flat_lines(&self) -> Vec<String> {
        self.items.iter().map(ToString::to_string).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_meal.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeShoppingList {
    pub recipe_id: i64,
    pub title: String,
    pub ingredients: Vec<String>,
}

/// Remove `<...>` markup from provider text.
///
/// A tag is a `<` followed by at least one character and a closing `>`, with
/// no other `<` in between. A `<` that never closes is kept as text.
#[must_use]
pub fn strip_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending = String::new();
    let mut in_tag = false;
    for c in s.chars() {
        if !in_tag {
            if c == '<' {
                in_tag = true;
            } else {
                out.push(c);
            }
            continue;
        }
        match c {
            '<' => {
                out.push('<');
                out.push_str(&pending);
                pending.clear();
            }
            '>' if !pending.is_empty() => {
                in_tag = false;
                pending.clear();
            }
            _ => pending.push(c),
        }
    }
    if in_tag {
        out.push('<');
        out.push_str(&pending);
    }
    out
}
