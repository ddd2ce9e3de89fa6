use serde::Deserialize;

use crate::error::{LarderError, Result};
use crate::models::{Nutrient, Recipe, RecipeSummary};

/// One element of the `findByIngredients` response array.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientSearchHit {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub image: Option<String>,
    pub used_ingredient_count: Option<u32>,
    pub missed_ingredient_count: Option<u32>,
    pub ready_in_minutes: Option<u32>,
    pub servings: Option<u32>,
}

/// The `{id}/information` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InformationResponse {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub image: Option<String>,
    pub ready_in_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub extended_ingredients: Option<Vec<ExtendedIngredient>>,
    pub instructions: Option<String>,
    pub nutrition: Option<Nutrition>,
}

#[derive(Debug, Deserialize)]
pub struct ExtendedIngredient {
    pub original: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Nutrition {
    #[serde(default)]
    pub nutrients: Vec<NutrientData>,
}

#[derive(Debug, Deserialize)]
pub struct NutrientData {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

/// Hits without an id or title are dropped.
#[must_use]
pub fn hit_to_summary(hit: IngredientSearchHit) -> Option<RecipeSummary> {
    let id = hit.id?;
    let title = hit.title.filter(|t| !t.is_empty())?;
    Some(RecipeSummary {
        id,
        title,
        image: hit.image.filter(|i| !i.is_empty()),
        used_ingredient_count: hit.used_ingredient_count.unwrap_or(0),
        missed_ingredient_count: hit.missed_ingredient_count.unwrap_or(0),
        ready_in_minutes: hit.ready_in_minutes,
        servings: hit.servings,
    })
}

/// Convert a detail response, failing when fields the shopping list depends
/// on are missing.
pub fn information_to_recipe(resp: InformationResponse) -> Result<Recipe> {
    let id = resp
        .id
        .ok_or_else(|| LarderError::fetch("Recipe response is missing 'id'"))?;
    let title = resp
        .title
        .ok_or_else(|| LarderError::fetch(format!("Recipe {id} is missing 'title'")))?;
    let ingredients = resp
        .extended_ingredients
        .ok_or_else(|| {
            LarderError::fetch(format!("Recipe {id} is missing 'extendedIngredients'"))
        })?
        .into_iter()
        .map(|ing| {
            ing.original.ok_or_else(|| {
                LarderError::fetch(format!("Recipe {id} has an ingredient without 'original'"))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let nutrients = resp
        .nutrition
        .map(|n| {
            n.nutrients
                .into_iter()
                .map(|d| Nutrient {
                    name: d.name,
                    amount: d.amount,
                    unit: d.unit,
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(Recipe {
        id,
        title,
        image: resp.image.filter(|i| !i.is_empty()),
        ready_in_minutes: resp.ready_in_minutes,
        servings: resp.servings,
        ingredients,
        instructions: resp.instructions.filter(|i| !i.trim().is_empty()),
        nutrients,
    })
}

pub fn parse_search_response(body: &str) -> Result<Vec<RecipeSummary>> {
    let hits: Vec<IngredientSearchHit> = serde_json::from_str(body)?;
    Ok(hits.into_iter().filter_map(hit_to_summary).collect())
}

pub fn parse_information_response(body: &str) -> Result<Recipe> {
    let resp: InformationResponse = serde_json::from_str(body)?;
    information_to_recipe(resp)
}
