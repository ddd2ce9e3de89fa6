use anyhow::{Context, Result};
use tracing::debug;

use larder_core::LarderError;
use larder_core::models::{Recipe, RecipeSummary, SearchQuery};
use larder_core::service::RecipeProvider;
use larder_core::spoonacular::{parse_information_response, parse_search_response};

pub struct SpoonacularClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    rt: tokio::runtime::Handle,
}

impl SpoonacularClient {
    pub fn new(base_url: &str, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!(
                "larder-cli/{} (recipe planner)",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(std::time::Duration::from_secs(15))
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .context("Failed to build HTTP client")?;
        let rt = tokio::runtime::Handle::try_current()
            .context("Recipe client must be created inside the tokio runtime")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            rt,
        })
    }

    pub async fn search_async(&self, query: &SearchQuery) -> larder_core::Result<Vec<RecipeSummary>> {
        let mut params = vec![
            ("ingredients", query.ingredients.clone()),
            ("number", query.number.to_string()),
            ("ranking", "2".to_string()),
            ("ignorePantry", "true".to_string()),
        ];
        if let Some(diet) = query.diet {
            params.push(("diet", diet.query_value().to_string()));
        }
        if let Some(minutes) = query.max_ready_time {
            params.push(("maxReadyTime", minutes.to_string()));
        }

        let body = self.get_text("findByIngredients", &params).await?;
        parse_search_response(&body)
    }

    pub async fn recipe_information_async(&self, recipe_id: i64) -> larder_core::Result<Recipe> {
        let path = format!("{recipe_id}/information");
        let params = [("includeNutrition", "true".to_string())];
        let body = self.get_text(&path, &params).await?;
        parse_information_response(&body)
    }

    async fn get_text(&self, path: &str, params: &[(&str, String)]) -> larder_core::Result<String> {
        let url = format!("{}/{path}", self.base_url);
        debug!(path, "recipe API request");

        let resp = self
            .client
            .get(&url)
            .query(params)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await
            // The request URL carries the API key.
            .map_err(|e| {
                LarderError::fetch(format!("Failed to reach recipe API: {}", e.without_url()))
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LarderError::fetch(format!(
                "Recipe API returned {status} for /{path}"
            )));
        }

        resp.text().await.map_err(|e| {
            LarderError::fetch(format!(
                "Failed to read recipe API response: {}",
                e.without_url()
            ))
        })
    }
}

impl RecipeProvider for SpoonacularClient {
    fn search(&self, query: &SearchQuery) -> larder_core::Result<Vec<RecipeSummary>> {
        tokio::task::block_in_place(|| self.rt.block_on(self.search_async(query)))
    }

    fn recipe_information(&self, recipe_id: i64) -> larder_core::Result<Recipe> {
        tokio::task::block_in_place(|| self.rt.block_on(self.recipe_information_async(recipe_id)))
    }
}
