//! Movie lookup against OMDb.
//!
//! OMDb is a third-party service: requests carry the API key as a query
//! parameter, never the backend bearer token, and failures here never touch
//! the session.

use anyhow::{Context, Result};
use reqwest::Client;

use crate::api::{translate, ApiError, Failure};
use crate::config::{ApiConfig, OmdbConfig};
use crate::models::{Movie, MovieSearchResponse};

/// Queries shorter than this are not sent
pub const MIN_QUERY_LEN: usize = 3;

#[derive(Clone)]
pub struct MovieService {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    placeholder: String,
}

impl MovieService {
    pub fn new(omdb: &OmdbConfig, api: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(api.timeout())
            .user_agent(concat!("cultbrawl/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create OMDb client")?;

        Ok(Self {
            http,
            base_url: omdb.base_url.clone(),
            api_key: omdb.api_key.clone().filter(|key| !key.trim().is_empty()),
            placeholder: omdb.placeholder_poster.clone(),
        })
    }

    /// Poster used for titles without one
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Search titles by name. Short queries and "not found" both yield an
    /// empty list.
    pub async fn search(&self, query: &str) -> Result<Vec<Movie>, ApiError> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Ok(Vec::new());
        }

        let Some(api_key) = self.api_key.as_deref() else {
            return Err(ApiError::validation(
                "Movie search needs an OMDb API key (set OMDB_API_KEY).",
            ));
        };

        let request = self
            .http
            .get(&self.base_url)
            .query(&[("apikey", api_key), ("s", query)]);

        let response = request.send().await.map_err(|e| {
            tracing::debug!(error = %e, "OMDb transport error");
            translate(&Failure::from_transport(&e))
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|_| translate(&Failure::NoResponse))?;

        if !status.is_success() {
            return Err(translate(&Failure::Status {
                status,
                body: body.to_vec(),
            }));
        }

        let results: MovieSearchResponse = serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse OMDb response");
            ApiError::invalid_response("OMDb sent a response that could not be read.")
        })?;

        if let Some(error) = &results.error {
            tracing::debug!(%query, %error, "OMDb returned no results");
        }
        Ok(results.search)
    }
}
