//! OMDb search results.

use serde::Deserialize;

use super::NewEntity;

const NO_POSTER: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Movie {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
}

impl Movie {
    /// Entity payload for adding this movie to the catalogue.
    pub fn to_new_entity(&self, placeholder_poster: &str) -> NewEntity {
        let image_url = if self.poster.is_empty() || self.poster == NO_POSTER {
            placeholder_poster.to_string()
        } else {
            self.poster.clone()
        };

        NewEntity {
            name: format!("{} ({})", self.title, self.year),
            api_id: self.imdb_id.clone(),
            kind: "movie".to_string(),
            image_url,
            source: "OMDB".to_string(),
        }
    }
}

/// OMDb wraps results in `{Search: [...]}`, or answers `{Response: "False", Error}`.
#[derive(Debug, Default, Deserialize)]
pub struct MovieSearchResponse {
    #[serde(rename = "Search", default)]
    pub search: Vec<Movie>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_to_entity_uses_placeholder_when_no_poster() {
        let movie = Movie {
            imdb_id: "tt0078748".to_string(),
            title: "Alien".to_string(),
            year: "1979".to_string(),
            poster: "N/A".to_string(),
        };

        let entity = movie.to_new_entity("https://placehold.jp/100x150.png");
        assert_eq!(entity.name, "Alien (1979)");
        assert_eq!(entity.api_id, "tt0078748");
        assert_eq!(entity.kind, "movie");
        assert_eq!(entity.source, "OMDB");
        assert_eq!(entity.image_url, "https://placehold.jp/100x150.png");

        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["type"], "movie");
        assert_eq!(json["apiId"], "tt0078748");
    }

    #[test]
    fn test_search_response_not_found() {
        let resp: MovieSearchResponse =
            serde_json::from_str(r#"{"Response":"False","Error":"Movie not found!"}"#).unwrap();
        assert!(resp.search.is_empty());
        assert_eq!(resp.error.as_deref(), Some("Movie not found!"));
    }
}
