use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// A destination or attraction that can be scheduled on the itinerary.
/// Owned by the backend, read-only here.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub featured: bool,
}

/// Query accepted by the places collaborator. `featured` and `search` are
/// mutually exclusive there; search wins when both are set.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PlaceQuery {
    #[default]
    All,
    Featured,
    Search(String),
}

impl PlaceQuery {
    pub fn from_params(featured: Option<bool>, search: Option<&str>) -> Self {
        match search.map(str::trim) {
            Some(text) if !text.is_empty() => PlaceQuery::Search(text.to_string()),
            _ if featured.unwrap_or(false) => PlaceQuery::Featured,
            _ => PlaceQuery::All,
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            PlaceQuery::All => Vec::new(),
            PlaceQuery::Featured => vec![("featured", "true".to_string())],
            PlaceQuery::Search(text) => vec![("search", text.clone())],
        }
    }
}
