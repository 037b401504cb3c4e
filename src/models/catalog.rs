use serde::{Deserialize, Serialize};

/// Anything that can be looked up by id inside a loaded catalog.
pub trait CatalogEntry {
    fn id(&self) -> &str;
}

/// A service billed once per trip day.
pub trait DailyRate {
    fn price_per_day(&self) -> f64;
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HotelTier {
    pub id: String,
    pub name: String,
    pub price_per_night: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    pub price_per_day: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TourGuide {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub languages: Vec<String>,
    pub price_per_day: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    pub price_per_day: f64,
}

macro_rules! catalog_entry {
    ($($ty:ty),*) => {
        $(impl CatalogEntry for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })*
    };
}

catalog_entry!(HotelTier, Vehicle, TourGuide, Driver, super::place::Place);

impl DailyRate for Vehicle {
    fn price_per_day(&self) -> f64 {
        self.price_per_day
    }
}

impl DailyRate for TourGuide {
    fn price_per_day(&self) -> f64 {
        self.price_per_day
    }
}

impl DailyRate for Driver {
    fn price_per_day(&self) -> f64 {
        self.price_per_day
    }
}

/// Hotel tiers are not served by the backend; the site ships a fixed set.
pub fn hotel_tiers() -> Vec<HotelTier> {
    [
        ("budget", "Budget", 45.0),
        ("standard", "Standard", 85.0),
        ("premium", "Premium", 150.0),
        ("luxury", "Luxury", 250.0),
    ]
    .into_iter()
    .map(|(id, name, price_per_night)| HotelTier {
        id: id.to_string(),
        name: name.to_string(),
        price_per_night,
    })
    .collect()
}

pub fn find_hotel_tier(id: &str) -> Option<HotelTier> {
    hotel_tiers().into_iter().find(|tier| tier.id == id)
}
