use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{
    catalog::HotelTier,
    itinerary::{ItineraryItem, TimeOfDay},
};

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripDetails {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub travellers: u32,
}

impl Default for TripDetails {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            travellers: 1,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub total_nights: u32,
    pub hotel_cost: f64,
    pub transport_cost: f64,
    pub guide_cost: f64,
    pub driver_cost: f64,
    pub taxes: f64,
    pub total_cost: f64,
}

/// One scheduled visit as sent to the backend.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InquiryItineraryEntry {
    pub place_id: String,
    pub place_name: String,
    pub day: u32,
    pub time_of_day: TimeOfDay,
    pub nights: u32,
    pub order: usize,
}

impl InquiryItineraryEntry {
    pub fn from_item(item: &ItineraryItem, order: usize) -> Self {
        Self {
            place_id: item.place.id.clone(),
            place_name: item.place.name.clone(),
            day: item.day,
            time_of_day: item.time_of_day,
            nights: item.nights,
            order,
        }
    }
}

/// Reference to a selected daily-rate service as sent to the backend.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRef {
    pub id: String,
    pub name: String,
    pub price_per_day: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InquiryServices {
    pub hotel_tier: Option<HotelTier>,
    pub vehicle: Option<ServiceRef>,
    pub tour_guide: Option<ServiceRef>,
    pub driver: Option<ServiceRef>,
}

/// Body of `POST custom-inquiries`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InquiryPayload {
    pub contact: ContactInfo,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub travellers: u32,
    pub destinations: Vec<String>,
    pub itinerary: Vec<InquiryItineraryEntry>,
    pub services: InquiryServices,
    pub cost_breakdown: CostBreakdown,
    pub additional_requirements: String,
}

/// The record the backend returns after creating an inquiry.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InquiryRecord {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
