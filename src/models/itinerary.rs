use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::place::Place;

/// Segment of a day a visit is scheduled in. `Day` orders before `Night`.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeOfDay {
    #[serde(rename = "day")]
    Day,
    #[serde(rename = "night")]
    Night,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryItem {
    pub id: Uuid,
    pub place: Place,
    pub day: u32,
    pub time_of_day: TimeOfDay,
    pub nights: u32,
}

impl ItineraryItem {
    pub fn new(place: Place, day: u32, time_of_day: TimeOfDay) -> Self {
        Self {
            id: Uuid::new_v4(),
            place,
            day,
            time_of_day,
            nights: 0,
        }
    }
}

/// A single field edit on an existing item.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ItineraryItemUpdate {
    Nights(u32),
    Day(u32),
    TimeOfDay(TimeOfDay),
}

/// All items scheduled on one day, day-segment items first.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDay {
    pub day: u32,
    pub items: Vec<ItineraryItem>,
}

/// Groups items by day ascending; inside a day `TimeOfDay::Day` sorts before
/// `TimeOfDay::Night` and insertion order is kept otherwise.
pub fn group_by_day(items: &[ItineraryItem]) -> Vec<ItineraryDay> {
    let mut sorted: Vec<&ItineraryItem> = items.iter().collect();
    sorted.sort_by_key(|item| (item.day, item.time_of_day));

    let mut days: Vec<ItineraryDay> = Vec::new();
    for item in sorted {
        match days.last_mut() {
            Some(group) if group.day == item.day => group.items.push(item.clone()),
            _ => days.push(ItineraryDay {
                day: item.day,
                items: vec![item.clone()],
            }),
        }
    }
    days
}
