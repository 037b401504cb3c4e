pub mod catalog;
pub mod inquiry;
pub mod itinerary;
pub mod place;
