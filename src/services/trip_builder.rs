//! Custom trip builder.
//!
//! Holds everything a traveller assembles on the custom package page: the
//! selected destinations, the day-indexed itinerary, the service choices and
//! the contact/trip details. Costs are never stored; `cost_breakdown` derives
//! them from the current state on every call.
//!
//! Page lifecycle:
//! `Building -> Validating -> Submitting -> {Succeeded | Failed}`.
//! `Failed` falls back to `Building` on the next edit or submission, with all
//! state intact. `Succeeded` is terminal.

use std::collections::BTreeSet;

use log::{info, warn};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::{ApiError, BackendError, BuilderError},
    models::{
        catalog::{Driver, HotelTier, TourGuide, Vehicle},
        inquiry::{
            ContactInfo, CostBreakdown, InquiryItineraryEntry, InquiryPayload, InquiryRecord,
            InquiryServices, ServiceRef, TripDetails,
        },
        itinerary::{group_by_day, ItineraryDay, ItineraryItem, ItineraryItemUpdate, TimeOfDay},
        place::Place,
    },
    services::{backend_client::InquirySink, pricing_service::PricingService},
};

const DEFAULT_DESTINATION_NIGHTS: u32 = 1;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BuilderPhase {
    Building,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SelectedDestination {
    pub place: Place,
    pub nights: u32,
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSelection {
    pub hotel_tier: Option<HotelTier>,
    pub vehicle: Option<Vehicle>,
    pub tour_guide: Option<TourGuide>,
    pub driver: Option<Driver>,
}

/// Where the traveller goes after a successful submission.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    RedirectToBookings {
        inquiry: InquiryRecord,
        redirect: String,
    },
    Confirmation {
        inquiry: InquiryRecord,
        message: String,
        redirect: String,
    },
}

impl SubmissionOutcome {
    pub fn for_viewer(authenticated: bool, inquiry: InquiryRecord) -> Self {
        if authenticated {
            SubmissionOutcome::RedirectToBookings {
                inquiry,
                redirect: "/bookings".to_string(),
            }
        } else {
            SubmissionOutcome::Confirmation {
                inquiry,
                message: "Thank you! Our team will contact you shortly about your custom trip."
                    .to_string(),
                redirect: "/".to_string(),
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct TripBuilder {
    destinations: Vec<SelectedDestination>,
    available_days: BTreeSet<u32>,
    active_day: Option<u32>,
    items: Vec<ItineraryItem>,
    services: ServiceSelection,
    trip: TripDetails,
    contact: ContactInfo,
    additional_requirements: String,
    candidates: Vec<Place>,
    phase: BuilderPhase,
    last_error: Option<String>,
}

impl Default for TripBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TripBuilder {
    pub fn new() -> Self {
        Self {
            destinations: Vec::new(),
            available_days: BTreeSet::from([1]),
            active_day: Some(1),
            items: Vec::new(),
            services: ServiceSelection::default(),
            trip: TripDetails::default(),
            contact: ContactInfo::default(),
            additional_requirements: String::new(),
            candidates: Vec::new(),
            phase: BuilderPhase::Building,
            last_error: None,
        }
    }

    pub fn phase(&self) -> BuilderPhase {
        self.phase
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn destinations(&self) -> &[SelectedDestination] {
        &self.destinations
    }

    pub fn is_selected(&self, place_id: &str) -> bool {
        self.destinations.iter().any(|d| d.place.id == place_id)
    }

    pub fn available_days(&self) -> &BTreeSet<u32> {
        &self.available_days
    }

    pub fn active_day(&self) -> Option<u32> {
        self.active_day
    }

    pub fn items(&self) -> &[ItineraryItem] {
        &self.items
    }

    pub fn itinerary_by_day(&self) -> Vec<ItineraryDay> {
        group_by_day(&self.items)
    }

    pub fn services(&self) -> &ServiceSelection {
        &self.services
    }

    pub fn trip(&self) -> &TripDetails {
        &self.trip
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn additional_requirements(&self) -> &str {
        &self.additional_requirements
    }

    pub fn candidates(&self) -> &[Place] {
        &self.candidates
    }

    // Edits are refused once submitted; a failed submission reopens the builder.
    fn ensure_editable(&mut self) -> Result<(), BuilderError> {
        match self.phase {
            BuilderPhase::Succeeded => Err(BuilderError::SessionClosed),
            BuilderPhase::Failed => {
                self.phase = BuilderPhase::Building;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Selects `place` if it is not selected yet, otherwise deselects it and
    /// drops its night count together with its scheduled visit. Returns
    /// whether the place is selected afterwards.
    pub fn toggle_destination(&mut self, place: Place) -> Result<bool, BuilderError> {
        self.ensure_editable()?;

        if let Some(index) = self.destinations.iter().position(|d| d.place.id == place.id) {
            self.destinations.remove(index);
            self.items.retain(|item| item.place.id != place.id);
            Ok(false)
        } else {
            self.destinations.push(SelectedDestination {
                place,
                nights: DEFAULT_DESTINATION_NIGHTS,
            });
            Ok(true)
        }
    }

    pub fn set_destination_nights(
        &mut self,
        place_id: &str,
        nights: u32,
    ) -> Result<(), BuilderError> {
        self.ensure_editable()?;
        let destination = self
            .destinations
            .iter_mut()
            .find(|d| d.place.id == place_id)
            .ok_or_else(|| BuilderError::UnknownDestination(place_id.to_string()))?;
        destination.nights = nights;
        Ok(())
    }

    /// Appends the next day number and makes it the active day.
    pub fn add_new_day(&mut self) -> Result<u32, BuilderError> {
        self.ensure_editable()?;
        let next = self.available_days.last().map_or(1, |max| max + 1);
        self.available_days.insert(next);
        self.active_day = Some(next);
        Ok(next)
    }

    /// Removes an empty day. Days that still hold itinerary items are refused.
    pub fn remove_day(&mut self, day: u32) -> Result<(), BuilderError> {
        self.ensure_editable()?;
        if !self.available_days.contains(&day) {
            return Err(BuilderError::UnknownDay(day));
        }
        if self.items.iter().any(|item| item.day == day) {
            warn!("Refusing to remove day {} with scheduled items", day);
            return Err(BuilderError::DayHasItems(day));
        }

        self.available_days.remove(&day);
        if self.active_day == Some(day) {
            self.active_day = self.available_days.last().copied();
        }
        Ok(())
    }

    pub fn set_active_day(&mut self, day: u32) -> Result<(), BuilderError> {
        self.ensure_editable()?;
        if !self.available_days.contains(&day) {
            return Err(BuilderError::UnknownDay(day));
        }
        self.active_day = Some(day);
        Ok(())
    }

    /// Schedules a selected `place` on `day`. A place may appear only once in
    /// the whole itinerary; a second placement is refused rather than replaced.
    pub fn add_itinerary_item(
        &mut self,
        place: Place,
        day: u32,
        time_of_day: TimeOfDay,
    ) -> Result<Uuid, BuilderError> {
        self.ensure_editable()?;
        if let Some(existing) = self.items.iter().find(|item| item.place.id == place.id) {
            warn!("Refusing duplicate placement of {}", place.id);
            return Err(BuilderError::DuplicatePlacement {
                place_name: existing.place.name.clone(),
                day: existing.day,
            });
        }
        if !self.is_selected(&place.id) {
            return Err(BuilderError::UnknownDestination(place.name));
        }
        if !self.available_days.contains(&day) {
            return Err(BuilderError::UnknownDay(day));
        }

        let item = ItineraryItem::new(place, day, time_of_day);
        let id = item.id;
        self.items.push(item);
        Ok(id)
    }

    pub fn remove_itinerary_item(&mut self, id: Uuid) -> Result<ItineraryItem, BuilderError> {
        self.ensure_editable()?;
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(BuilderError::UnknownItem(id))?;
        Ok(self.items.remove(index))
    }

    pub fn update_itinerary_item(
        &mut self,
        id: Uuid,
        update: ItineraryItemUpdate,
    ) -> Result<&ItineraryItem, BuilderError> {
        self.ensure_editable()?;
        if let ItineraryItemUpdate::Day(day) = update {
            if !self.available_days.contains(&day) {
                return Err(BuilderError::UnknownDay(day));
            }
        }

        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(BuilderError::UnknownItem(id))?;
        match update {
            ItineraryItemUpdate::Nights(nights) => item.nights = nights,
            ItineraryItemUpdate::Day(day) => item.day = day,
            ItineraryItemUpdate::TimeOfDay(time_of_day) => item.time_of_day = time_of_day,
        }
        Ok(item)
    }

    pub fn select_hotel_tier(&mut self, tier: Option<HotelTier>) -> Result<(), BuilderError> {
        self.ensure_editable()?;
        self.services.hotel_tier = tier;
        Ok(())
    }

    pub fn select_vehicle(&mut self, vehicle: Option<Vehicle>) -> Result<(), BuilderError> {
        self.ensure_editable()?;
        self.services.vehicle = vehicle;
        Ok(())
    }

    pub fn select_tour_guide(&mut self, guide: Option<TourGuide>) -> Result<(), BuilderError> {
        self.ensure_editable()?;
        self.services.tour_guide = guide;
        Ok(())
    }

    pub fn select_driver(&mut self, driver: Option<Driver>) -> Result<(), BuilderError> {
        self.ensure_editable()?;
        self.services.driver = driver;
        Ok(())
    }

    pub fn set_trip_details(&mut self, trip: TripDetails) -> Result<(), BuilderError> {
        self.ensure_editable()?;
        if trip.travellers == 0 {
            return Err(BuilderError::InvalidField {
                field: "travellers",
                reason: "at least one traveller is required".to_string(),
            });
        }
        if let (Some(start), Some(end)) = (trip.start_date, trip.end_date) {
            if end < start {
                return Err(BuilderError::InvalidField {
                    field: "endDate",
                    reason: "end date is before start date".to_string(),
                });
            }
        }
        self.trip = trip;
        Ok(())
    }

    pub fn set_contact(&mut self, contact: ContactInfo) -> Result<(), BuilderError> {
        self.ensure_editable()?;
        self.contact = contact;
        Ok(())
    }

    pub fn set_additional_requirements(&mut self, text: String) -> Result<(), BuilderError> {
        self.ensure_editable()?;
        self.additional_requirements = text;
        Ok(())
    }

    /// Replaces the candidate list shown next to the itinerary.
    pub fn set_candidates(&mut self, places: Vec<Place>) {
        self.candidates = places;
    }

    pub fn total_nights(&self) -> u32 {
        PricingService::calculate_total_nights(&self.items)
    }

    pub fn cost_breakdown(&self) -> CostBreakdown {
        PricingService::calculate_breakdown(
            &self.items,
            self.services.hotel_tier.as_ref(),
            self.services.vehicle.as_ref(),
            self.services.tour_guide.as_ref(),
            self.services.driver.as_ref(),
            self.trip.travellers,
        )
    }

    fn validate_for_submission(&self) -> Result<(), BuilderError> {
        if self.items.is_empty() {
            return Err(BuilderError::EmptyItinerary);
        }
        if self.trip.start_date.is_none() {
            return Err(BuilderError::MissingStartDate);
        }
        let contact_fields = [
            ("name", &self.contact.name),
            ("email", &self.contact.email),
            ("phone", &self.contact.phone),
        ];
        for (field, value) in contact_fields {
            if value.trim().is_empty() {
                return Err(BuilderError::MissingContactField(field));
            }
        }
        Ok(())
    }

    fn build_payload(&self) -> Result<InquiryPayload, BuilderError> {
        let start_date = self.trip.start_date.ok_or(BuilderError::MissingStartDate)?;
        let itinerary = self
            .itinerary_by_day()
            .iter()
            .flat_map(|day| day.items.iter())
            .enumerate()
            .map(|(order, item)| InquiryItineraryEntry::from_item(item, order))
            .collect();

        Ok(InquiryPayload {
            contact: ContactInfo {
                name: self.contact.name.trim().to_string(),
                email: self.contact.email.trim().to_string(),
                phone: self.contact.phone.trim().to_string(),
            },
            start_date,
            end_date: self.trip.end_date,
            travellers: self.trip.travellers,
            destinations: self.destinations.iter().map(|d| d.place.id.clone()).collect(),
            itinerary,
            services: InquiryServices {
                hotel_tier: self.services.hotel_tier.clone(),
                vehicle: self.services.vehicle.as_ref().map(|v| ServiceRef {
                    id: v.id.clone(),
                    name: v.name.clone(),
                    price_per_day: v.price_per_day,
                }),
                tour_guide: self.services.tour_guide.as_ref().map(|g| ServiceRef {
                    id: g.id.clone(),
                    name: g.name.clone(),
                    price_per_day: g.price_per_day,
                }),
                driver: self.services.driver.as_ref().map(|d| ServiceRef {
                    id: d.id.clone(),
                    name: d.name.clone(),
                    price_per_day: d.price_per_day,
                }),
            },
            cost_breakdown: self.cost_breakdown(),
            additional_requirements: self.additional_requirements.trim().to_string(),
        })
    }

    /// Validates the builder and moves it to `Submitting`, returning the
    /// payload to send. Nothing is mutated when validation fails.
    pub fn begin_submission(&mut self) -> Result<InquiryPayload, BuilderError> {
        match self.phase {
            BuilderPhase::Submitting => return Err(BuilderError::SubmissionInFlight),
            BuilderPhase::Succeeded => return Err(BuilderError::SessionClosed),
            _ => {}
        }

        let previous = self.phase;
        self.phase = BuilderPhase::Validating;
        let payload = self
            .validate_for_submission()
            .and_then(|_| self.build_payload());

        match payload {
            Ok(payload) => {
                self.phase = BuilderPhase::Submitting;
                Ok(payload)
            }
            Err(err) => {
                warn!("Inquiry validation refused: {}", err);
                self.phase = if previous == BuilderPhase::Failed {
                    BuilderPhase::Building
                } else {
                    previous
                };
                Err(err)
            }
        }
    }

    pub fn complete_submission(&mut self, inquiry: &InquiryRecord) {
        info!("Custom inquiry {} created", inquiry.id);
        self.phase = BuilderPhase::Succeeded;
        self.last_error = None;
    }

    /// Records a collaborator failure. Itinerary and selections are kept so
    /// the traveller can retry.
    pub fn fail_submission(&mut self, error: &BackendError) {
        self.phase = BuilderPhase::Failed;
        self.last_error = Some(error.to_string());
    }

    /// Releases a submission whose request was dropped before the backend
    /// answered, so the traveller can send it again.
    pub fn abandon_submission(&mut self) {
        if self.phase == BuilderPhase::Submitting {
            warn!("Inquiry submission cancelled before the backend answered");
            self.phase = BuilderPhase::Failed;
            self.last_error =
                Some("Submission was interrupted before it completed. Please retry".to_string());
        }
    }

    /// Validates, sends the inquiry exactly once and records the result.
    pub async fn submit_inquiry<S: InquirySink>(
        &mut self,
        sink: &S,
        bearer_token: Option<&str>,
    ) -> Result<SubmissionOutcome, ApiError> {
        let payload = self.begin_submission()?;
        let mut pending = PendingSubmission {
            builder: self,
            settled: false,
        };
        let result = sink.create_custom_inquiry(&payload, bearer_token).await;
        pending.settled = true;

        match result {
            Ok(inquiry) => {
                pending.builder.complete_submission(&inquiry);
                Ok(SubmissionOutcome::for_viewer(bearer_token.is_some(), inquiry))
            }
            Err(err) => {
                pending.builder.fail_submission(&err);
                Err(err.into())
            }
        }
    }
}

/// Holds a builder in `Submitting`. Dropped unsettled, it abandons the
/// submission.
struct PendingSubmission<'a> {
    builder: &'a mut TripBuilder,
    settled: bool,
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.builder.abandon_submission();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use chrono::NaiveDate;

    use super::*;
    use crate::models::catalog::find_hotel_tier;

    fn place(id: &str) -> Place {
        Place {
            id: id.to_string(),
            name: format!("Place {}", id),
            description: None,
            coordinates: None,
            images: None,
            featured: false,
        }
    }

    fn ready_builder() -> TripBuilder {
        let mut builder = TripBuilder::new();
        builder.toggle_destination(place("kandy")).unwrap();
        builder
            .add_itinerary_item(place("kandy"), 1, TimeOfDay::Day)
            .unwrap();
        builder
            .set_trip_details(TripDetails {
                start_date: NaiveDate::from_ymd_opt(2026, 12, 1),
                end_date: None,
                travellers: 2,
            })
            .unwrap();
        builder
            .set_contact(ContactInfo {
                name: "Ayesha".to_string(),
                email: "ayesha@example.com".to_string(),
                phone: "+94 77 000 0000".to_string(),
            })
            .unwrap();
        builder
    }

    fn schedule(builder: &mut TripBuilder, id: &str, day: u32, time: TimeOfDay) -> Uuid {
        if !builder.is_selected(id) {
            builder.toggle_destination(place(id)).unwrap();
        }
        builder.add_itinerary_item(place(id), day, time).unwrap()
    }

    struct FakeSink {
        calls: Cell<usize>,
        fail: bool,
    }

    impl FakeSink {
        fn new(fail: bool) -> Self {
            Self {
                calls: Cell::new(0),
                fail,
            }
        }
    }

    impl InquirySink for FakeSink {
        async fn create_custom_inquiry(
            &self,
            _payload: &InquiryPayload,
            _bearer_token: Option<&str>,
        ) -> Result<InquiryRecord, BackendError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                Err(BackendError::Status {
                    status: 500,
                    message: "boom".to_string(),
                })
            } else {
                Ok(InquiryRecord {
                    id: "inq-1".to_string(),
                    status: Some("pending".to_string()),
                    created_at: None,
                })
            }
        }
    }

    #[test]
    fn test_toggle_parity() {
        let mut builder = TripBuilder::new();
        for toggles in 1..=6 {
            let mut b = builder.clone();
            for _ in 0..toggles {
                b.toggle_destination(place("ella")).unwrap();
            }
            assert_eq!(b.is_selected("ella"), toggles % 2 == 1);
        }
        builder.toggle_destination(place("ella")).unwrap();
        assert_eq!(builder.destinations()[0].nights, 1);
    }

    #[test]
    fn test_toggle_off_drops_night_count() {
        let mut builder = TripBuilder::new();
        builder.toggle_destination(place("ella")).unwrap();
        builder.set_destination_nights("ella", 4).unwrap();
        builder.toggle_destination(place("ella")).unwrap();
        builder.toggle_destination(place("ella")).unwrap();
        assert_eq!(builder.destinations()[0].nights, 1);
        assert_eq!(
            builder.set_destination_nights("galle", 2),
            Err(BuilderError::UnknownDestination("galle".to_string()))
        );
    }

    #[test]
    fn test_add_new_day_appends_and_activates() {
        let mut builder = TripBuilder::new();
        assert_eq!(builder.add_new_day().unwrap(), 2);
        assert_eq!(builder.add_new_day().unwrap(), 3);
        assert_eq!(builder.active_day(), Some(3));
        assert_eq!(
            builder.available_days().iter().copied().collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_remove_day_with_items_is_refused() {
        let mut builder = TripBuilder::new();
        builder.add_new_day().unwrap();
        schedule(&mut builder, "galle", 2, TimeOfDay::Night);
        let before = builder.items().to_vec();

        assert_eq!(builder.remove_day(2), Err(BuilderError::DayHasItems(2)));
        assert!(builder.available_days().contains(&2));
        assert_eq!(builder.items(), before.as_slice());
    }

    #[test]
    fn test_remove_active_day_reactivates_max_remaining() {
        let mut builder = TripBuilder::new();
        builder.add_new_day().unwrap();
        builder.add_new_day().unwrap();
        builder.set_active_day(2).unwrap();

        builder.remove_day(2).unwrap();
        assert_eq!(builder.active_day(), Some(3));

        builder.remove_day(3).unwrap();
        builder.remove_day(1).unwrap();
        assert_eq!(builder.active_day(), None);
        assert!(builder.available_days().is_empty());

        assert_eq!(builder.add_new_day().unwrap(), 1);
    }

    #[test]
    fn test_place_scheduled_only_once() {
        let mut builder = TripBuilder::new();
        builder.add_new_day().unwrap();
        schedule(&mut builder, "sigiriya", 1, TimeOfDay::Day);

        let err = builder
            .add_itinerary_item(place("sigiriya"), 2, TimeOfDay::Night)
            .unwrap_err();
        assert_eq!(
            err,
            BuilderError::DuplicatePlacement {
                place_name: "Place sigiriya".to_string(),
                day: 1
            }
        );
        assert_eq!(builder.items().len(), 1);
    }

    #[test]
    fn test_item_on_unknown_day_is_refused() {
        let mut builder = TripBuilder::new();
        builder.toggle_destination(place("a")).unwrap();
        assert_eq!(
            builder.add_itinerary_item(place("a"), 5, TimeOfDay::Day),
            Err(BuilderError::UnknownDay(5))
        );
    }

    #[test]
    fn test_total_nights_tracks_item_edits() {
        let mut builder = TripBuilder::new();
        let a = schedule(&mut builder, "a", 1, TimeOfDay::Day);
        let b = schedule(&mut builder, "b", 1, TimeOfDay::Night);
        assert_eq!(builder.total_nights(), 0);

        builder
            .update_itinerary_item(a, ItineraryItemUpdate::Nights(2))
            .unwrap();
        builder
            .update_itinerary_item(b, ItineraryItemUpdate::Nights(3))
            .unwrap();
        assert_eq!(builder.total_nights(), 5);

        builder.remove_itinerary_item(a).unwrap();
        assert_eq!(builder.total_nights(), 3);
        assert_eq!(
            builder.remove_itinerary_item(a),
            Err(BuilderError::UnknownItem(a))
        );
    }

    #[test]
    fn test_cost_breakdown_follows_selection() {
        let mut builder = TripBuilder::new();
        let id = schedule(&mut builder, "a", 1, TimeOfDay::Day);
        builder
            .select_vehicle(Some(Vehicle {
                id: "v1".to_string(),
                name: "Van".to_string(),
                vehicle_type: None,
                capacity: None,
                price_per_day: 80.0,
            }))
            .unwrap();
        assert_eq!(builder.cost_breakdown().transport_cost, 80.0);

        builder
            .update_itinerary_item(id, ItineraryItemUpdate::Nights(5))
            .unwrap();
        builder
            .select_hotel_tier(find_hotel_tier("standard"))
            .unwrap();
        builder
            .set_trip_details(TripDetails {
                travellers: 2,
                ..TripDetails::default()
            })
            .unwrap();

        let costs = builder.cost_breakdown();
        assert_eq!(costs.hotel_cost, 850.0);
        assert_eq!(costs.transport_cost, 400.0);
        assert_eq!(costs.taxes, 125.0);
        assert_eq!(costs.total_cost, 1375.0);
    }

    #[test]
    fn test_validation_order() {
        let mut builder = TripBuilder::new();
        assert_eq!(builder.begin_submission(), Err(BuilderError::EmptyItinerary));

        schedule(&mut builder, "a", 1, TimeOfDay::Day);
        assert_eq!(builder.begin_submission(), Err(BuilderError::MissingStartDate));

        builder
            .set_trip_details(TripDetails {
                start_date: NaiveDate::from_ymd_opt(2026, 12, 1),
                ..TripDetails::default()
            })
            .unwrap();
        assert_eq!(
            builder.begin_submission(),
            Err(BuilderError::MissingContactField("name"))
        );
        assert_eq!(builder.phase(), BuilderPhase::Building);
    }

    #[tokio::test]
    async fn test_empty_itinerary_never_reaches_backend() {
        let sink = FakeSink::new(false);
        let mut builder = TripBuilder::new();
        let result = builder.submit_inquiry(&sink, None).await;
        assert!(matches!(
            result,
            Err(ApiError::Builder(BuilderError::EmptyItinerary))
        ));
        assert_eq!(sink.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_failed_submission_keeps_state() {
        let sink = FakeSink::new(true);
        let mut builder = ready_builder();
        builder
            .select_driver(Some(Driver {
                id: "d1".to_string(),
                name: "Kamal".to_string(),
                license_number: None,
                price_per_day: 30.0,
            }))
            .unwrap();
        let items = builder.items().to_vec();
        let destinations = builder.destinations().to_vec();
        let services = builder.services().clone();

        let result = builder.submit_inquiry(&sink, None).await;
        assert!(matches!(result, Err(ApiError::Backend(_))));
        assert_eq!(sink.calls.get(), 1);
        assert_eq!(builder.phase(), BuilderPhase::Failed);
        assert!(builder.last_error().is_some());
        assert_eq!(builder.items(), items.as_slice());
        assert_eq!(builder.destinations(), destinations.as_slice());
        assert_eq!(builder.services(), &services);

        builder.add_new_day().unwrap();
        assert_eq!(builder.phase(), BuilderPhase::Building);
    }

    #[tokio::test]
    async fn test_successful_submission_outcomes() {
        let sink = FakeSink::new(false);

        let mut anonymous = ready_builder();
        let outcome = anonymous.submit_inquiry(&sink, None).await.unwrap();
        assert!(matches!(
            outcome,
            SubmissionOutcome::Confirmation { ref redirect, .. } if redirect == "/"
        ));
        assert_eq!(anonymous.phase(), BuilderPhase::Succeeded);
        assert_eq!(
            anonymous.add_new_day(),
            Err(BuilderError::SessionClosed)
        );

        let mut signed_in = ready_builder();
        let outcome = signed_in.submit_inquiry(&sink, Some("token")).await.unwrap();
        assert!(matches!(outcome, SubmissionOutcome::RedirectToBookings { .. }));
        assert_eq!(sink.calls.get(), 2);
    }

    #[test]
    fn test_second_submission_while_in_flight_is_refused() {
        let mut builder = ready_builder();
        let payload = builder.begin_submission().unwrap();
        assert_eq!(payload.itinerary.len(), 1);
        assert_eq!(payload.itinerary[0].place_id, "kandy");
        assert_eq!(payload.destinations, vec!["kandy".to_string()]);

        assert_eq!(
            builder.begin_submission(),
            Err(BuilderError::SubmissionInFlight)
        );
        // edits stay allowed while the request is pending
        builder.toggle_destination(place("ella")).unwrap();
        assert_eq!(builder.phase(), BuilderPhase::Submitting);
    }

    #[test]
    fn test_unselected_place_cannot_be_scheduled() {
        let mut builder = TripBuilder::new();
        assert_eq!(
            builder.add_itinerary_item(place("ella"), 1, TimeOfDay::Day),
            Err(BuilderError::UnknownDestination("Place ella".to_string()))
        );
        assert!(builder.items().is_empty());
    }

    #[test]
    fn test_deselecting_place_unschedules_it() {
        let mut builder = TripBuilder::new();
        schedule(&mut builder, "ella", 1, TimeOfDay::Day);
        schedule(&mut builder, "galle", 1, TimeOfDay::Night);

        assert!(!builder.toggle_destination(place("ella")).unwrap());
        assert_eq!(builder.items().len(), 1);
        assert_eq!(builder.items()[0].place.id, "galle");
        assert!(!builder.is_selected("ella"));
    }

    struct StalledSink;

    impl InquirySink for StalledSink {
        async fn create_custom_inquiry(
            &self,
            _payload: &InquiryPayload,
            _bearer_token: Option<&str>,
        ) -> Result<InquiryRecord, BackendError> {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            Err(BackendError::Status {
                status: 504,
                message: "timed out".to_string(),
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_submission_can_be_retried() {
        let mut builder = ready_builder();

        let cancelled = tokio::time::timeout(
            std::time::Duration::from_millis(10),
            builder.submit_inquiry(&StalledSink, None),
        )
        .await;
        assert!(cancelled.is_err());
        assert_eq!(builder.phase(), BuilderPhase::Failed);
        assert!(builder.last_error().is_some());

        let sink = FakeSink::new(false);
        let outcome = builder.submit_inquiry(&sink, None).await.unwrap();
        assert!(matches!(outcome, SubmissionOutcome::Confirmation { .. }));
        assert_eq!(builder.phase(), BuilderPhase::Succeeded);
        assert_eq!(sink.calls.get(), 1);
    }
}
