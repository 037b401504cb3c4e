use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::viewer::Viewer,
    models::{
        catalog::find_hotel_tier,
        inquiry::{ContactInfo, CostBreakdown, TripDetails},
        itinerary::{ItineraryDay, ItineraryItemUpdate, TimeOfDay},
        place::{Place, PlaceQuery},
    },
    services::{
        backend_client::{CatalogSource, InquirySink},
        search_service::SearchResult,
        trip_builder::{
            BuilderPhase, SelectedDestination, ServiceSelection, SubmissionOutcome, TripBuilder,
        },
    },
    sessions::BuilderSession,
    store::{load_if_empty, track_load, InquiryAction},
    AppState,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    id: Uuid,
    phase: BuilderPhase,
    last_error: Option<String>,
    destinations: Vec<SelectedDestination>,
    available_days: Vec<u32>,
    active_day: Option<u32>,
    itinerary: Vec<ItineraryDay>,
    services: ServiceSelection,
    trip: TripDetails,
    contact: ContactInfo,
    additional_requirements: String,
    candidates: Vec<Place>,
    costs: CostBreakdown,
}

impl SessionSnapshot {
    fn new(id: Uuid, builder: &TripBuilder) -> Self {
        Self {
            id,
            phase: builder.phase(),
            last_error: builder.last_error().map(str::to_string),
            destinations: builder.destinations().to_vec(),
            available_days: builder.available_days().iter().copied().collect(),
            active_day: builder.active_day(),
            itinerary: builder.itinerary_by_day(),
            services: builder.services().clone(),
            trip: builder.trip().clone(),
            contact: builder.contact().clone(),
            additional_requirements: builder.additional_requirements().to_string(),
            candidates: builder.candidates().to_vec(),
            costs: builder.cost_breakdown(),
        }
    }
}

#[derive(Deserialize)]
pub struct NightsInput {
    nights: u32,
}

#[derive(Deserialize)]
pub struct ActiveDayInput {
    day: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItemInput {
    place: Place,
    day: u32,
    time_of_day: TimeOfDay,
}

/// Each field replaces the current choice; a missing field clears it.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServicesInput {
    hotel_tier: Option<String>,
    vehicle_id: Option<String>,
    tour_guide_id: Option<String>,
    driver_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripInput {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    #[serde(default = "default_travellers")]
    travellers: u32,
    #[serde(default)]
    contact: ContactInfo,
    #[serde(default)]
    additional_requirements: String,
}

fn default_travellers() -> u32 {
    1
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

fn find_session(state: &AppState, id: &Uuid) -> Result<Arc<BuilderSession>, ApiError> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| ApiError::NotFound(format!("Session {}", id)))
}

fn snapshot(session: &BuilderSession) -> SessionSnapshot {
    SessionSnapshot::new(session.id, &session.builder())
}

/*
    POST /api/custom-package/sessions
*/
pub async fn create_session(state: web::Data<AppState>) -> HttpResponse {
    let session = state.sessions.create();
    let featured = featured_places(&state).await;
    session.builder().set_candidates(featured);

    info!("Builder session {} created", session.id);
    HttpResponse::Created().json(snapshot(&session))
}

// The search box starts from the featured places; a failed load leaves it empty.
async fn featured_places(state: &AppState) -> Vec<Place> {
    let cached: Vec<Place> = state
        .stores
        .places
        .read(|s| s.items.iter().filter(|p| p.featured).cloned().collect());
    if !cached.is_empty() {
        return cached;
    }

    let fetch = state.backend.get_places(&PlaceQuery::Featured);
    match track_load(&state.stores.places, fetch).await {
        Ok(places) => places,
        Err(err) => {
            warn!("Starting builder session without featured places: {}", err);
            Vec::new()
        }
    }
}

/*
    GET /api/custom-package/sessions/{id}
*/
pub async fn get_session(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let session = find_session(&state, &path)?;
    Ok(HttpResponse::Ok().json(snapshot(&session)))
}

/*
    DELETE /api/custom-package/sessions/{id}
*/
pub async fn delete_session(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    if state.sessions.remove(&path) {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(ApiError::NotFound(format!("Session {}", path.into_inner())))
    }
}

/*
    POST /api/custom-package/sessions/{id}/destinations
*/
pub async fn toggle_destination(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<Place>,
) -> Result<HttpResponse, ApiError> {
    let session = find_session(&state, &path)?;
    session.builder().toggle_destination(input.into_inner())?;
    Ok(HttpResponse::Ok().json(snapshot(&session)))
}

/*
    PUT /api/custom-package/sessions/{id}/destinations/{place_id}/nights
*/
pub async fn set_destination_nights(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, String)>,
    input: web::Json<NightsInput>,
) -> Result<HttpResponse, ApiError> {
    let (id, place_id) = path.into_inner();
    let session = find_session(&state, &id)?;
    session
        .builder()
        .set_destination_nights(&place_id, input.nights)?;
    Ok(HttpResponse::Ok().json(snapshot(&session)))
}

/*
    POST /api/custom-package/sessions/{id}/days
*/
pub async fn add_day(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let session = find_session(&state, &path)?;
    session.builder().add_new_day()?;
    Ok(HttpResponse::Created().json(snapshot(&session)))
}

/*
    DELETE /api/custom-package/sessions/{id}/days/{day}
*/
pub async fn remove_day(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, u32)>,
) -> Result<HttpResponse, ApiError> {
    let (id, day) = path.into_inner();
    let session = find_session(&state, &id)?;
    session.builder().remove_day(day)?;
    Ok(HttpResponse::Ok().json(snapshot(&session)))
}

/*
    PUT /api/custom-package/sessions/{id}/active-day
*/
pub async fn set_active_day(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<ActiveDayInput>,
) -> Result<HttpResponse, ApiError> {
    let session = find_session(&state, &path)?;
    session.builder().set_active_day(input.day)?;
    Ok(HttpResponse::Ok().json(snapshot(&session)))
}

/*
    POST /api/custom-package/sessions/{id}/items
*/
pub async fn add_item(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<NewItemInput>,
) -> Result<HttpResponse, ApiError> {
    let session = find_session(&state, &path)?;
    let NewItemInput {
        place,
        day,
        time_of_day,
    } = input.into_inner();
    session
        .builder()
        .add_itinerary_item(place, day, time_of_day)?;
    Ok(HttpResponse::Created().json(snapshot(&session)))
}

/*
    DELETE /api/custom-package/sessions/{id}/items/{item_id}
*/
pub async fn remove_item(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, ApiError> {
    let (id, item_id) = path.into_inner();
    let session = find_session(&state, &id)?;
    session.builder().remove_itinerary_item(item_id)?;
    Ok(HttpResponse::Ok().json(snapshot(&session)))
}

/*
    PATCH /api/custom-package/sessions/{id}/items/{item_id}
*/
pub async fn update_item(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
    input: web::Json<ItineraryItemUpdate>,
) -> Result<HttpResponse, ApiError> {
    let (id, item_id) = path.into_inner();
    let session = find_session(&state, &id)?;
    session
        .builder()
        .update_itinerary_item(item_id, input.into_inner())?;
    Ok(HttpResponse::Ok().json(snapshot(&session)))
}

/*
    PUT /api/custom-package/sessions/{id}/services
*/
pub async fn set_services(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<ServicesInput>,
) -> Result<HttpResponse, ApiError> {
    let session = find_session(&state, &path)?;
    let input = input.into_inner();
    let stores = &state.stores;
    let backend = &state.backend;

    // resolve everything before touching the builder; catalogs load on first use
    let hotel_tier = match input.hotel_tier {
        Some(id) => Some(
            find_hotel_tier(&id).ok_or_else(|| ApiError::NotFound(format!("Hotel tier {}", id)))?,
        ),
        None => None,
    };
    let vehicle = match input.vehicle_id {
        Some(id) => {
            let vehicles = load_if_empty(&stores.vehicles, || backend.get_vehicles()).await?;
            let found = vehicles.into_iter().find(|v| v.id == id);
            Some(found.ok_or_else(|| ApiError::NotFound(format!("Vehicle {}", id)))?)
        }
        None => None,
    };
    let tour_guide = match input.tour_guide_id {
        Some(id) => {
            let guides = load_if_empty(&stores.tour_guides, || backend.get_tour_guides()).await?;
            let found = guides.into_iter().find(|g| g.id == id);
            Some(found.ok_or_else(|| ApiError::NotFound(format!("Tour guide {}", id)))?)
        }
        None => None,
    };
    let driver = match input.driver_id {
        Some(id) => {
            let drivers = load_if_empty(&stores.drivers, || backend.get_drivers()).await?;
            let found = drivers.into_iter().find(|d| d.id == id);
            Some(found.ok_or_else(|| ApiError::NotFound(format!("Driver {}", id)))?)
        }
        None => None,
    };

    {
        let mut builder = session.builder();
        builder.select_hotel_tier(hotel_tier)?;
        builder.select_vehicle(vehicle)?;
        builder.select_tour_guide(tour_guide)?;
        builder.select_driver(driver)?;
    }
    Ok(HttpResponse::Ok().json(snapshot(&session)))
}

/*
    PUT /api/custom-package/sessions/{id}/trip
*/
pub async fn set_trip(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<TripInput>,
) -> Result<HttpResponse, ApiError> {
    let session = find_session(&state, &path)?;
    let input = input.into_inner();

    {
        let mut builder = session.builder();
        builder.set_trip_details(TripDetails {
            start_date: input.start_date,
            end_date: input.end_date,
            travellers: input.travellers,
        })?;
        builder.set_contact(input.contact)?;
        builder.set_additional_requirements(input.additional_requirements)?;
    }
    Ok(HttpResponse::Ok().json(snapshot(&session)))
}

/*
    GET /api/custom-package/sessions/{id}/costs
*/
pub async fn get_costs(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let session = find_session(&state, &path)?;
    let costs = session.builder().cost_breakdown();
    Ok(HttpResponse::Ok().json(costs))
}

/*
    GET /api/custom-package/sessions/{id}/search?q=
*/
pub async fn search_places(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    params: web::Query<SearchParams>,
) -> Result<HttpResponse, ApiError> {
    let session = find_session(&state, &path)?;
    match session.search.search(&state.backend, &params.q).await? {
        SearchResult::Results(places) => {
            session.builder().set_candidates(places.clone());
            Ok(HttpResponse::Ok().json(json!({ "superseded": false, "places": places })))
        }
        SearchResult::Superseded => Ok(HttpResponse::Ok().json(json!({ "superseded": true }))),
    }
}

/*
    POST /api/custom-package/sessions/{id}/submit
*/
pub async fn submit_inquiry(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    viewer: Viewer,
) -> Result<HttpResponse, ApiError> {
    let session = find_session(&state, &path)?;
    // the builder lock is released before the request goes out; dropping
    // `pending` without settling it reopens the builder
    let (payload, pending) = session.begin_submission()?;
    info!(
        "Submitting custom inquiry for session {} ({} items)",
        session.id,
        payload.itinerary.len()
    );

    match state
        .backend
        .create_custom_inquiry(&payload, viewer.bearer_token())
        .await
    {
        Ok(inquiry) => {
            pending.complete(&inquiry);
            state
                .stores
                .custom_inquiries
                .dispatch(InquiryAction::Created(inquiry.clone()));
            state.sessions.remove(&session.id);
            Ok(HttpResponse::Created().json(SubmissionOutcome::for_viewer(
                viewer.is_authenticated(),
                inquiry,
            )))
        }
        Err(err) => {
            error!("Custom inquiry submission failed: {}", err);
            pending.fail(&err);
            state
                .stores
                .custom_inquiries
                .dispatch(InquiryAction::Failed(err.to_string()));
            Err(err.into())
        }
    }
}
