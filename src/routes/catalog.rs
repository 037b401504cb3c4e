use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use crate::{
    error::ApiError,
    models::{catalog::hotel_tiers, place::PlaceQuery},
    services::backend_client::CatalogSource,
    store::track_load,
    AppState,
};

#[derive(Deserialize)]
pub struct PlaceParams {
    featured: Option<bool>,
    search: Option<String>,
}

/*
    /api/places?featured=true | ?search=<text>
*/
pub async fn get_places(
    state: web::Data<AppState>,
    params: web::Query<PlaceParams>,
) -> Result<HttpResponse, ApiError> {
    let query = PlaceQuery::from_params(params.featured, params.search.as_deref());
    let places = track_load(&state.stores.places, state.backend.get_places(&query)).await?;
    Ok(HttpResponse::Ok().json(places))
}

/*
    /api/vehicles
*/
pub async fn get_vehicles(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let vehicles = track_load(&state.stores.vehicles, state.backend.get_vehicles()).await?;
    Ok(HttpResponse::Ok().json(vehicles))
}

/*
    /api/tour-guides
*/
pub async fn get_tour_guides(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let guides = track_load(&state.stores.tour_guides, state.backend.get_tour_guides()).await?;
    Ok(HttpResponse::Ok().json(guides))
}

/*
    /api/drivers
*/
pub async fn get_drivers(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let drivers = track_load(&state.stores.drivers, state.backend.get_drivers()).await?;
    Ok(HttpResponse::Ok().json(drivers))
}

pub async fn get_hotel_tiers() -> impl Responder {
    HttpResponse::Ok().json(hotel_tiers())
}

/*
    /api/custom-inquiries (created by this process)
*/
pub async fn get_custom_inquiries(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.stores.custom_inquiries.snapshot())
}
