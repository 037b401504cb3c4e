use actix_web::{web, HttpResponse, Responder};
use log::error;
use serde::Serialize;
use std::collections::HashMap;

use crate::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    sessions: usize,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        sessions: state.sessions.len(),
        environment: state.config.environment.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let backend_result = check_backend(&state).await;
    health
        .services
        .insert("backend".to_string(), backend_result.clone());

    let catalog_result = check_catalogs(&state);
    health
        .services
        .insert("catalogs".to_string(), catalog_result.clone());

    if backend_result.status != "ok" || catalog_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

async fn check_backend(state: &AppState) -> ServiceStatus {
    match state.backend.ping().await {
        Ok(code) if code < 500 => ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!(
                "Backend reachable at {} ({})",
                state.backend.base_url(),
                code
            )),
        },
        Ok(code) => ServiceStatus {
            status: "error".to_string(),
            details: Some(format!("Backend responded with {}", code)),
        },
        Err(e) => {
            error!("Backend health check failed: {}", e);

            ServiceStatus {
                status: "error".to_string(),
                details: Some(format!("Failed to reach backend: {}", e)),
            }
        }
    }
}

// A catalog that failed its last load makes the builder degraded.
fn check_catalogs(state: &AppState) -> ServiceStatus {
    let stores = &state.stores;
    let failures: Vec<String> = [
        ("places", stores.places.read(|s| s.error.clone())),
        ("vehicles", stores.vehicles.read(|s| s.error.clone())),
        ("tour_guides", stores.tour_guides.read(|s| s.error.clone())),
        ("drivers", stores.drivers.read(|s| s.error.clone())),
    ]
    .into_iter()
    .filter_map(|(name, error)| error.map(|e| format!("{}: {}", name, e)))
    .collect();

    if failures.is_empty() {
        ServiceStatus {
            status: "ok".to_string(),
            details: None,
        }
    } else {
        ServiceStatus {
            status: "error".to_string(),
            details: Some(failures.join("; ")),
        }
    }
}
