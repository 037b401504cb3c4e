use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web, App,
};
use serde_json::{json, Value};

use trip_builder_api::{config::AppConfig, routes, AppState};

pub struct TestApp {
    pub server: mockito::ServerGuard,
    pub state: web::Data<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let server = mockito::Server::new_async().await;
        let mut config = AppConfig::with_backend(&format!("{}/api", server.url()))
            .expect("mock backend url");
        config.search_debounce_ms = 5;
        let state = web::Data::new(AppState::new(config).expect("app state"));

        Self { server, state }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .wrap(Logger::default())
            .configure(routes::configure)
    }

    pub async fn mock_json(
        &mut self,
        method: &str,
        path: &str,
        status: usize,
        body: Value,
    ) -> mockito::Mock {
        self.server
            .mock(method, path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }
}

pub fn place_json(id: &str, name: &str) -> Value {
    json!({ "_id": id, "name": name, "featured": true })
}

pub fn vehicles_json() -> Value {
    json!([
        {
            "_id": "v1",
            "name": "Toyota KDH Van",
            "vehicleType": "van",
            "capacity": 9,
            "pricePerDay": 80
        },
        { "_id": "v2", "name": "Prius", "vehicleType": "car", "capacity": 3, "pricePerDay": 45 }
    ])
}

pub fn contact_json() -> Value {
    json!({
        "startDate": "2026-12-01",
        "travellers": 2,
        "contact": {
            "name": "Ayesha Perera",
            "email": "ayesha@example.com",
            "phone": "+94 77 123 4567"
        },
        "additionalRequirements": "Vegetarian meals"
    })
}
