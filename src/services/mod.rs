pub mod backend_client;
pub mod pricing_service;
pub mod search_service;
pub mod trip_builder;
