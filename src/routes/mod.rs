pub mod catalog;
pub mod custom_package;
pub mod health;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .route("/places", web::get().to(catalog::get_places))
                .route("/vehicles", web::get().to(catalog::get_vehicles))
                .route("/tour-guides", web::get().to(catalog::get_tour_guides))
                .route("/drivers", web::get().to(catalog::get_drivers))
                .route("/hotel-tiers", web::get().to(catalog::get_hotel_tiers))
                .route(
                    "/custom-inquiries",
                    web::get().to(catalog::get_custom_inquiries),
                )
                .service(
                    web::scope("/custom-package/sessions")
                        .route("", web::post().to(custom_package::create_session))
                        .route("/{id}", web::get().to(custom_package::get_session))
                        .route("/{id}", web::delete().to(custom_package::delete_session))
                        .route(
                            "/{id}/destinations",
                            web::post().to(custom_package::toggle_destination),
                        )
                        .route(
                            "/{id}/destinations/{place_id}/nights",
                            web::put().to(custom_package::set_destination_nights),
                        )
                        .route("/{id}/days", web::post().to(custom_package::add_day))
                        .route(
                            "/{id}/days/{day}",
                            web::delete().to(custom_package::remove_day),
                        )
                        .route(
                            "/{id}/active-day",
                            web::put().to(custom_package::set_active_day),
                        )
                        .route("/{id}/items", web::post().to(custom_package::add_item))
                        .route(
                            "/{id}/items/{item_id}",
                            web::delete().to(custom_package::remove_item),
                        )
                        .route(
                            "/{id}/items/{item_id}",
                            web::patch().to(custom_package::update_item),
                        )
                        .route(
                            "/{id}/services",
                            web::put().to(custom_package::set_services),
                        )
                        .route("/{id}/trip", web::put().to(custom_package::set_trip))
                        .route("/{id}/costs", web::get().to(custom_package::get_costs))
                        .route(
                            "/{id}/search",
                            web::get().to(custom_package::search_places),
                        )
                        .route(
                            "/{id}/submit",
                            web::post().to(custom_package::submit_inquiry),
                        ),
                ),
        );
}
