use actix_web::web;

use crate::{constants::API_PREFIX, handlers::home::home};

mod images;
mod search;
mod system;
mod json_error;

pub use json_error::JsonError;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.service(
        web::scope(API_PREFIX)
            .configure(images::config_routes)
            .configure(search::config_routes)
            .configure(system::config_routes)
    );

    cfg.configure(json_error::config_routes);
}
