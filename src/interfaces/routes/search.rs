use actix_web::web;

use crate::handlers::search;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/search")
            .route(web::get().to(search::search_images))
    );
}
