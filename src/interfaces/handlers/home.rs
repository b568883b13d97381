use actix_web::{get, HttpResponse, Responder};

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Screensort photo library API",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "images": "/api/v1/images",
            "search": "/api/v1/search?q=<query>&mode=all|text|objects|colors|tags",
            "health": "/api/v1/health"
        }
    }))
}
