use actix_web::{HttpResponse, Responder};

use crate::models::WelcomeResponse;

pub const WELCOME_MESSAGE: &str = "Welcome to the The Next Pit Stop Predictor!";

/// Static greeting, independent of model state
pub async fn welcome() -> impl Responder {
    HttpResponse::Ok().json(WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}
