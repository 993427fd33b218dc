//! Shipping fee endpoints

pub mod calculate;

use actix_web::web;

pub fn scope() -> actix_web::Scope {
    web::scope("/shipping").route("/calculate", web::post().to(calculate::calculate))
}
