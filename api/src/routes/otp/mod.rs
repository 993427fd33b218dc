//! Phone verification endpoints
//!
//! - `POST /otp/send` - issue a code
//! - `POST /otp/verify` - check a code
//! - `POST /otp/proof` - confirm a completed verification before a signup or recovery step

pub mod proof;
pub mod send_code;
pub mod verify_code;

use actix_web::web;

pub fn scope() -> actix_web::Scope {
    web::scope("/otp")
        .route("/send", web::post().to(send_code::send_code))
        .route("/verify", web::post().to(verify_code::verify_code))
        .route("/proof", web::post().to(proof::proof))
}
