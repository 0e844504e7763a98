//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod accounts;
pub mod auth;
pub mod dto;
pub mod error;
pub mod health;
pub mod pickup_points;
pub mod receptions;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

/// Register every `/api/v1` handler on `cfg`.
///
/// `/pvz/all` is a distinct literal path, so its order relative to `/pvz`
/// does not matter.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(accounts::dummy_login)
        .service(accounts::register)
        .service(accounts::login)
        .service(pickup_points::create_pickup_point)
        .service(pickup_points::list_pickup_points)
        .service(pickup_points::list_all_pickup_points)
        .service(pickup_points::close_last_reception)
        .service(pickup_points::delete_last_product)
        .service(receptions::open_reception)
        .service(receptions::add_product);
}
