//! Route registration for the `/api/v1` scope.

use actix_web::web;

pub mod health;
pub mod intent;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    intent::init(cfg);
}
