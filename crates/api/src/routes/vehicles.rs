//! Route definitions for the vehicle fleet.
//!
//! ```text
//! POST   /                       create_vehicle
//! GET    /                       list_vehicles
//! GET    /{id}                   get_vehicle
//! PATCH  /{id}                   update_vehicle
//! DELETE /{id}                   delete_vehicle
//! PUT    /{id}/location          update_vehicle_location
//! POST   /{id}/delink-driver     delink_driver
//! ```

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::vehicles;
use crate::state::AppState;

/// Vehicle routes -- mounted at `/vehicles`.
pub fn vehicles_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(vehicles::create_vehicle).get(vehicles::list_vehicles),
        )
        .route(
            "/{id}",
            get(vehicles::get_vehicle)
                .patch(vehicles::update_vehicle)
                .delete(vehicles::delete_vehicle),
        )
        .route("/{id}/location", put(vehicles::update_vehicle_location))
        .route("/{id}/delink-driver", post(vehicles::delink_driver))
}
