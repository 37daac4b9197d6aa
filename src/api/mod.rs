//! HTTP API handlers

pub mod health;
pub mod users;

pub use health::health_routes;
pub use users::{
    create_user, create_users_bulk, delete_user, get_user, list_users, update_user,
    update_users_bulk,
};
