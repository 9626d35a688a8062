pub mod analytics;
pub mod auth;
pub mod foods;
pub mod health;
pub mod meals;
pub mod metrics;
pub mod request_id;
pub mod users;
