//! Identity module: registration, authentication and user administration

pub mod service;

pub use service::{AuthTokens, RegisterUser, UserService};
