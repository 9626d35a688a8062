//! Application layer: use-case services orchestrating the domain
//! over the ports below.

pub mod analytics;
pub mod catalog;
pub mod identity;
pub mod maintenance;
pub mod meals;
pub mod ports;

pub use analytics::AnalyticsService;
pub use catalog::FoodService;
pub use identity::{AuthTokens, RegisterUser, UserService};
pub use maintenance::start_state_sweeper;
pub use meals::{LogMeal, LoggedMeal, MealService};
pub use ports::{CacheError, CacheStore, RateLimitDecision, RateLimiter};
