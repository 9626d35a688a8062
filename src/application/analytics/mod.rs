//! Nutrition analytics use-cases: aggregation views and recommendations,
//! served through the analytics cache.

pub mod reports;
pub mod service;

pub use reports::{
    CalorieStatus, DailyReport, RecommendationReport, SuggestedFood, WeeklyReport,
};
pub use service::{cache_key, AnalyticsService};
