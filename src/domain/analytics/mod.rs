//! Nutrition analytics: windows, aggregation and recommendations.

pub mod recommendation;
pub mod totals;
pub mod window;

pub use recommendation::{
    generate as generate_advice, Advice, Direction, FoodFocus, RecommendationThresholds,
    Suggestion, CONSISTENT_RATIONALE, DEFICIT_RATIONALE, EXCEEDED_RATIONALE,
};
pub use totals::{aggregate, daily_breakdown, DailyTotals, Nutrient, NutrientTotals};
pub use window::AnalyticsWindow;
