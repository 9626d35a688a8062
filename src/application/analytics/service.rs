//! Analytics service
//!
//! Every view is read through the [`CacheStore`]: a hit is returned as-is,
//! a miss is computed from the meal store and written back. Cache failures
//! degrade to recomputation and never fail the read.

use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::reports::{
    CalorieStatus, DailyReport, RecommendationReport, SuggestedFood, WeeklyReport,
};
use crate::application::ports::CacheStore;
use crate::config::NutritionConfig;
use crate::domain::analytics::{
    aggregate, daily_breakdown, generate_advice, AnalyticsWindow, FoodFocus, NutrientTotals,
};
use crate::domain::{DomainResult, MealEntry, RepositoryProvider};

/// Cache key for a view of `user_id` anchored on `date`,
/// e.g. `analytics:daily:42:2024-05-01`.
pub fn cache_key(view: &str, user_id: i32, date: NaiveDate) -> String {
    format!("analytics:{}:{}:{}", view, user_id, date.format("%Y-%m-%d"))
}

pub struct AnalyticsService {
    repos: Arc<dyn RepositoryProvider>,
    cache: Arc<dyn CacheStore>,
    nutrition: NutritionConfig,
}

impl AnalyticsService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        cache: Arc<dyn CacheStore>,
        nutrition: NutritionConfig,
    ) -> Self {
        Self {
            repos,
            cache,
            nutrition,
        }
    }

    // ── Aggregator ──────────────────────────────────────────────

    /// Σ(servings × nutrient per serving) over the user's meals in `window`.
    pub async fn totals(
        &self,
        user_id: i32,
        window: AnalyticsWindow,
        date: NaiveDate,
    ) -> DomainResult<NutrientTotals> {
        let view = format!("totals:{}", window.as_str());
        self.cached(
            cache_key(&view, user_id, date),
            self.compute_totals(user_id, window, date),
        )
        .await
    }

    async fn compute_totals(
        &self,
        user_id: i32,
        window: AnalyticsWindow,
        date: NaiveDate,
    ) -> DomainResult<NutrientTotals> {
        let entries = self.entries(user_id, window, date).await?;
        Ok(aggregate(&entries))
    }

    // ── Views ───────────────────────────────────────────────────

    pub async fn daily(&self, user_id: i32, date: NaiveDate) -> DomainResult<DailyReport> {
        self.cached(
            cache_key("daily", user_id, date),
            self.compute_daily(user_id, date),
        )
        .await
    }

    async fn compute_daily(&self, user_id: i32, date: NaiveDate) -> DomainResult<DailyReport> {
        let goal = self.calorie_goal(user_id).await?;
        let entries = self.entries(user_id, AnalyticsWindow::Day, date).await?;
        let totals = aggregate(&entries);

        Ok(DailyReport {
            date,
            totals,
            daily_calorie_goal: goal,
            remaining_calories: goal - totals.calories,
            status: CalorieStatus::evaluate(totals.calories, goal),
        })
    }

    pub async fn weekly(&self, user_id: i32, date: NaiveDate) -> DomainResult<WeeklyReport> {
        self.cached(
            cache_key("weekly", user_id, date),
            self.compute_weekly(user_id, date),
        )
        .await
    }

    async fn compute_weekly(&self, user_id: i32, date: NaiveDate) -> DomainResult<WeeklyReport> {
        let window = AnalyticsWindow::Week;
        let entries = self.entries(user_id, window, date).await?;

        Ok(WeeklyReport {
            start_date: window.start_date(date),
            end_date: date,
            totals: aggregate(&entries),
            days: daily_breakdown(&entries, &window.days(date)),
        })
    }

    pub async fn recommendation(
        &self,
        user_id: i32,
        date: NaiveDate,
    ) -> DomainResult<RecommendationReport> {
        self.cached(
            cache_key("reco", user_id, date),
            self.compute_recommendation(user_id, date),
        )
        .await
    }

    async fn compute_recommendation(
        &self,
        user_id: i32,
        date: NaiveDate,
    ) -> DomainResult<RecommendationReport> {
        let user = self.repos.users().get_user_by_id(user_id).await?;
        let thresholds = self
            .nutrition
            .thresholds(user.and_then(|u| u.daily_calorie_goal));

        let window = AnalyticsWindow::Week;
        let entries = self.entries(user_id, window, date).await?;
        let recent = daily_breakdown(&entries, &window.days(date));
        let advice = generate_advice(&recent, &thresholds);

        let limit = self.nutrition.suggestion_limit;
        let foods = match advice.focus {
            Some(FoodFocus::LowerCalorie) => {
                self.repos
                    .foods()
                    .find_below_calories(thresholds.calorie_goal, limit)
                    .await?
            }
            Some(FoodFocus::ProteinDense) => self.repos.foods().find_protein_dense(limit).await?,
            None => Vec::new(),
        };

        Ok(RecommendationReport {
            date,
            daily_calorie_goal: thresholds.calorie_goal,
            rationale: advice.rationale,
            focus: advice.focus,
            suggestions: advice.suggestions,
            foods: foods.into_iter().map(SuggestedFood::from).collect(),
        })
    }

    // ── Helpers ─────────────────────────────────────────────────

    async fn entries(
        &self,
        user_id: i32,
        window: AnalyticsWindow,
        date: NaiveDate,
    ) -> DomainResult<Vec<MealEntry>> {
        let (start, end) = window.bounds(date);
        self.repos
            .meals()
            .find_entries_between(user_id, start, end)
            .await
    }

    async fn calorie_goal(&self, user_id: i32) -> DomainResult<f64> {
        let user = self.repos.users().get_user_by_id(user_id).await?;
        Ok(user
            .map(|u| u.calorie_goal_or(self.nutrition.default_calorie_goal))
            .unwrap_or(self.nutrition.default_calorie_goal))
    }

    /// Serve `key` from the cache, or await `compute` and store its result.
    async fn cached<T, Fut>(&self, key: String, compute: Fut) -> DomainResult<T>
    where
        T: Serialize + DeserializeOwned,
        Fut: Future<Output = DomainResult<T>>,
    {
        match self.cache.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => {
                    metrics::counter!("analytics_cache_requests_total", "result" => "hit")
                        .increment(1);
                    debug!(key = %key, "Analytics cache hit");
                    return Ok(value);
                }
                Err(e) => warn!(key = %key, error = %e, "Discarding undecodable cache entry"),
            },
            Ok(None) => {}
            Err(e) => warn!(key = %key, error = %e, "Analytics cache read failed"),
        }

        metrics::counter!("analytics_cache_requests_total", "result" => "miss").increment(1);
        debug!(key = %key, "Analytics cache miss");

        let value = compute.await?;

        match serde_json::to_string(&value) {
            Ok(raw) => {
                if let Err(e) = self.cache.set(&key, raw).await {
                    warn!(key = %key, error = %e, "Analytics cache write failed");
                }
            }
            Err(e) => warn!(key = %key, error = %e, "Failed to serialize analytics payload"),
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};

    use crate::application::ports::CacheError;
    use crate::domain::analytics::{
        CONSISTENT_RATIONALE, DEFICIT_RATIONALE, EXCEEDED_RATIONALE,
    };
    use crate::domain::{CreateFoodDto, CreateMealDto, CreateUserDto, ProfileFields, UserRole};
    use crate::infrastructure::database::connect_in_memory;
    use crate::infrastructure::{InMemoryCache, SeaOrmRepositoryProvider};

    struct BrokenCache;

    #[async_trait]
    impl CacheStore for BrokenCache {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::Unavailable("down".into()))
        }

        async fn set(&self, _key: &str, _value: String) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("down".into()))
        }

        async fn purge_expired(&self) -> usize {
            0
        }
    }

    struct Fixture {
        repos: Arc<dyn RepositoryProvider>,
        user_id: i32,
    }

    impl Fixture {
        async fn new(goal: Option<f64>) -> Self {
            let db = connect_in_memory().await;
            let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db));
            let user = repos
                .users()
                .create_user(CreateUserDto {
                    name: "Ann".into(),
                    email: "ann@example.com".into(),
                    password_hash: "hash".into(),
                    role: UserRole::User,
                    profile: ProfileFields {
                        daily_calorie_goal: goal,
                        ..Default::default()
                    },
                })
                .await
                .unwrap();
            Self {
                repos,
                user_id: user.id,
            }
        }

        fn service(&self, cache: Arc<dyn CacheStore>) -> AnalyticsService {
            AnalyticsService::new(self.repos.clone(), cache, NutritionConfig::default())
        }

        async fn food(&self, name: &str, calories: f64, protein_g: f64) -> i32 {
            self.repos
                .foods()
                .create(CreateFoodDto {
                    name: name.into(),
                    serving_size_g: 100.0,
                    calories,
                    protein_g,
                    carbs_g: 10.0,
                    fat_g: 5.0,
                })
                .await
                .unwrap()
                .id
        }

        async fn eat(&self, food_id: i32, servings: f64, consumed_at: DateTime<Utc>) {
            self.repos
                .meals()
                .create(CreateMealDto {
                    user_id: self.user_id,
                    food_id,
                    servings,
                    consumed_at,
                    notes: None,
                    idempotency_key: None,
                })
                .await
                .unwrap();
        }
    }

    fn may(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    fn fresh_cache() -> Arc<dyn CacheStore> {
        Arc::new(InMemoryCache::new(Duration::from_secs(300)))
    }

    #[test]
    fn cache_key_names_view_user_and_date() {
        assert_eq!(cache_key("daily", 42, may(1)), "analytics:daily:42:2024-05-01");
    }

    #[tokio::test]
    async fn daily_total_sums_servings_times_density() {
        let f = Fixture::new(None).await;
        let fifty = f.food("Fifty", 50.0, 1.0).await;
        let hundred = f.food("Hundred", 100.0, 1.0).await;
        f.eat(fifty, 2.0, at(1, 8)).await;
        f.eat(hundred, 1.0, at(1, 19)).await;
        f.eat(hundred, 1.0, at(2, 0)).await;

        let svc = f.service(fresh_cache());
        let totals = svc
            .totals(f.user_id, AnalyticsWindow::Day, may(1))
            .await
            .unwrap();
        assert_eq!(totals.calories, 200.0);

        let report = svc.daily(f.user_id, may(1)).await.unwrap();
        assert_eq!(report.totals.calories, 200.0);
        assert_eq!(report.daily_calorie_goal, 2000.0);
        assert_eq!(report.remaining_calories, 1800.0);
        assert_eq!(report.status, CalorieStatus::OnTrack);
    }

    #[tokio::test]
    async fn no_meals_yield_zero_totals() {
        let f = Fixture::new(None).await;
        let svc = f.service(fresh_cache());
        let totals = svc
            .totals(f.user_id, AnalyticsWindow::Week, may(7))
            .await
            .unwrap();
        assert!(totals.is_zero());
    }

    #[tokio::test]
    async fn personal_goal_drives_status() {
        let f = Fixture::new(Some(150.0)).await;
        let hundred = f.food("Hundred", 100.0, 1.0).await;
        f.eat(hundred, 2.0, at(1, 12)).await;

        let report = f.service(fresh_cache()).daily(f.user_id, may(1)).await.unwrap();
        assert_eq!(report.status, CalorieStatus::Exceeded);
        assert_eq!(report.remaining_calories, -50.0);
    }

    #[tokio::test]
    async fn weekly_report_has_seven_zero_filled_days() {
        let f = Fixture::new(None).await;
        let hundred = f.food("Hundred", 100.0, 1.0).await;
        f.eat(hundred, 1.0, at(1, 12)).await;
        f.eat(hundred, 3.0, at(7, 23)).await;
        f.eat(hundred, 5.0, at(8, 0)).await;

        let report = f.service(fresh_cache()).weekly(f.user_id, may(7)).await.unwrap();
        assert_eq!(report.start_date, may(1));
        assert_eq!(report.end_date, may(7));
        assert_eq!(report.totals.calories, 400.0);
        assert_eq!(report.days.len(), 7);
        assert_eq!(report.days[0].totals.calories, 100.0);
        assert!(report.days[1..6].iter().all(|d| d.totals.is_zero()));
        assert_eq!(report.days[6].totals.calories, 300.0);
    }

    #[tokio::test]
    async fn reads_within_ttl_are_not_recomputed() {
        let f = Fixture::new(None).await;
        let hundred = f.food("Hundred", 100.0, 1.0).await;
        f.eat(hundred, 1.0, at(1, 12)).await;

        let svc = f.service(fresh_cache());
        let first = svc.daily(f.user_id, may(1)).await.unwrap();

        f.eat(hundred, 1.0, at(1, 13)).await;
        let second = svc.daily(f.user_id, may(1)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second.totals.calories, 100.0);
    }

    #[tokio::test]
    async fn expired_entries_are_recomputed() {
        let f = Fixture::new(None).await;
        let hundred = f.food("Hundred", 100.0, 1.0).await;
        f.eat(hundred, 1.0, at(1, 12)).await;

        let svc = f.service(Arc::new(InMemoryCache::new(Duration::ZERO)));
        let first = svc.daily(f.user_id, may(1)).await.unwrap();

        f.eat(hundred, 1.0, at(1, 13)).await;
        let second = svc.daily(f.user_id, may(1)).await.unwrap();

        assert_eq!(first.totals.calories, 100.0);
        assert_eq!(second.totals.calories, 200.0);
    }

    #[tokio::test]
    async fn cache_failure_falls_back_to_computation() {
        let f = Fixture::new(None).await;
        let hundred = f.food("Hundred", 100.0, 1.0).await;
        f.eat(hundred, 1.0, at(1, 12)).await;

        let svc = f.service(Arc::new(BrokenCache));
        let report = svc.daily(f.user_id, may(1)).await.unwrap();
        assert_eq!(report.totals.calories, 100.0);
    }

    #[tokio::test]
    async fn deleted_food_no_longer_counts() {
        let f = Fixture::new(None).await;
        let fifty = f.food("Fifty", 50.0, 1.0).await;
        let hundred = f.food("Hundred", 100.0, 1.0).await;
        f.eat(fifty, 2.0, at(1, 8)).await;
        f.eat(hundred, 1.0, at(1, 19)).await;

        f.repos.foods().delete(hundred).await.unwrap();

        let totals = f
            .service(fresh_cache())
            .totals(f.user_id, AnalyticsWindow::Day, may(1))
            .await
            .unwrap();
        assert_eq!(totals.calories, 100.0);
    }

    #[tokio::test]
    async fn exceeding_yesterday_suggests_lower_calorie_foods() {
        let f = Fixture::new(None).await;
        let feast = f.food("Feast", 2500.0, 20.0).await;
        f.food("Salad", 80.0, 3.0).await;
        f.food("Soup", 150.0, 8.0).await;
        f.eat(feast, 1.0, at(6, 20)).await;

        let report = f
            .service(fresh_cache())
            .recommendation(f.user_id, may(7))
            .await
            .unwrap();

        assert_eq!(report.rationale, EXCEEDED_RATIONALE);
        assert_eq!(report.focus, Some(FoodFocus::LowerCalorie));
        let names: Vec<_> = report.foods.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Salad", "Soup"]);
    }

    #[tokio::test]
    async fn sustained_deficit_suggests_protein_dense_foods() {
        let f = Fixture::new(None).await;
        let tofu = f.food("Tofu", 140.0, 15.0).await;
        f.food("Chicken", 165.0, 31.0).await;
        for day in 5..=7 {
            f.eat(tofu, 1.0, at(day, 12)).await;
        }

        let report = f
            .service(fresh_cache())
            .recommendation(f.user_id, may(7))
            .await
            .unwrap();

        assert_eq!(report.rationale, DEFICIT_RATIONALE);
        assert_eq!(report.focus, Some(FoodFocus::ProteinDense));
        assert_eq!(report.foods[0].name, "Chicken");
        assert!(!report.suggestions.is_empty());
    }

    #[tokio::test]
    async fn balanced_intake_has_no_focus() {
        let f = Fixture::new(None).await;
        let meal = f.food("Balanced", 2000.0, 60.0).await;
        for day in 5..=7 {
            f.eat(meal, 1.0, at(day, 12)).await;
        }

        let report = f
            .service(fresh_cache())
            .recommendation(f.user_id, may(7))
            .await
            .unwrap();

        assert_eq!(report.rationale, CONSISTENT_RATIONALE);
        assert_eq!(report.focus, None);
        assert!(report.foods.is_empty());
        assert!(report.suggestions.is_empty());
    }
}
