//! Nutrient totals and the aggregation that produces them.

use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::meal::MealEntry;

/// Nutrients tracked per food serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    Calories,
    ProteinG,
    CarbsG,
    FatG,
}

impl Nutrient {
    pub const ALL: [Nutrient; 4] = [
        Nutrient::Calories,
        Nutrient::ProteinG,
        Nutrient::CarbsG,
        Nutrient::FatG,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Nutrient::Calories => "calories",
            Nutrient::ProteinG => "protein_g",
            Nutrient::CarbsG => "carbs_g",
            Nutrient::FatG => "fat_g",
        }
    }
}

impl std::fmt::Display for Nutrient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summed nutrient quantities. Also used for per-serving density.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientTotals {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl NutrientTotals {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::ProteinG => self.protein_g,
            Nutrient::CarbsG => self.carbs_g,
            Nutrient::FatG => self.fat_g,
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            protein_g: self.protein_g * factor,
            carbs_g: self.carbs_g * factor,
            fat_g: self.fat_g * factor,
        }
    }

    pub fn is_zero(&self) -> bool {
        Nutrient::ALL.iter().all(|n| self.get(*n) == 0.0)
    }

    /// Nutrient name → summed quantity.
    pub fn as_map(&self) -> BTreeMap<&'static str, f64> {
        Nutrient::ALL
            .iter()
            .map(|n| (n.as_str(), self.get(*n)))
            .collect()
    }
}

impl Add for NutrientTotals {
    type Output = NutrientTotals;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            calories: self.calories + rhs.calories,
            protein_g: self.protein_g + rhs.protein_g,
            carbs_g: self.carbs_g + rhs.carbs_g,
            fat_g: self.fat_g + rhs.fat_g,
        }
    }
}

impl AddAssign for NutrientTotals {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for NutrientTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, t| acc + t)
    }
}

/// Totals for a single calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub totals: NutrientTotals,
}

/// Σ(servings × nutrient per serving) over the given entries.
pub fn aggregate(entries: &[MealEntry]) -> NutrientTotals {
    entries.iter().map(MealEntry::nutrients).sum()
}

/// One [`DailyTotals`] per requested day, zero-filled where nothing was logged.
///
/// Entries outside `days` are ignored.
pub fn daily_breakdown(entries: &[MealEntry], days: &[NaiveDate]) -> Vec<DailyTotals> {
    let mut by_day: BTreeMap<NaiveDate, NutrientTotals> =
        days.iter().map(|d| (*d, NutrientTotals::zero())).collect();

    for entry in entries {
        if let Some(totals) = by_day.get_mut(&entry.meal.consumed_at.date_naive()) {
            *totals += entry.nutrients();
        }
    }

    by_day
        .into_iter()
        .map(|(date, totals)| DailyTotals { date, totals })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::food::Food;
    use crate::domain::meal::Meal;
    use chrono::{TimeZone, Utc};

    fn food(id: i32, calories: f64, protein_g: f64) -> Food {
        Food {
            id,
            name: format!("food-{}", id),
            serving_size_g: 100.0,
            calories,
            protein_g,
            carbs_g: 10.0,
            fat_g: 1.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn entry(food: Food, servings: f64, day: u32) -> MealEntry {
        let consumed_at = Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap();
        MealEntry {
            meal: Meal {
                id: 1,
                user_id: 1,
                food_id: food.id,
                servings,
                consumed_at,
                notes: None,
                idempotency_key: None,
                created_at: consumed_at,
                updated_at: consumed_at,
            },
            food,
        }
    }

    #[test]
    fn aggregate_sums_servings_times_density() {
        // 2 × 50 kcal + 1 × 100 kcal = 200 kcal
        let entries = vec![
            entry(food(1, 50.0, 5.0), 2.0, 1),
            entry(food(2, 100.0, 20.0), 1.0, 1),
        ];
        let totals = aggregate(&entries);
        assert_eq!(totals.calories, 200.0);
        assert_eq!(totals.protein_g, 30.0);
        assert_eq!(totals.carbs_g, 30.0);
        assert_eq!(totals.fat_g, 3.0);
    }

    #[test]
    fn aggregate_of_nothing_is_zero() {
        let totals = aggregate(&[]);
        assert!(totals.is_zero());
        assert_eq!(totals.as_map().values().sum::<f64>(), 0.0);
    }

    #[test]
    fn as_map_uses_nutrient_names() {
        let totals = NutrientTotals {
            calories: 1.0,
            protein_g: 2.0,
            carbs_g: 3.0,
            fat_g: 4.0,
        };
        let map = totals.as_map();
        assert_eq!(map["calories"], 1.0);
        assert_eq!(map["protein_g"], 2.0);
        assert_eq!(map["carbs_g"], 3.0);
        assert_eq!(map["fat_g"], 4.0);
    }

    #[test]
    fn breakdown_zero_fills_missing_days() {
        let days: Vec<NaiveDate> = (1..=3)
            .map(|d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap())
            .collect();
        let entries = vec![
            entry(food(1, 50.0, 5.0), 1.0, 1),
            entry(food(1, 50.0, 5.0), 3.0, 3),
            entry(food(1, 50.0, 5.0), 9.0, 9),
        ];

        let breakdown = daily_breakdown(&entries, &days);
        assert_eq!(breakdown.len(), 3);
        assert_eq!(breakdown[0].totals.calories, 50.0);
        assert!(breakdown[1].totals.is_zero());
        assert_eq!(breakdown[2].totals.calories, 150.0);
    }
}
