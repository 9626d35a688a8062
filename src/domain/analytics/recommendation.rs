//! Threshold-based nutrition advice.
//!
//! [`generate`] is a pure function of the trailing daily totals and the
//! configured thresholds; picking concrete foods for the returned
//! [`FoodFocus`] is left to the application layer.

use serde::{Deserialize, Serialize};

use super::totals::{DailyTotals, Nutrient, NutrientTotals};

/// Number of trailing days (reference day included) inspected for a
/// sustained calorie deficit.
pub const DEFICIT_STREAK_DAYS: usize = 3;

pub const EXCEEDED_RATIONALE: &str =
    "You exceeded your calorie goal yesterday. Here are some lower-calorie options.";
pub const DEFICIT_RATIONALE: &str = "You've been under your calorie goal for the last 3 days. \
     Here are some protein-dense options to help you meet your target.";
pub const CONSISTENT_RATIONALE: &str =
    "Your calorie intake is consistent. No specific recommendation at this time.";

/// Static thresholds the totals are compared against.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationThresholds {
    pub calorie_goal: f64,
    pub protein_target_g: f64,
    pub carbs_limit_g: f64,
    pub fat_limit_g: f64,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            calorie_goal: 2000.0,
            protein_target_g: 50.0,
            carbs_limit_g: 325.0,
            fat_limit_g: 78.0,
        }
    }
}

/// Which kind of foods should accompany the advice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodFocus {
    LowerCalorie,
    ProteinDense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Increase,
    Decrease,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub nutrient: Nutrient,
    pub direction: Direction,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub rationale: String,
    pub focus: Option<FoodFocus>,
    pub suggestions: Vec<Suggestion>,
}

/// Derive advice from per-day totals ordered oldest first, the last entry
/// being the reference day.
pub fn generate(recent: &[DailyTotals], thresholds: &RecommendationThresholds) -> Advice {
    let goal = thresholds.calorie_goal;

    let yesterday = recent.len().checked_sub(2).and_then(|i| recent.get(i));
    let deficit_streak = recent.len() >= DEFICIT_STREAK_DAYS
        && recent[recent.len() - DEFICIT_STREAK_DAYS..]
            .iter()
            .all(|d| d.totals.calories < goal);

    let (rationale, focus) = match yesterday {
        Some(day) if day.totals.calories > goal => {
            (EXCEEDED_RATIONALE, Some(FoodFocus::LowerCalorie))
        }
        _ if deficit_streak => (DEFICIT_RATIONALE, Some(FoodFocus::ProteinDense)),
        _ => (CONSISTENT_RATIONALE, None),
    };

    let today = recent.last().map(|d| d.totals).unwrap_or_default();

    Advice {
        rationale: rationale.to_string(),
        focus,
        suggestions: suggestions_for(&today, thresholds),
    }
}

fn suggestions_for(totals: &NutrientTotals, t: &RecommendationThresholds) -> Vec<Suggestion> {
    let mut out = Vec::new();

    if totals.protein_g < t.protein_target_g {
        out.push(Suggestion {
            nutrient: Nutrient::ProteinG,
            direction: Direction::Increase,
            message: format!(
                "Increase protein: {:.0} g logged against a {:.0} g target.",
                totals.protein_g, t.protein_target_g
            ),
        });
    }
    if totals.carbs_g > t.carbs_limit_g {
        out.push(Suggestion {
            nutrient: Nutrient::CarbsG,
            direction: Direction::Decrease,
            message: format!(
                "Reduce carbs: {:.0} g logged against a {:.0} g limit.",
                totals.carbs_g, t.carbs_limit_g
            ),
        });
    }
    if totals.fat_g > t.fat_limit_g {
        out.push(Suggestion {
            nutrient: Nutrient::FatG,
            direction: Direction::Decrease,
            message: format!(
                "Reduce fat: {:.0} g logged against a {:.0} g limit.",
                totals.fat_g, t.fat_limit_g
            ),
        });
    }
    if totals.calories > t.calorie_goal {
        out.push(Suggestion {
            nutrient: Nutrient::Calories,
            direction: Direction::Decrease,
            message: format!(
                "Reduce calories: {:.0} kcal logged against a {:.0} kcal goal.",
                totals.calories, t.calorie_goal
            ),
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn days(calories: &[f64]) -> Vec<DailyTotals> {
        calories
            .iter()
            .enumerate()
            .map(|(i, kcal)| DailyTotals {
                date: NaiveDate::from_ymd_opt(2024, 5, 1 + i as u32).unwrap(),
                totals: NutrientTotals {
                    calories: *kcal,
                    protein_g: 60.0,
                    carbs_g: 200.0,
                    fat_g: 50.0,
                },
            })
            .collect()
    }

    #[test]
    fn exceeded_yesterday_asks_for_lower_calorie_foods() {
        let advice = generate(&days(&[1800.0, 2500.0, 1900.0]), &Default::default());
        assert_eq!(advice.rationale, EXCEEDED_RATIONALE);
        assert_eq!(advice.focus, Some(FoodFocus::LowerCalorie));
    }

    #[test]
    fn three_days_under_goal_asks_for_protein() {
        let advice = generate(&days(&[1500.0, 1400.0, 1200.0]), &Default::default());
        assert_eq!(advice.rationale, DEFICIT_RATIONALE);
        assert_eq!(advice.focus, Some(FoodFocus::ProteinDense));
    }

    #[test]
    fn hitting_the_goal_exactly_is_consistent() {
        let advice = generate(&days(&[1500.0, 2000.0, 1200.0]), &Default::default());
        assert_eq!(advice.rationale, CONSISTENT_RATIONALE);
        assert_eq!(advice.focus, None);
        assert!(advice.suggestions.is_empty());
    }

    #[test]
    fn single_day_without_history_is_consistent() {
        let advice = generate(&days(&[1200.0]), &Default::default());
        assert_eq!(advice.focus, None);
    }

    #[test]
    fn suggestions_follow_reference_day_thresholds() {
        let mut recent = days(&[2000.0, 2000.0]);
        recent[1].totals = NutrientTotals {
            calories: 2600.0,
            protein_g: 20.0,
            carbs_g: 400.0,
            fat_g: 90.0,
        };

        let advice = generate(&recent, &Default::default());
        let flagged: Vec<(Nutrient, Direction)> = advice
            .suggestions
            .iter()
            .map(|s| (s.nutrient, s.direction))
            .collect();
        assert_eq!(
            flagged,
            vec![
                (Nutrient::ProteinG, Direction::Increase),
                (Nutrient::CarbsG, Direction::Decrease),
                (Nutrient::FatG, Direction::Decrease),
                (Nutrient::Calories, Direction::Decrease),
            ]
        );
        assert!(advice.suggestions[0].message.starts_with("Increase protein: 20 g"));
    }

    #[test]
    fn empty_history_still_flags_missing_protein() {
        let advice = generate(&[], &Default::default());
        assert_eq!(advice.rationale, CONSISTENT_RATIONALE);
        assert_eq!(advice.suggestions.len(), 1);
        assert_eq!(advice.suggestions[0].nutrient, Nutrient::ProteinG);
    }
}
