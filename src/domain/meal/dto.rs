use chrono::{DateTime, Utc};

use super::model::{MAX_NOTES_LEN, MAX_SERVINGS};
use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone)]
pub struct CreateMealDto {
    pub user_id: i32,
    pub food_id: i32,
    pub servings: f64,
    pub consumed_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateMealDto {
    pub servings: Option<f64>,
    pub consumed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GetMealDto {
    pub user_id: i32,
    /// Inclusive lower bound on `consumed_at`
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `consumed_at`
    pub end: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

pub(crate) fn validate_servings(servings: f64) -> DomainResult<()> {
    if !(servings.is_finite() && servings > 0.0) {
        return Err(DomainError::Validation(
            "servings must be greater than 0".into(),
        ));
    }
    if servings > MAX_SERVINGS {
        return Err(DomainError::Validation(format!(
            "servings must be at most {}",
            MAX_SERVINGS
        )));
    }
    Ok(())
}

pub(crate) fn validate_notes(notes: Option<&str>) -> DomainResult<()> {
    if notes.is_some_and(|n| n.chars().count() > MAX_NOTES_LEN) {
        return Err(DomainError::Validation(format!(
            "notes must be at most {} characters",
            MAX_NOTES_LEN
        )));
    }
    Ok(())
}

impl UpdateMealDto {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(s) = self.servings {
            validate_servings(s)?;
        }
        validate_notes(self.notes.as_deref())
    }
}

impl GetMealDto {
    pub fn validate(&self) -> DomainResult<()> {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(DomainError::Validation(
                    "start_date must not be after end_date".into(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn servings_must_be_positive() {
        assert!(validate_servings(0.5).is_ok());
        assert!(validate_servings(0.0).is_err());
        assert!(validate_servings(f64::NAN).is_err());
        assert!(validate_servings(MAX_SERVINGS).is_ok());
        assert!(validate_servings(MAX_SERVINGS + 0.5).is_err());
        assert!(validate_servings(1e308).is_err());
    }

    #[test]
    fn notes_are_capped() {
        assert!(validate_notes(Some(&"a".repeat(500))).is_ok());
        assert!(validate_notes(Some(&"a".repeat(501))).is_err());
        assert!(validate_notes(None).is_ok());
    }
}
