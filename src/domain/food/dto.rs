use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone)]
pub struct CreateFoodDto {
    pub name: String,
    pub serving_size_g: f64,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateFoodDto {
    pub name: Option<String>,
    pub serving_size_g: Option<f64>,
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct GetFoodDto {
    /// Case-insensitive substring match on the name
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl CreateFoodDto {
    pub fn validate(&self) -> DomainResult<()> {
        validate_name(&self.name)?;
        validate_serving_size(self.serving_size_g)?;
        for (field, value) in [
            ("calories", self.calories),
            ("protein_g", self.protein_g),
            ("carbs_g", self.carbs_g),
            ("fat_g", self.fat_g),
        ] {
            validate_non_negative(field, value)?;
        }
        Ok(())
    }
}

impl UpdateFoodDto {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(size) = self.serving_size_g {
            validate_serving_size(size)?;
        }
        for (field, value) in [
            ("calories", self.calories),
            ("protein_g", self.protein_g),
            ("carbs_g", self.carbs_g),
            ("fat_g", self.fat_g),
        ] {
            if let Some(v) = value {
                validate_non_negative(field, v)?;
            }
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    let len = name.trim().chars().count();
    if len == 0 || len > 200 {
        return Err(DomainError::Validation(
            "Food name must be 1-200 characters".into(),
        ));
    }
    Ok(())
}

fn validate_serving_size(size: f64) -> DomainResult<()> {
    if !(size.is_finite() && size > 0.0) {
        return Err(DomainError::Validation(
            "serving_size_g must be greater than 0".into(),
        ));
    }
    Ok(())
}

fn validate_non_negative(field: &str, value: f64) -> DomainResult<()> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(DomainError::Validation(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    Ok(())
}
