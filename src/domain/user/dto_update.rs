/// Optional nutrition profile attributes, shared by registration and
/// profile updates.
#[derive(Debug, Clone, Default)]
pub struct ProfileFields {
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity_level: Option<String>,
    pub daily_calorie_goal: Option<f64>,
}

/// Partial profile update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserDto {
    pub name: Option<String>,
    pub profile: ProfileFields,
}
