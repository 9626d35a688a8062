//! Database entities module

pub mod food;
pub mod meal;
pub mod user;

pub use food::Entity as Food;
pub use meal::Entity as Meal;
pub use user::Entity as User;
