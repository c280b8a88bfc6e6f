pub mod appointments;
pub mod assessments;
pub mod auth;
pub mod careers;
pub mod health;
pub mod users;
