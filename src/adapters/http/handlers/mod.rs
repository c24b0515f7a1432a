pub mod currencies;
pub mod draft;
pub mod health;
