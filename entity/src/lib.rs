pub mod facility;
pub mod food_facility;
pub mod prelude;
pub mod supplier;

pub use sea_orm;
