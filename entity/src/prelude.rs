pub use super::facility::Entity as Facility;
pub use super::food_facility::Entity as FoodFacility;
pub use super::supplier::Entity as Supplier;
