use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "facility")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub name: String,
    pub unit: String,
    pub in_value: f64,
    pub amount: i32,
    pub price: Option<f64>,
    #[serde(rename = "supplierId")]
    pub supplier_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id"
    )]
    Supplier,
    #[sea_orm(has_many = "super::food_facility::Entity")]
    FoodFacility,
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<super::food_facility::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FoodFacility.def()
    }
}

impl ActiveModelBehavior for ActiveModel {
    /// Facilities are keyed by a generated UUID unless the caller sets `id` afterwards.
    fn new() -> Self {
        use sea_orm::Set;
        Self {
            id: Set(Uuid::new_v4().to_string()),
            ..ActiveModelTrait::default()
        }
    }
}
