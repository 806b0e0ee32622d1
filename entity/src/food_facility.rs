use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A stock entry that exists only as long as its facility does.
///
/// The foreign key has no `ON DELETE CASCADE`; removing a facility must
/// remove these rows first, inside the same transaction.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "food_facility")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(skip_deserializing)]
    pub id: i32,
    #[serde(rename = "foodId")]
    pub food_id: String,
    #[serde(rename = "facilityId")]
    pub facility_id: String,
    pub amount: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::facility::Entity",
        from = "Column::FacilityId",
        to = "super::facility::Column::Id"
    )]
    Facility,
}

impl Related<super::facility::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Facility.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
