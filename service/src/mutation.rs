use ::entity::{
    facility, facility::Entity as Facility, food_facility, food_facility::Entity as FoodFacility,
};
use sea_orm::*;
use serde::{Deserialize, Serialize};

use crate::{FacilityError, query::FACILITY};

/// Fields accepted when creating a facility.
///
/// Nothing is required here; a field left out is not sent to the store and
/// the table's own constraints decide whether that is acceptable.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct NewFacility {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub in_value: Option<f64>,
    pub amount: Option<i32>,
    #[serde(rename = "supplierId")]
    pub supplier_id: Option<String>,
}

impl NewFacility {
    fn into_active_model(self) -> facility::ActiveModel {
        let mut model = facility::ActiveModel::new();
        if let Some(name) = self.name {
            model.name = Set(name);
        }
        if let Some(unit) = self.unit {
            model.unit = Set(unit);
        }
        if let Some(in_value) = self.in_value {
            model.in_value = Set(in_value);
        }
        if let Some(amount) = self.amount {
            model.amount = Set(amount);
        }
        if let Some(supplier_id) = self.supplier_id {
            model.supplier_id = Set(Some(supplier_id));
        }
        model
    }
}

/// A partial update. Only fields that are present and truthy are written:
/// absent, `null`, `""` and `0` all leave the stored value as is.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct FacilityPatch {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub price: Option<f64>,
    #[serde(rename = "supplierId")]
    pub supplier_id: Option<String>,
}

impl FacilityPatch {
    /// Drop the values that mean "leave unchanged".
    fn truthy(self) -> Self {
        Self {
            name: self.name.filter(|name| !name.is_empty()),
            unit: self.unit.filter(|unit| !unit.is_empty()),
            price: self.price.filter(|price| *price != 0.0),
            supplier_id: self.supplier_id.filter(|id| !id.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clone().truthy() == Self::default()
    }

    fn apply(self, model: &mut facility::ActiveModel) {
        let Self {
            name,
            unit,
            price,
            supplier_id,
        } = self.truthy();

        if let Some(name) = name {
            model.name = Set(name);
        }
        if let Some(unit) = unit {
            model.unit = Set(unit);
        }
        if let Some(price) = price {
            model.price = Set(Some(price));
        }
        if let Some(supplier_id) = supplier_id {
            model.supplier_id = Set(Some(supplier_id));
        }
    }
}

/// What a cascading delete removed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeletedFacility {
    pub id: String,
    pub food_facilities: u64,
}

pub struct Mutation;

impl Mutation {
    pub async fn create_facility(
        db: &DbConn,
        form_data: NewFacility,
    ) -> Result<facility::Model, FacilityError> {
        form_data
            .into_active_model()
            .insert(db)
            .await
            .map_err(|err| FacilityError::from_db(err, FACILITY))
    }

    pub async fn update_facility(
        db: &DbConn,
        id: &str,
        patch: FacilityPatch,
    ) -> Result<facility::Model, FacilityError> {
        let facility = Facility::find_by_id(id)
            .one(db)
            .await
            .map_err(|err| FacilityError::from_db(err, FACILITY))?
            .ok_or_else(|| FacilityError::not_found(FACILITY.record))?;

        if patch.is_empty() {
            return Ok(facility);
        }

        let mut model: facility::ActiveModel = facility.into();
        patch.apply(&mut model);

        // The row may vanish between the read and the write; the store then
        // reports RecordNotUpdated, which translates to not found as well.
        model
            .update(db)
            .await
            .map_err(|err| FacilityError::from_db(err, FACILITY))
    }

    /// Remove a facility and every food facility referencing it.
    ///
    /// Both deletions run in one transaction. A missing facility aborts the
    /// transaction after the dependent delete, so nothing is removed.
    pub async fn delete_facility(db: &DbConn, id: &str) -> Result<DeletedFacility, FacilityError> {
        let id = id.to_owned();

        db.transaction::<_, _, DbErr>(|txn| {
            Box::pin(async move {
                let dependents = FoodFacility::delete_many()
                    .filter(food_facility::Column::FacilityId.eq(id.as_str()))
                    .exec(txn)
                    .await?;

                let res = Facility::delete_by_id(id.as_str()).exec(txn).await?;
                if res.rows_affected == 0 {
                    return Err(DbErr::RecordNotFound(format!("facility {id}")));
                }

                Ok(DeletedFacility {
                    id,
                    food_facilities: dependents.rows_affected,
                })
            })
        })
        .await
        .map_err(|err| FacilityError::from_transaction(err, FACILITY))
    }
}
