use ::entity::{facility, facility::Entity as Facility, supplier, supplier::Entity as Supplier};
use sea_orm::*;
use serde::Serialize;

use crate::{FacilityError, Subject};

pub(crate) const FACILITY: Subject = Subject {
    record: "facility",
    reference: "supplierId",
};

/// A facility together with the supplier it references, if any.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FacilityWithSupplier {
    #[serde(flatten)]
    pub facility: facility::Model,
    pub supplier: Option<supplier::Model>,
}

impl From<(facility::Model, Option<supplier::Model>)> for FacilityWithSupplier {
    fn from((facility, supplier): (facility::Model, Option<supplier::Model>)) -> Self {
        Self { facility, supplier }
    }
}

pub struct Query;

impl Query {
    /// Every facility joined with its supplier, in primary key order.
    pub async fn list_facilities(db: &DbConn) -> Result<Vec<FacilityWithSupplier>, FacilityError> {
        let rows = Facility::find()
            .find_also_related(Supplier)
            .order_by_asc(facility::Column::Id)
            .all(db)
            .await
            .map_err(|err| FacilityError::from_db(err, FACILITY))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// An absent row is reported as not found, not as a store failure.
    pub async fn find_facility_by_id(
        db: &DbConn,
        id: &str,
    ) -> Result<FacilityWithSupplier, FacilityError> {
        Facility::find_by_id(id)
            .find_also_related(Supplier)
            .one(db)
            .await
            .map_err(|err| FacilityError::from_db(err, FACILITY))?
            .map(Into::into)
            .ok_or_else(|| FacilityError::not_found(FACILITY.record))
    }
}
