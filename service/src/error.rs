use sea_orm::{
    DbErr, RuntimeErr, SqlErr, TransactionError,
    sqlx::{self, postgres::PgDatabaseError},
};
use thiserror::Error;

/// Outcome of a failed facility operation, as reported to callers.
///
/// The store raises a small closed set of constraint and existence failures;
/// each becomes [`Conflict`](FacilityError::Conflict) or
/// [`NotFound`](FacilityError::NotFound) with the offending field or record
/// named in `target`. Everything else is a [`Failure`](FacilityError::Failure)
/// carrying only the store's message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FacilityError {
    /// A uniqueness constraint was violated
    #[error("constraint violated: `{target}` already exists")]
    Conflict { target: String },
    /// The record to read or mutate, or a record it references, does not exist
    #[error("`{target}` not found")]
    NotFound { target: String },
    /// Any other store failure, connectivity included
    #[error("{message}")]
    Failure { message: String },
}

/// Names to report when the store does not say which record or column failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subject {
    /// The record being read, written or deleted
    pub record: &'static str,
    /// The reference a foreign key violation most likely concerns
    pub reference: &'static str,
}

/// Discriminant of [`FacilityError`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Conflict,
    NotFound,
    Failure,
}

impl FacilityError {
    pub fn not_found(target: impl Into<String>) -> Self {
        Self::NotFound {
            target: target.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Failure { .. } => ErrorKind::Failure,
        }
    }

    /// Translate a store error raised while operating on `subject`.
    pub fn from_db(err: DbErr, subject: Subject) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                let target = postgres_detail(&err)
                    .and_then(detail_key_columns)
                    .or_else(|| unique_target(&msg, subject.record));
                return Self::Conflict {
                    target: target.unwrap_or(msg),
                };
            }
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                return Self::NotFound {
                    target: foreign_key_target(&msg).unwrap_or_else(|| subject.reference.to_owned()),
                };
            }
            _ => {}
        }

        match err {
            DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => Self::not_found(subject.record),
            err => Self::Failure {
                message: err.to_string(),
            },
        }
    }

    /// Connection errors and errors raised inside the transaction body are
    /// translated alike.
    pub fn from_transaction(err: TransactionError<DbErr>, subject: Subject) -> Self {
        match err {
            TransactionError::Connection(err) | TransactionError::Transaction(err) => {
                Self::from_db(err, subject)
            }
        }
    }
}

/// The `DETAIL` line Postgres attaches to a constraint violation.
fn postgres_detail(err: &DbErr) -> Option<&str> {
    match err {
        DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(e)))
        | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(e))) => {
            e.try_downcast_ref::<PgDatabaseError>()?.detail()
        }
        _ => None,
    }
}

/// Columns of `Key (name)=(Freezer) already exists.`
pub(crate) fn detail_key_columns(detail: &str) -> Option<String> {
    let (_, rest) = detail.split_once("Key (")?;
    let (columns, _) = rest.split_once(")=(")?;
    let columns: Vec<&str> = columns
        .split(',')
        .map(|c| c.trim().trim_matches('"'))
        .filter(|c| !c.is_empty())
        .collect();
    (!columns.is_empty()).then(|| columns.join(", "))
}

/// Column named by a uniqueness violation message on a `table`.
///
/// SQLite: `UNIQUE constraint failed: facility.name`
/// Postgres: `duplicate key value violates unique constraint "facility_name_key"`
/// MySQL: `Duplicate entry 'x' for key 'facility.name'`
///
/// Postgres only names the constraint; a default `<table>_<column>_key` name
/// is reduced to its column, any other name is returned as is.
pub(crate) fn unique_target(msg: &str, table: &str) -> Option<String> {
    if let Some((_, columns)) = msg.split_once("constraint failed: ") {
        let columns: Vec<&str> = columns
            .split(',')
            .map(|c| c.trim())
            .map(|c| c.rsplit_once('.').map_or(c, |(_, col)| col))
            .filter(|c| !c.is_empty())
            .collect();
        return (!columns.is_empty()).then(|| columns.join(", "));
    }
    if let Some((_, key)) = msg.split_once("for key '") {
        let key = key.split('\'').next()?;
        let key = key.rsplit_once('.').map_or(key, |(_, col)| col);
        return (!key.is_empty()).then(|| key.to_owned());
    }
    let constraint = last_quoted(msg, '"')?;
    let column = constraint
        .strip_prefix(table)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|rest| rest.strip_suffix("_key"))
        .filter(|column| !column.is_empty())
        .map(str::to_owned);
    column.or(Some(constraint))
}

/// Constraint named by a foreign key violation message, if any.
///
/// SQLite reports a bare `FOREIGN KEY constraint failed`.
pub(crate) fn foreign_key_target(msg: &str) -> Option<String> {
    if let Some((_, rest)) = msg.split_once("CONSTRAINT `") {
        let name = rest.split('`').next()?;
        return (!name.is_empty()).then(|| name.to_owned());
    }
    last_quoted(msg, '"')
}

fn last_quoted(msg: &str, quote: char) -> Option<String> {
    let end = msg.rfind(quote)?;
    let start = msg[..end].rfind(quote)?;
    let inner = &msg[start + 1..end];
    (!inner.is_empty()).then(|| inner.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SUBJECT: Subject = Subject {
        record: "facility",
        reference: "supplierId",
    };

    #[test]
    fn unique_target_sqlite() {
        assert_eq!(
            unique_target("UNIQUE constraint failed: facility.name", "facility"),
            Some("name".to_owned())
        );
        assert_eq!(
            unique_target("UNIQUE constraint failed: facility.name, facility.unit", "facility"),
            Some("name, unit".to_owned())
        );
    }

    #[test]
    fn unique_target_postgres() {
        assert_eq!(
            unique_target(
                r#"duplicate key value violates unique constraint "facility_name_key""#,
                "facility"
            ),
            Some("name".to_owned())
        );
        assert_eq!(
            unique_target(
                r#"duplicate key value violates unique constraint "idx-facility-name""#,
                "facility"
            ),
            Some("idx-facility-name".to_owned())
        );
    }

    #[test]
    fn postgres_detail_names_the_columns() {
        assert_eq!(
            detail_key_columns("Key (name)=(Freezer) already exists."),
            Some("name".to_owned())
        );
        assert_eq!(
            detail_key_columns(r#"Key ("name", unit)=(Freezer, kg) already exists."#),
            Some("name, unit".to_owned())
        );
        assert_eq!(detail_key_columns("Failing row contains (f-1, null)."), None);
    }

    #[test]
    fn unique_target_mysql() {
        assert_eq!(
            unique_target("Duplicate entry 'Freezer' for key 'facility.name'", "facility"),
            Some("name".to_owned())
        );
    }

    #[test]
    fn unique_target_unparseable() {
        assert_eq!(unique_target("something went wrong", "facility"), None);
    }

    #[test]
    fn foreign_key_target_variants() {
        assert_eq!(
            foreign_key_target(
                r#"insert or update on table "facility" violates foreign key constraint "fk-facility-supplier_id""#
            ),
            Some("fk-facility-supplier_id".to_owned())
        );
        assert_eq!(
            foreign_key_target(
                "Cannot add or update a child row: a foreign key constraint fails (`db`.`facility`, CONSTRAINT `fk-facility-supplier_id` FOREIGN KEY (`supplier_id`) REFERENCES `supplier` (`id`))"
            ),
            Some("fk-facility-supplier_id".to_owned())
        );
        assert_eq!(foreign_key_target("FOREIGN KEY constraint failed"), None);
    }

    #[test]
    fn missing_records_are_not_found() {
        let err = FacilityError::from_db(DbErr::RecordNotFound("facility f-1".to_owned()), SUBJECT);
        assert_eq!(err, FacilityError::not_found("facility"));
        assert_eq!(err.to_string(), "`facility` not found");

        let err = FacilityError::from_db(DbErr::RecordNotUpdated, SUBJECT);
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn other_errors_keep_their_message() {
        let err = FacilityError::from_db(DbErr::Custom("pool timed out".to_owned()), SUBJECT);
        assert_eq!(err.kind(), ErrorKind::Failure);
        assert_eq!(err.to_string(), DbErr::Custom("pool timed out".to_owned()).to_string());
    }

    #[test]
    fn transaction_errors_are_flattened() {
        let err = FacilityError::from_transaction(
            TransactionError::Transaction(DbErr::RecordNotFound("facility".to_owned())),
            SUBJECT,
        );
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = FacilityError::from_transaction(
            TransactionError::Connection(DbErr::Custom("gone".to_owned())),
            SUBJECT,
        );
        assert_eq!(err.kind(), ErrorKind::Failure);
    }

    #[test]
    fn conflict_message() {
        let err = FacilityError::Conflict {
            target: "name".to_owned(),
        };
        assert_eq!(err.to_string(), "constraint violated: `name` already exists");
    }
}
