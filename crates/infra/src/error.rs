//! Store error model and sqlx error mapping.
//!
//! | sqlx error | SQLSTATE | `StoreError` |
//! |------------|----------|--------------|
//! | Database (integrity constraint) | `23xxx` | `Constraint` |
//! | Database (other) | any other | `Query` |
//! | PoolTimedOut / PoolClosed / Io / Tls | n/a | `Connection` |
//! | ColumnDecode / Decode / ColumnNotFound / TypeNotFound | n/a | `Decode` |
//! | anything else | n/a | `Query` |

use thiserror::Error;

use catalog_core::DomainError;

/// Persistence failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("connection failed in {operation}: {message}")]
    Connection { operation: &'static str, message: String },

    #[error("constraint violated in {operation}: {message}")]
    Constraint { operation: &'static str, message: String },

    #[error("query failed in {operation}: {message}")]
    Query { operation: &'static str, message: String },

    #[error("row decode failed in {operation}: {message}")]
    Decode { operation: &'static str, message: String },

    #[error("row not found: {0}")]
    NotFound(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => DomainError::not_found(what),
            other => DomainError::store(other.to_string()),
        }
    }
}

pub(crate) fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let message = db_err.message().to_string();
            match db_err.code() {
                Some(code) if code.starts_with("23") => StoreError::Constraint { operation, message },
                _ => StoreError::Query { operation, message },
            }
        }
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreError::Connection {
            operation,
            message: err.to_string(),
        },
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::TypeNotFound { .. } => StoreError::Decode {
            operation,
            message: err.to_string(),
        },
        other => StoreError::Query {
            operation,
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_failures_are_connection_errors() {
        let err = map_sqlx_error("insert_product", sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Connection { operation: "insert_product", .. }));
    }

    #[test]
    fn missing_columns_are_decode_errors() {
        let err = map_sqlx_error("list_products", sqlx::Error::ColumnNotFound("price".into()));
        assert!(matches!(err, StoreError::Decode { .. }));
    }

    #[test]
    fn not_found_keeps_its_kind_in_the_domain() {
        let err: DomainError = StoreError::NotFound("product 3".into()).into();
        assert_eq!(err, DomainError::not_found("product 3"));
    }

    #[test]
    fn other_failures_become_domain_store_errors() {
        let err: DomainError = map_sqlx_error("get_product", sqlx::Error::RowNotFound).into();
        assert!(matches!(err, DomainError::Store(msg) if msg.contains("get_product")));
    }
}
