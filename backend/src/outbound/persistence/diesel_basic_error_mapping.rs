//! Shared Diesel error mapping for the blog repositories.

use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

fn log_diesel_error(error: &diesel::result::Error) {
    use diesel::result::Error as DieselError;

    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }
}

/// Map common Diesel error variants into query/connection constructors.
///
/// `NotFound` and query-builder failures map to query errors; closed
/// connections map to connection errors.
pub fn map_basic_diesel_error<E, Q, C>(error: diesel::result::Error, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    log_diesel_error(&error);

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

/// Like [`map_basic_diesel_error`], but reports unique violations through
/// `conflict` with the violated constraint name.
pub fn map_unique_diesel_error<E, Q, C, U>(
    error: diesel::result::Error,
    query: Q,
    connection: C,
    conflict: U,
) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
    U: FnOnce(String) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        log_diesel_error(&error);
        let constraint = info.constraint_name().unwrap_or("unique constraint");
        return conflict(constraint.to_owned());
    }
    map_basic_diesel_error(error, query, connection)
}

#[cfg(test)]
mod tests {
    //! Mapping coverage using a minimal error enum.
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum Mapped {
        Query(String),
        Connection(String),
        Conflict(String),
    }

    fn query(message: &'static str) -> Mapped {
        Mapped::Query(message.to_owned())
    }

    fn connection(message: &'static str) -> Mapped {
        Mapped::Connection(message.to_owned())
    }

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let mapped = map_basic_pool_error(PoolError::checkout("timed out"), Mapped::Connection);
        assert_eq!(mapped, Mapped::Connection("timed out".to_owned()));
    }

    #[rstest]
    fn closed_connections_are_connection_errors() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("closed".to_owned()),
        );
        assert_eq!(
            map_basic_diesel_error(error, query, connection),
            Mapped::Connection("database connection error".to_owned())
        );
    }

    #[rstest]
    fn unique_violations_are_conflicts() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key".to_owned()),
        );
        assert_eq!(
            map_unique_diesel_error(error, query, connection, Mapped::Conflict),
            Mapped::Conflict("unique constraint".to_owned())
        );
    }

    #[rstest]
    fn not_found_is_a_query_error() {
        assert_eq!(
            map_unique_diesel_error(DieselError::NotFound, query, connection, Mapped::Conflict),
            Mapped::Query("record not found".to_owned())
        );
    }
}
