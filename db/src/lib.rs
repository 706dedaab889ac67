pub mod error;
pub mod models;
pub mod test_utils;

pub use error::ModelError;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, RuntimeErr};
use std::time::Duration;

/// Opens a connection to `dsn` and proves it is usable with a ping.
///
/// `timeout` bounds both pool acquisition and the ping. A failed ping closes the
/// connection before the error is returned.
pub async fn connect(dsn: &str, timeout: Duration) -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new(dsn.to_owned());
    opts.connect_timeout(timeout)
        .acquire_timeout(timeout)
        .sqlx_logging(false);

    let db = Database::connect(opts).await?;

    let ping = match tokio::time::timeout(timeout, db.ping()).await {
        Ok(result) => result,
        Err(_) => Err(DbErr::Conn(RuntimeErr::Internal(format!(
            "database did not answer ping within {timeout:?}"
        )))),
    };

    if let Err(err) = ping {
        let _ = db.close().await;
        return Err(err);
    }

    tracing::debug!(backend = ?db.get_database_backend(), "database ping succeeded");
    Ok(db)
}
