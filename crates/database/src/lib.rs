use std::{env, error::Error};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use model::{
    device::Device,
    record::{MarkingRecord, TotalDistance},
    WithId,
};
use tracking::database::{Database, Result, TrackingRepo};
use utility::id::Id;

pub mod data_model;
pub mod queries;

pub struct DatabaseConnectionInfo {
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: u16,
    pub database: String,
}

impl DatabaseConnectionInfo {
    pub fn from_env() -> Option<Self> {
        let username = env::var("DATABASE_USER").ok()?;
        let password = env::var("DATABASE_PASSWORD").ok()?;
        let hostname = env::var("DATABASE_HOST").ok()?;
        let port: u16 = env::var("DATABASE_PORT").ok()?.parse().ok()?;
        let database = env::var("DATABASE_NAME").ok()?;
        Some(Self {
            username,
            password,
            hostname,
            port,
            database,
        })
    }

    pub(self) fn postgres_url(self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.hostname, self.port, self.database
        )
    }
}

#[derive(Clone)]
pub struct PgDatabase {
    connection: sqlx::PgPool,
}

pub struct PgDatabaseAutocommit {
    pool: sqlx::PgPool,
}

impl PgDatabase {
    /// Connects and brings the schema up to date.
    pub async fn connect(
        database_connection_info: DatabaseConnectionInfo,
    ) -> core::result::Result<Self, Box<dyn Error>> {
        let hostname = database_connection_info.hostname.clone();
        let url = database_connection_info.postgres_url();
        let pool = sqlx::postgres::PgPool::connect(&url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        log::info!("connected to database at {}", hostname);

        Ok(Self { connection: pool })
    }
}

impl Database for PgDatabase {
    type Autocommit = PgDatabaseAutocommit;

    fn auto(&self) -> Self::Autocommit {
        PgDatabaseAutocommit {
            pool: self.connection.clone(),
        }
    }
}

#[async_trait]
impl TrackingRepo for PgDatabaseAutocommit {
    async fn put_marking_record(
        &mut self,
        record: MarkingRecord,
    ) -> Result<WithId<MarkingRecord>> {
        queries::marking_record::put(&self.pool, record).await
    }

    async fn put_total_distance(
        &mut self,
        record: TotalDistance,
    ) -> Result<WithId<TotalDistance>> {
        queries::total_distance::put(&self.pool, record).await
    }

    async fn sum_total_distance(
        &mut self,
        device: &Id<Device>,
        since: Option<DateTime<Local>>,
    ) -> Result<Option<f64>> {
        queries::total_distance::sum_for_device(&self.pool, device, since).await
    }

    async fn total_distances_by_device(
        &mut self,
        since: Option<DateTime<Local>>,
    ) -> Result<Vec<(Id<Device>, f64)>> {
        queries::total_distance::sum_by_device(&self.pool, since).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_url_from_parts() {
        let info = DatabaseConnectionInfo {
            username: "tracker".to_owned(),
            password: "secret".to_owned(),
            hostname: "db".to_owned(),
            port: 5432,
            database: "tracking".to_owned(),
        };
        assert_eq!(
            info.postgres_url(),
            "postgres://tracker:secret@db:5432/tracking"
        );
    }
}
