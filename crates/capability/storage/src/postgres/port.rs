//! Postgres 端口配置存储实现

use crate::error::StorageError;
use crate::models::PortConfigurationRecord;
use crate::traits::PortConfigurationStore;
use sqlx::{PgPool, Row};

pub struct PgPortConfigurationStore {
    pub pool: PgPool,
}

impl PgPortConfigurationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PortConfigurationStore for PgPortConfigurationStore {
    async fn list_port_configurations(
        &self,
    ) -> Result<Vec<PortConfigurationRecord>, StorageError> {
        let rows = sqlx::query(
            "select port_configuration_id, port_id, source_device_id, destination_device_id, host_device_id \
             from port_configurations order by port_configuration_id",
        )
        .fetch_all(&self.pool)
        .await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(PortConfigurationRecord {
                port_configuration_id: row.try_get("port_configuration_id")?,
                port_id: row.try_get("port_id")?,
                source_device_id: row.try_get("source_device_id")?,
                destination_device_id: row.try_get("destination_device_id")?,
                host_device_id: row.try_get("host_device_id")?,
            });
        }
        Ok(items)
    }

    async fn add_port_configuration(
        &self,
        record: PortConfigurationRecord,
    ) -> Result<PortConfigurationRecord, StorageError> {
        sqlx::query(
            "insert into port_configurations \
             (port_configuration_id, port_id, source_device_id, destination_device_id, host_device_id) \
             values ($1, $2, $3, $4, $5)",
        )
        .bind(record.port_configuration_id)
        .bind(record.port_id)
        .bind(record.source_device_id)
        .bind(record.destination_device_id)
        .bind(record.host_device_id)
        .execute(&self.pool)
        .await?;
        tracing::info!(
            port_configuration_id = record.port_configuration_id,
            "port configuration added"
        );
        Ok(record)
    }
}
