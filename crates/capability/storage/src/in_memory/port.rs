//! 内存端口配置存储

use crate::error::StorageError;
use crate::in_memory::tables::InMemoryConfigDb;
use crate::models::PortConfigurationRecord;
use crate::traits::PortConfigurationStore;

#[async_trait::async_trait]
impl PortConfigurationStore for InMemoryConfigDb {
    async fn list_port_configurations(
        &self,
    ) -> Result<Vec<PortConfigurationRecord>, StorageError> {
        let tables = self.read()?;
        let mut items = tables.port_configurations.clone();
        items.sort_by_key(|item| item.port_configuration_id);
        Ok(items)
    }

    async fn add_port_configuration(
        &self,
        record: PortConfigurationRecord,
    ) -> Result<PortConfigurationRecord, StorageError> {
        let mut tables = self.write()?;
        if tables
            .port_configurations
            .iter()
            .any(|item| item.port_configuration_id == record.port_configuration_id)
        {
            return Err(StorageError::integrity(format!(
                "port configuration {} already exists",
                record.port_configuration_id
            )));
        }
        if !tables.ports.iter().any(|port| port.port_id == record.port_id) {
            return Err(StorageError::integrity(format!(
                "port: {} does not exist",
                record.port_id
            )));
        }
        for device_id in [
            record.source_device_id,
            record.destination_device_id,
            record.host_device_id,
        ] {
            if tables.device(device_id).is_none() {
                return Err(StorageError::integrity(format!(
                    "device: {device_id} does not exist"
                )));
            }
        }
        tables.port_configurations.push(record.clone());
        tracing::info!(
            port_configuration_id = record.port_configuration_id,
            "port configuration added"
        );
        Ok(record)
    }
}
