//! 内存定义表查询

use crate::error::StorageError;
use crate::in_memory::tables::{InMemoryConfigDb, Tables};
use crate::models::{DefinitionRecord, DevicePowerStateRecord};
use crate::traits::DefinitionStore;

impl InMemoryConfigDb {
    fn list_definitions(
        &self,
        table: impl Fn(&Tables) -> &Vec<DefinitionRecord>,
    ) -> Result<Vec<DefinitionRecord>, StorageError> {
        let tables = self.read()?;
        Ok(table(&tables).clone())
    }

    fn find_definition(
        &self,
        table: impl Fn(&Tables) -> &Vec<DefinitionRecord>,
        name: &str,
    ) -> Result<Option<DefinitionRecord>, StorageError> {
        let tables = self.read()?;
        Ok(Tables::definition_by_name(table(&tables), name).cloned())
    }
}

#[async_trait::async_trait]
impl DefinitionStore for InMemoryConfigDb {
    async fn list_role_definitions(&self) -> Result<Vec<DefinitionRecord>, StorageError> {
        self.list_definitions(|tables| &tables.role_definitions)
    }

    async fn list_power_states(&self) -> Result<Vec<DefinitionRecord>, StorageError> {
        self.list_definitions(|tables| &tables.power_states)
    }

    async fn list_device_types(&self) -> Result<Vec<DefinitionRecord>, StorageError> {
        self.list_definitions(|tables| &tables.device_types)
    }

    async fn list_device_classes(&self) -> Result<Vec<DefinitionRecord>, StorageError> {
        self.list_definitions(|tables| &tables.device_classes)
    }

    async fn find_role_definition_by_name(
        &self,
        name: &str,
    ) -> Result<Option<DefinitionRecord>, StorageError> {
        self.find_definition(|tables| &tables.role_definitions, name)
    }

    async fn find_power_state_by_name(
        &self,
        name: &str,
    ) -> Result<Option<DefinitionRecord>, StorageError> {
        self.find_definition(|tables| &tables.power_states, name)
    }

    async fn find_device_type_by_name(
        &self,
        name: &str,
    ) -> Result<Option<DefinitionRecord>, StorageError> {
        self.find_definition(|tables| &tables.device_types, name)
    }

    async fn find_device_class_by_name(
        &self,
        name: &str,
    ) -> Result<Option<DefinitionRecord>, StorageError> {
        self.find_definition(|tables| &tables.device_classes, name)
    }

    async fn list_device_power_states(
        &self,
    ) -> Result<Vec<DevicePowerStateRecord>, StorageError> {
        let tables = self.read()?;
        Ok(tables.device_power_states.clone())
    }
}
