//! Postgres 定义表查询实现
//!
//! 角色、电源状态、设备类型、设备类别四张定义表结构相同，
//! 查询语句按表名常量生成。

use crate::error::StorageError;
use crate::models::{DefinitionRecord, DevicePowerStateRecord};
use crate::traits::DefinitionStore;
use sqlx::{PgPool, Row};

/// 定义表描述：表名 + 主键列
#[derive(Debug, Clone, Copy)]
struct DefinitionTable {
    table: &'static str,
    id_column: &'static str,
}

const ROLE_DEFINITIONS: DefinitionTable = DefinitionTable {
    table: "device_role_definitions",
    id_column: "device_role_definition_id",
};
const POWER_STATES: DefinitionTable = DefinitionTable {
    table: "power_states",
    id_column: "power_state_id",
};
const DEVICE_TYPES: DefinitionTable = DefinitionTable {
    table: "device_types",
    id_column: "device_type_id",
};
const DEVICE_CLASSES: DefinitionTable = DefinitionTable {
    table: "device_classes",
    id_column: "device_class_id",
};

pub struct PgDefinitionStore {
    pub pool: PgPool,
}

impl PgDefinitionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list(&self, def: DefinitionTable) -> Result<Vec<DefinitionRecord>, StorageError> {
        let sql = format!(
            "select {id} as id, name, description from {table} order by {id}",
            id = def.id_column,
            table = def.table
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(DefinitionRecord {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                description: row.try_get("description")?,
            });
        }
        Ok(items)
    }

    async fn find(
        &self,
        def: DefinitionTable,
        name: &str,
    ) -> Result<Option<DefinitionRecord>, StorageError> {
        let sql = format!(
            "select {id} as id, name, description from {table} where name = $1",
            id = def.id_column,
            table = def.table
        );
        let row = sqlx::query(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(DefinitionRecord {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
        }))
    }
}

#[async_trait::async_trait]
impl DefinitionStore for PgDefinitionStore {
    async fn list_role_definitions(&self) -> Result<Vec<DefinitionRecord>, StorageError> {
        self.list(ROLE_DEFINITIONS).await
    }

    async fn list_power_states(&self) -> Result<Vec<DefinitionRecord>, StorageError> {
        self.list(POWER_STATES).await
    }

    async fn list_device_types(&self) -> Result<Vec<DefinitionRecord>, StorageError> {
        self.list(DEVICE_TYPES).await
    }

    async fn list_device_classes(&self) -> Result<Vec<DefinitionRecord>, StorageError> {
        self.list(DEVICE_CLASSES).await
    }

    async fn find_role_definition_by_name(
        &self,
        name: &str,
    ) -> Result<Option<DefinitionRecord>, StorageError> {
        self.find(ROLE_DEFINITIONS, name).await
    }

    async fn find_power_state_by_name(
        &self,
        name: &str,
    ) -> Result<Option<DefinitionRecord>, StorageError> {
        self.find(POWER_STATES, name).await
    }

    async fn find_device_type_by_name(
        &self,
        name: &str,
    ) -> Result<Option<DefinitionRecord>, StorageError> {
        self.find(DEVICE_TYPES, name).await
    }

    async fn find_device_class_by_name(
        &self,
        name: &str,
    ) -> Result<Option<DefinitionRecord>, StorageError> {
        self.find(DEVICE_CLASSES, name).await
    }

    async fn list_device_power_states(
        &self,
    ) -> Result<Vec<DevicePowerStateRecord>, StorageError> {
        let rows = sqlx::query(
            "select device_power_state_id, device_id, power_state_id \
             from device_power_states order by device_power_state_id",
        )
        .fetch_all(&self.pool)
        .await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(DevicePowerStateRecord {
                device_power_state_id: row.try_get("device_power_state_id")?,
                device_id: row.try_get("device_id")?,
                power_state_id: row.try_get("power_state_id")?,
            });
        }
        Ok(items)
    }
}
