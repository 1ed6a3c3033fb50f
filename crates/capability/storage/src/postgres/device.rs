//! Postgres 设备存储实现
//!
//! 设计要点：
//! - 所有查询都通过 `assembler::fetch_devices` 组装完整聚合，区别只在过滤片段
//! - 属性修改先经过白名单校验，列名只取自 `DeviceAttribute::column`
//! - 设备创建在单个事务中完成，任一步失败整体回滚

use crate::error::StorageError;
use crate::models::{DeviceAttributeInfo, DeviceRecord, NewDevice};
use crate::postgres::assembler::fetch_devices;
use crate::postgres::filter::FilterFragment;
use crate::traits::DeviceStore;
use crate::validation::{ensure_defined, ensure_single_row, parse_attribute};
use domain::{AttributeTable, AttributeValue, DeviceLocation, RoomLocation};
use sqlx::{PgPool, Row};
use tracing::{info, warn};

pub struct PgDeviceStore {
    pub pool: PgPool,
}

impl PgDeviceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(
            database_url,
            crate::connection::DEFAULT_MAX_CONNECTIONS,
        )
        .await?;
        Ok(Self { pool })
    }

    async fn query(&self, filter: FilterFragment) -> Result<Vec<DeviceRecord>, StorageError> {
        fetch_devices(&self.pool, &filter).await
    }
}

/// 生成单列修改语句
///
/// audio_devices 每个设备至多一行，使用 upsert；设备不存在时影响 0 行。
fn attribute_statement(table: AttributeTable, column: &'static str) -> String {
    match table {
        AttributeTable::Devices => {
            format!("update devices set {column} = $1 where device_id = $2")
        }
        AttributeTable::AudioDevices => format!(
            "insert into audio_devices (device_id, {column}) \
             select devices.device_id, $1 from devices where devices.device_id = $2 \
             on conflict (device_id) do update set {column} = excluded.{column}"
        ),
    }
}

#[async_trait::async_trait]
impl DeviceStore for PgDeviceStore {
    async fn list_devices(&self) -> Result<Vec<DeviceRecord>, StorageError> {
        self.query(FilterFragment::all()).await
    }

    async fn find_device_by_id(
        &self,
        device_id: i32,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        info!(device_id, "getting device");
        let devices = self
            .query(FilterFragment::new("where devices.device_id = $1").int(device_id))
            .await?;
        Ok(devices.into_iter().next())
    }

    async fn find_device_by_location(
        &self,
        location: &DeviceLocation,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        let devices = self
            .query(
                FilterFragment::new(
                    "where buildings.shortname = $1 and rooms.name = $2 and devices.name = $3",
                )
                .text(location.building.as_str())
                .text(location.room.as_str())
                .text(location.device.as_str()),
            )
            .await?;
        Ok(devices.into_iter().next())
    }

    async fn list_devices_by_room(
        &self,
        location: &RoomLocation,
    ) -> Result<Vec<DeviceRecord>, StorageError> {
        info!(building = %location.building, room = %location.room, "getting devices in room");
        self.query(
            FilterFragment::new("where rooms.name = $1 and buildings.shortname = $2")
                .text(location.room.as_str())
                .text(location.building.as_str()),
        )
        .await
    }

    async fn list_devices_by_room_id(
        &self,
        room_id: i32,
    ) -> Result<Vec<DeviceRecord>, StorageError> {
        self.query(FilterFragment::new("where rooms.room_id = $1").int(room_id))
            .await
    }

    async fn list_devices_by_room_id_and_role_id(
        &self,
        room_id: i32,
        role_id: i32,
    ) -> Result<Vec<DeviceRecord>, StorageError> {
        self.query(
            FilterFragment::new(
                "where rooms.room_id = $1 \
                 and device_role_definitions.device_role_definition_id = $2",
            )
            .int(room_id)
            .int(role_id),
        )
        .await
    }

    async fn list_devices_by_room_and_role(
        &self,
        location: &RoomLocation,
        role: &str,
    ) -> Result<Vec<DeviceRecord>, StorageError> {
        self.query(
            FilterFragment::new(
                "where rooms.name = $1 and buildings.shortname = $2 \
                 and device_role_definitions.name = $3",
            )
            .text(location.room.as_str())
            .text(location.building.as_str())
            .text(role),
        )
        .await
    }

    async fn list_devices_by_role_and_class(
        &self,
        role: &str,
        device_class: &str,
        room_designation: &str,
    ) -> Result<Vec<DeviceRecord>, StorageError> {
        self.query(
            FilterFragment::new(
                "where device_role_definitions.name = $1 and device_classes.name = $2 \
                 and rooms.room_designation = $3",
            )
            .text(role)
            .text(device_class)
            .text(room_designation),
        )
        .await
    }

    async fn set_device_attribute(
        &self,
        info: DeviceAttributeInfo,
    ) -> Result<DeviceRecord, StorageError> {
        let update = parse_attribute(&info)?;
        info!(
            device_id = update.device_id,
            field = update.attribute.field(),
            "setting device attribute"
        );

        let sql = attribute_statement(update.attribute.table(), update.attribute.column());
        let query = sqlx::query(&sql);
        let query = match &update.value {
            AttributeValue::Text(value) => query.bind(value.as_str()),
            AttributeValue::Integer(value) => query.bind(*value),
            AttributeValue::Boolean(value) => query.bind(*value),
        };
        let result = query.bind(update.device_id).execute(&self.pool).await?;
        ensure_single_row(result.rows_affected())?;

        self.find_device_by_id(update.device_id)
            .await?
            .ok_or_else(|| {
                StorageError::not_found(format!("no devices found for id {}", update.device_id))
            })
    }

    async fn add_device(&self, device: NewDevice) -> Result<DeviceRecord, StorageError> {
        info!(
            device = %device.name,
            room = %device.room,
            building = %device.building,
            "adding device"
        );
        let mut tx = self.pool.begin().await?;

        let type_id: Option<i32> =
            sqlx::query_scalar("select device_type_id from device_types where name = $1")
                .bind(&device.device_type)
                .fetch_optional(&mut *tx)
                .await?;
        let type_id = ensure_defined(type_id, "device type", &device.device_type)?;

        let class_id: Option<i32> =
            sqlx::query_scalar("select device_class_id from device_classes where name = $1")
                .bind(&device.device_class)
                .fetch_optional(&mut *tx)
                .await?;
        let class_id = ensure_defined(class_id, "device class", &device.device_class)?;

        let room = sqlx::query(
            "select rooms.room_id, rooms.building_id from rooms \
             join buildings on buildings.building_id = rooms.building_id \
             where buildings.shortname = $1 and rooms.name = $2",
        )
        .bind(&device.building)
        .bind(&device.room)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(room) = room else {
            return Err(StorageError::not_found(format!(
                "could not find room {} in building {}",
                device.room, device.building
            )));
        };
        let room_id: i32 = room.try_get("room_id")?;
        let building_id: i32 = room.try_get("building_id")?;

        let exists: Option<i32> =
            sqlx::query_scalar("select 1 from devices where room_id = $1 and name = $2")
                .bind(room_id)
                .bind(&device.name)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_some() {
            warn!(device = %device.name, room_id, "device name already taken");
            return Err(StorageError::integrity(
                "device already exists in room, please choose a different name",
            ));
        }

        let device_id: i32 = sqlx::query_scalar(
            "insert into devices \
             (name, address, input, output, display_name, building_id, room_id, class_id, type_id) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9) returning device_id",
        )
        .bind(&device.name)
        .bind(&device.address)
        .bind(device.input)
        .bind(device.output)
        .bind(&device.display_name)
        .bind(building_id)
        .bind(room_id)
        .bind(class_id)
        .bind(type_id)
        .fetch_one(&mut *tx)
        .await?;

        for role in &device.roles {
            let role_id: Option<i32> = sqlx::query_scalar(
                "select device_role_definition_id from device_role_definitions where name = $1",
            )
            .bind(role)
            .fetch_optional(&mut *tx)
            .await?;
            let role_id = ensure_defined(role_id, "device role definition", role)?;
            sqlx::query(
                "insert into device_roles (device_id, device_role_definition_id) values ($1, $2)",
            )
            .bind(device_id)
            .bind(role_id)
            .execute(&mut *tx)
            .await?;
        }

        for power_state in &device.power_states {
            let power_state_id: Option<i32> =
                sqlx::query_scalar("select power_state_id from power_states where name = $1")
                    .bind(power_state)
                    .fetch_optional(&mut *tx)
                    .await?;
            let power_state_id = ensure_defined(power_state_id, "powerstate", power_state)?;
            sqlx::query(
                "insert into device_power_states (device_id, power_state_id) values ($1, $2)",
            )
            .bind(device_id)
            .bind(power_state_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!(device_id, "device created");

        self.find_device_by_id(device_id)
            .await?
            .ok_or_else(|| StorageError::not_found(format!("no devices found for id {device_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn devices_statement_updates_single_column() {
        let sql = attribute_statement(AttributeTable::Devices, "display_name");
        assert_eq!(sql, "update devices set display_name = $1 where device_id = $2");
    }

    #[test]
    fn audio_statement_only_targets_existing_devices() {
        let sql = attribute_statement(AttributeTable::AudioDevices, "muted");
        assert!(sql.starts_with("insert into audio_devices (device_id, muted)"));
        assert!(sql.contains("from devices where devices.device_id = $2"));
        assert!(sql.ends_with("do update set muted = excluded.muted"));
    }
}
