//! 内存设备存储
//!
//! 设备聚合按联表语义组装：房间、楼宇、类别、类型任一缺失的设备不出现在结果中；
//! 角色过滤只决定设备是否入选，roles 字段始终是设备的全部角色。

use crate::error::StorageError;
use crate::in_memory::tables::{
    DeviceRoleRow, DeviceRow, InMemoryConfigDb, RoomRow, Tables, next_id,
};
use crate::models::{
    BuildingRecord, CommandRecord, DefinitionRecord, DeviceAttributeInfo, DevicePowerStateRecord,
    DeviceRecord, NewDevice, PortRecord, RoomSummary,
};
use crate::traits::DeviceStore;
use crate::validation::{ensure_defined, ensure_single_row, parse_attribute};
use domain::{AttributeValue, DeviceAttribute, DeviceAttributeUpdate, DeviceLocation, RoomLocation};
use tracing::{info, warn};

/// 设备行与其联表结果
pub(crate) struct JoinedDevice<'a> {
    pub row: &'a DeviceRow,
    pub room: &'a RoomRow,
    pub building: &'a BuildingRecord,
    pub device_class: &'a DefinitionRecord,
    pub device_type: &'a DefinitionRecord,
    pub roles: Vec<&'a DefinitionRecord>,
}

impl JoinedDevice<'_> {
    fn has_role(&self, keep: impl Fn(&DefinitionRecord) -> bool) -> bool {
        self.roles.iter().any(|role| keep(role))
    }
}

fn join<'a>(tables: &'a Tables, row: &'a DeviceRow) -> Option<JoinedDevice<'a>> {
    let room = tables.room(row.room_id)?;
    let building = tables.building(row.building_id)?;
    let device_class = tables
        .device_classes
        .iter()
        .find(|definition| definition.id == row.class_id)?;
    let device_type = tables
        .device_types
        .iter()
        .find(|definition| definition.id == row.type_id)?;
    let mut links: Vec<&DeviceRoleRow> = tables
        .device_roles
        .iter()
        .filter(|link| link.device_id == row.device_id)
        .collect();
    links.sort_by_key(|link| link.device_role_id);
    let roles = links
        .into_iter()
        .filter_map(|link| {
            tables
                .role_definitions
                .iter()
                .find(|definition| definition.id == link.device_role_definition_id)
        })
        .collect();
    Some(JoinedDevice {
        row,
        room,
        building,
        device_class,
        device_type,
        roles,
    })
}

fn commands(tables: &Tables, joined: &JoinedDevice<'_>) -> Vec<CommandRecord> {
    let mut mappings: Vec<_> = tables
        .command_mappings
        .iter()
        .filter(|mapping| mapping.device_type_id == joined.device_type.id)
        .collect();
    mappings.sort_by_key(|mapping| mapping.mapping_id);
    mappings
        .into_iter()
        .map(|mapping| CommandRecord {
            name: mapping.command.clone(),
            endpoint_name: mapping.endpoint_name.clone(),
            endpoint_path: mapping.endpoint_path.clone(),
            microservice: mapping.microservice.clone(),
        })
        .collect()
}

/// 以该设备为 host 的端口配置，端点设备或端口缺失的配置被丢弃
fn ports(tables: &Tables, device_id: i32) -> Vec<PortRecord> {
    let mut configurations: Vec<_> = tables
        .port_configurations
        .iter()
        .filter(|configuration| configuration.host_device_id == device_id)
        .collect();
    configurations.sort_by_key(|configuration| configuration.port_configuration_id);
    configurations
        .into_iter()
        .filter_map(|configuration| {
            let port = tables
                .ports
                .iter()
                .find(|port| port.port_id == configuration.port_id)?;
            Some(PortRecord {
                source: tables.device(configuration.source_device_id)?.name.clone(),
                name: port.name.clone(),
                destination: tables.device(configuration.destination_device_id)?.name.clone(),
                host: tables.device(configuration.host_device_id)?.name.clone(),
            })
        })
        .collect()
}

fn power_states(tables: &Tables, device_id: i32) -> Vec<String> {
    let mut links: Vec<&DevicePowerStateRecord> = tables
        .device_power_states
        .iter()
        .filter(|link| link.device_id == device_id)
        .collect();
    links.sort_by_key(|link| link.device_power_state_id);
    links
        .into_iter()
        .filter_map(|link| {
            tables
                .power_states
                .iter()
                .find(|state| state.id == link.power_state_id)
                .map(|state| state.name.clone())
        })
        .collect()
}

fn device_record(tables: &Tables, joined: &JoinedDevice<'_>) -> DeviceRecord {
    let row = joined.row;
    let audio = tables.audio_devices.get(&row.device_id);
    DeviceRecord {
        device_id: row.device_id,
        name: row.name.clone(),
        address: row.address.clone(),
        input: row.input,
        output: row.output,
        display_name: row.display_name.clone(),
        building: joined.building.clone(),
        room: RoomSummary {
            room_id: joined.room.room_id,
            name: joined.room.name.clone(),
            description: joined.room.description.clone(),
            room_designation: joined.room.room_designation.clone(),
        },
        device_type: joined.device_type.name.clone(),
        device_class: joined.device_class.name.clone(),
        roles: joined.roles.iter().map(|role| role.name.clone()).collect(),
        power_states: power_states(tables, row.device_id),
        ports: ports(tables, row.device_id),
        commands: commands(tables, joined),
        volume: audio.and_then(|audio| audio.volume),
        muted: audio.and_then(|audio| audio.muted),
    }
}

/// 组装满足条件的设备聚合，按 device_id 升序
pub(crate) fn assemble_devices(
    tables: &Tables,
    keep: impl Fn(&JoinedDevice<'_>) -> bool,
) -> Vec<DeviceRecord> {
    let mut devices: Vec<DeviceRecord> = tables
        .devices
        .iter()
        .filter_map(|row| join(tables, row))
        .filter(|joined| keep(joined))
        .map(|joined| device_record(tables, &joined))
        .collect();
    devices.sort_by_key(|device| device.device_id);
    devices
}

/// 外键列取值必须指向已存在的行
fn check_reference(tables: &Tables, update: &DeviceAttributeUpdate) -> Result<(), StorageError> {
    let AttributeValue::Integer(id) = &update.value else {
        return Ok(());
    };
    let id = *id;
    let found = match update.attribute {
        DeviceAttribute::BuildingId => tables.building(id).is_some(),
        DeviceAttribute::RoomId => tables.room(id).is_some(),
        DeviceAttribute::ClassId => tables.device_classes.iter().any(|row| row.id == id),
        DeviceAttribute::TypeId => tables.device_types.iter().any(|row| row.id == id),
        _ => true,
    };
    if found {
        Ok(())
    } else {
        Err(StorageError::integrity(format!(
            "{}: {id} does not exist",
            update.attribute.column()
        )))
    }
}

/// 执行单列修改，返回影响行数
fn apply_update(tables: &mut Tables, update: &DeviceAttributeUpdate) -> Result<u64, StorageError> {
    if tables.device(update.device_id).is_none() {
        return Ok(0);
    }
    check_reference(tables, update)?;

    match (update.attribute, &update.value) {
        (DeviceAttribute::Volume, AttributeValue::Integer(value)) => {
            tables
                .audio_devices
                .entry(update.device_id)
                .or_default()
                .volume = Some(*value);
            return Ok(1);
        }
        (DeviceAttribute::Muted, AttributeValue::Boolean(value)) => {
            tables
                .audio_devices
                .entry(update.device_id)
                .or_default()
                .muted = Some(*value);
            return Ok(1);
        }
        _ => {}
    }

    let Some(row) = tables
        .devices
        .iter_mut()
        .find(|row| row.device_id == update.device_id)
    else {
        return Ok(0);
    };
    match (update.attribute, &update.value) {
        (DeviceAttribute::Address, AttributeValue::Text(value)) => row.address = value.clone(),
        (DeviceAttribute::DisplayName, AttributeValue::Text(value)) => {
            row.display_name = Some(value.clone())
        }
        (DeviceAttribute::Input, AttributeValue::Boolean(value)) => row.input = *value,
        (DeviceAttribute::Output, AttributeValue::Boolean(value)) => row.output = *value,
        (DeviceAttribute::BuildingId, AttributeValue::Integer(value)) => row.building_id = *value,
        (DeviceAttribute::RoomId, AttributeValue::Integer(value)) => row.room_id = *value,
        (DeviceAttribute::ClassId, AttributeValue::Integer(value)) => row.class_id = *value,
        (DeviceAttribute::TypeId, AttributeValue::Integer(value)) => row.type_id = *value,
        (attribute, value) => {
            return Err(StorageError::Internal(format!(
                "value kind {:?} does not match column {}",
                value.kind(),
                attribute.column()
            )));
        }
    }
    Ok(1)
}

/// 解析并校验全部引用，返回待插入的设备行与关联 ID
///
/// 只读访问，任何失败都不会改动表。
fn resolve_new_device(
    tables: &Tables,
    device: &NewDevice,
) -> Result<(DeviceRow, Vec<i32>, Vec<i32>), StorageError> {
    let type_id = ensure_defined(
        Tables::definition_by_name(&tables.device_types, &device.device_type).map(|row| row.id),
        "device type",
        &device.device_type,
    )?;
    let class_id = ensure_defined(
        Tables::definition_by_name(&tables.device_classes, &device.device_class).map(|row| row.id),
        "device class",
        &device.device_class,
    )?;
    let room = tables.room_at(&device.building, &device.room).ok_or_else(|| {
        StorageError::not_found(format!(
            "could not find room {} in building {}",
            device.room, device.building
        ))
    })?;
    if tables
        .devices
        .iter()
        .any(|existing| existing.room_id == room.room_id && existing.name == device.name)
    {
        warn!(device = %device.name, room_id = room.room_id, "device name already taken");
        return Err(StorageError::integrity(
            "device already exists in room, please choose a different name",
        ));
    }

    let mut role_ids = Vec::with_capacity(device.roles.len());
    for role in &device.roles {
        role_ids.push(ensure_defined(
            Tables::definition_by_name(&tables.role_definitions, role).map(|row| row.id),
            "device role definition",
            role,
        )?);
    }
    let mut power_state_ids = Vec::with_capacity(device.power_states.len());
    for power_state in &device.power_states {
        power_state_ids.push(ensure_defined(
            Tables::definition_by_name(&tables.power_states, power_state).map(|row| row.id),
            "powerstate",
            power_state,
        )?);
    }

    let row = DeviceRow {
        device_id: next_id(&tables.devices, |row| row.device_id),
        name: device.name.clone(),
        address: device.address.clone(),
        input: device.input,
        output: device.output,
        display_name: device.display_name.clone(),
        building_id: room.building_id,
        room_id: room.room_id,
        class_id,
        type_id,
    };
    Ok((row, role_ids, power_state_ids))
}

impl InMemoryConfigDb {
    fn query(&self, keep: impl Fn(&JoinedDevice<'_>) -> bool) -> Result<Vec<DeviceRecord>, StorageError> {
        let tables = self.read()?;
        Ok(assemble_devices(&tables, keep))
    }
}

#[async_trait::async_trait]
impl DeviceStore for InMemoryConfigDb {
    async fn list_devices(&self) -> Result<Vec<DeviceRecord>, StorageError> {
        self.query(|_| true)
    }

    async fn find_device_by_id(
        &self,
        device_id: i32,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        let devices = self.query(|joined| joined.row.device_id == device_id)?;
        Ok(devices.into_iter().next())
    }

    async fn find_device_by_location(
        &self,
        location: &DeviceLocation,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        let devices = self.query(|joined| {
            joined.building.shortname == location.building
                && joined.room.name == location.room
                && joined.row.name == location.device
        })?;
        Ok(devices.into_iter().next())
    }

    async fn list_devices_by_room(
        &self,
        location: &RoomLocation,
    ) -> Result<Vec<DeviceRecord>, StorageError> {
        self.query(|joined| {
            joined.room.name == location.room && joined.building.shortname == location.building
        })
    }

    async fn list_devices_by_room_id(
        &self,
        room_id: i32,
    ) -> Result<Vec<DeviceRecord>, StorageError> {
        self.query(|joined| joined.room.room_id == room_id)
    }

    async fn list_devices_by_room_id_and_role_id(
        &self,
        room_id: i32,
        role_id: i32,
    ) -> Result<Vec<DeviceRecord>, StorageError> {
        self.query(|joined| {
            joined.room.room_id == room_id && joined.has_role(|role| role.id == role_id)
        })
    }

    async fn list_devices_by_room_and_role(
        &self,
        location: &RoomLocation,
        role: &str,
    ) -> Result<Vec<DeviceRecord>, StorageError> {
        self.query(|joined| {
            joined.room.name == location.room
                && joined.building.shortname == location.building
                && joined.has_role(|definition| definition.name == role)
        })
    }

    async fn list_devices_by_role_and_class(
        &self,
        role: &str,
        device_class: &str,
        room_designation: &str,
    ) -> Result<Vec<DeviceRecord>, StorageError> {
        self.query(|joined| {
            joined.has_role(|definition| definition.name == role)
                && joined.device_class.name == device_class
                && joined.room.room_designation.as_deref() == Some(room_designation)
        })
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

        let mut tables = self.write()?;
        let affected = apply_update(&mut tables, &update)?;
        ensure_single_row(affected)?;

        assemble_devices(&tables, |joined| joined.row.device_id == update.device_id)
            .into_iter()
            .next()
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
        let mut tables = self.write()?;
        let (row, role_ids, power_state_ids) = resolve_new_device(&tables, &device)?;
        let device_id = row.device_id;
        tables.devices.push(row);

        for role_id in role_ids {
            let device_role_id = next_id(&tables.device_roles, |link| link.device_role_id);
            tables.device_roles.push(DeviceRoleRow {
                device_role_id,
                device_id,
                device_role_definition_id: role_id,
            });
        }
        for power_state_id in power_state_ids {
            let device_power_state_id =
                next_id(&tables.device_power_states, |link| link.device_power_state_id);
            tables.device_power_states.push(DevicePowerStateRecord {
                device_power_state_id,
                device_id,
                power_state_id,
            });
        }
        info!(device_id, "device created");

        assemble_devices(&tables, |joined| joined.row.device_id == device_id)
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::not_found(format!("no devices found for id {device_id}")))
    }
}
