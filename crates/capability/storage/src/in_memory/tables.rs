//! 内存表结构
//!
//! 以普通 Vec 模拟 Postgres 中的各张表，所有存储接口共用同一份数据，
//! 由一把 RwLock 保护。多步写操作在一次写锁内先完成全部校验再落数据。

use crate::error::StorageError;
use crate::models::{
    BuildingRecord, DefinitionRecord, DevicePowerStateRecord, PortConfigurationRecord,
};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone)]
pub(crate) struct RoomRow {
    pub room_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub room_designation: Option<String>,
    pub building_id: i32,
    pub vlan: Option<i32>,
    pub current_video_input: Option<i32>,
    pub current_audio_input: Option<i32>,
    pub current_video_output: Option<i32>,
    pub current_audio_output: Option<i32>,
    pub configuration_id: Option<i32>,
}

#[derive(Debug, Clone)]
pub(crate) struct DeviceRow {
    pub device_id: i32,
    pub name: String,
    pub address: String,
    pub input: bool,
    pub output: bool,
    pub display_name: Option<String>,
    pub building_id: i32,
    pub room_id: i32,
    pub class_id: i32,
    pub type_id: i32,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct AudioRow {
    pub volume: Option<i32>,
    pub muted: Option<bool>,
}

#[derive(Debug, Clone)]
pub(crate) struct DeviceRoleRow {
    pub device_role_id: i32,
    pub device_id: i32,
    pub device_role_definition_id: i32,
}

#[derive(Debug, Clone)]
pub(crate) struct PortRow {
    pub port_id: i32,
    pub name: String,
}

/// device_type_commands 联同 commands / endpoints / microservices 展开后的行
#[derive(Debug, Clone)]
pub(crate) struct CommandMappingRow {
    pub mapping_id: i32,
    pub device_type_id: i32,
    pub command: String,
    pub endpoint_name: String,
    pub endpoint_path: String,
    pub microservice: String,
}

#[derive(Debug, Clone)]
pub(crate) struct ConfigurationRow {
    pub configuration_id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct EvaluatorRow {
    pub evaluator_id: i32,
    pub configuration_id: i32,
    pub evaluator_key: String,
    pub priority: i32,
}

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub buildings: Vec<BuildingRecord>,
    pub rooms: Vec<RoomRow>,
    pub devices: Vec<DeviceRow>,
    pub audio_devices: HashMap<i32, AudioRow>,
    pub device_classes: Vec<DefinitionRecord>,
    pub device_types: Vec<DefinitionRecord>,
    pub role_definitions: Vec<DefinitionRecord>,
    pub power_states: Vec<DefinitionRecord>,
    pub device_roles: Vec<DeviceRoleRow>,
    pub device_power_states: Vec<DevicePowerStateRecord>,
    pub ports: Vec<PortRow>,
    pub port_configurations: Vec<PortConfigurationRecord>,
    pub command_mappings: Vec<CommandMappingRow>,
    pub configurations: Vec<ConfigurationRow>,
    pub evaluators: Vec<EvaluatorRow>,
}

/// 下一个自增 ID
pub(crate) fn next_id<T>(rows: &[T], id: impl Fn(&T) -> i32) -> i32 {
    rows.iter().map(id).max().unwrap_or(0) + 1
}

impl Tables {
    pub fn building(&self, building_id: i32) -> Option<&BuildingRecord> {
        self.buildings
            .iter()
            .find(|building| building.building_id == building_id)
    }

    pub fn room(&self, room_id: i32) -> Option<&RoomRow> {
        self.rooms.iter().find(|room| room.room_id == room_id)
    }

    pub fn device(&self, device_id: i32) -> Option<&DeviceRow> {
        self.devices
            .iter()
            .find(|device| device.device_id == device_id)
    }

    /// 按楼宇简称 + 房间名查找房间
    pub fn room_at(&self, building_shortname: &str, room_name: &str) -> Option<&RoomRow> {
        self.rooms.iter().find(|room| {
            room.name == room_name
                && self
                    .building(room.building_id)
                    .is_some_and(|building| building.shortname == building_shortname)
        })
    }

    pub fn definition_by_name<'a>(
        list: &'a [DefinitionRecord],
        name: &str,
    ) -> Option<&'a DefinitionRecord> {
        list.iter().find(|definition| definition.name == name)
    }
}

/// 内存配置库
///
/// 同时实现 BuildingStore、RoomStore、DeviceStore、PortConfigurationStore、DefinitionStore。
/// 仅用于测试和本地演示。
#[derive(Debug, Default)]
pub struct InMemoryConfigDb {
    tables: RwLock<Tables>,
}

impl InMemoryConfigDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// 内置常用定义
    ///
    /// - 设备类别：display, audio, video, input
    /// - 设备类型：tv, dsp, switcher, microphone
    /// - 角色：AudioIn, AudioOut, VideoIn, VideoOut, Microphone, VideoSwitcher
    /// - 电源状态：on, standby, off
    pub fn with_default_definitions() -> Self {
        let mut tables = Tables::default();
        for name in ["display", "audio", "video", "input"] {
            push_definition(&mut tables.device_classes, name);
        }
        for name in ["tv", "dsp", "switcher", "microphone"] {
            push_definition(&mut tables.device_types, name);
        }
        for name in [
            "AudioIn",
            "AudioOut",
            "VideoIn",
            "VideoOut",
            "Microphone",
            "VideoSwitcher",
        ] {
            push_definition(&mut tables.role_definitions, name);
        }
        for name in ["on", "standby", "off"] {
            push_definition(&mut tables.power_states, name);
        }
        Self {
            tables: RwLock::new(tables),
        }
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StorageError> {
        self.tables.read().map_err(|_| StorageError::lock_failed())
    }

    pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StorageError> {
        self.tables.write().map_err(|_| StorageError::lock_failed())
    }

    pub fn add_device_class(&self, name: &str) -> Result<i32, StorageError> {
        let mut tables = self.write()?;
        insert_definition(&mut tables.device_classes, "device class", name)
    }

    pub fn add_device_type(&self, name: &str) -> Result<i32, StorageError> {
        let mut tables = self.write()?;
        insert_definition(&mut tables.device_types, "device type", name)
    }

    pub fn add_role_definition(&self, name: &str) -> Result<i32, StorageError> {
        let mut tables = self.write()?;
        insert_definition(&mut tables.role_definitions, "device role definition", name)
    }

    pub fn add_power_state(&self, name: &str) -> Result<i32, StorageError> {
        let mut tables = self.write()?;
        insert_definition(&mut tables.power_states, "powerstate", name)
    }

    /// 为设备类型登记一条命令映射（命令 → 端点 → 微服务）
    pub fn add_command(
        &self,
        device_type: &str,
        command: &str,
        endpoint_name: &str,
        endpoint_path: &str,
        microservice: &str,
    ) -> Result<i32, StorageError> {
        let mut tables = self.write()?;
        let device_type_id = Tables::definition_by_name(&tables.device_types, device_type)
            .map(|definition| definition.id)
            .ok_or_else(|| {
                StorageError::not_found(format!("device type {device_type} does not exist"))
            })?;
        let mapping_id = next_id(&tables.command_mappings, |row| row.mapping_id);
        tables.command_mappings.push(CommandMappingRow {
            mapping_id,
            device_type_id,
            command: command.to_string(),
            endpoint_name: endpoint_name.to_string(),
            endpoint_path: endpoint_path.to_string(),
            microservice: microservice.to_string(),
        });
        Ok(mapping_id)
    }

    pub fn add_port(&self, name: &str) -> Result<i32, StorageError> {
        let mut tables = self.write()?;
        let port_id = next_id(&tables.ports, |row| row.port_id);
        tables.ports.push(PortRow {
            port_id,
            name: name.to_string(),
        });
        Ok(port_id)
    }

    /// 新建房间配置，evaluators 为（key, priority）列表
    pub fn add_room_configuration(
        &self,
        name: &str,
        evaluators: &[(&str, i32)],
    ) -> Result<i32, StorageError> {
        let mut tables = self.write()?;
        let configuration_id = next_id(&tables.configurations, |row| row.configuration_id);
        tables.configurations.push(ConfigurationRow {
            configuration_id,
            name: name.to_string(),
            description: None,
        });
        for (key, priority) in evaluators {
            let evaluator_id = next_id(&tables.evaluators, |row| row.evaluator_id);
            tables.evaluators.push(EvaluatorRow {
                evaluator_id,
                configuration_id,
                evaluator_key: (*key).to_string(),
                priority: *priority,
            });
        }
        Ok(configuration_id)
    }

    pub fn set_room_configuration(
        &self,
        room_id: i32,
        configuration_id: i32,
    ) -> Result<(), StorageError> {
        let mut tables = self.write()?;
        let room = tables
            .rooms
            .iter_mut()
            .find(|room| room.room_id == room_id)
            .ok_or_else(|| StorageError::not_found(format!("no room found for id {room_id}")))?;
        room.configuration_id = Some(configuration_id);
        Ok(())
    }

    pub fn set_room_designation(&self, room_id: i32, designation: &str) -> Result<(), StorageError> {
        let mut tables = self.write()?;
        let room = tables
            .rooms
            .iter_mut()
            .find(|room| room.room_id == room_id)
            .ok_or_else(|| StorageError::not_found(format!("no room found for id {room_id}")))?;
        room.room_designation = Some(designation.to_string());
        Ok(())
    }

    pub fn device_count(&self) -> usize {
        self.read().map(|tables| tables.devices.len()).unwrap_or_default()
    }

    pub fn room_count(&self) -> usize {
        self.read().map(|tables| tables.rooms.len()).unwrap_or_default()
    }
}

fn push_definition(list: &mut Vec<DefinitionRecord>, name: &str) -> i32 {
    let id = next_id(list, |row| row.id);
    list.push(DefinitionRecord {
        id,
        name: name.to_string(),
        description: None,
    });
    id
}

fn insert_definition(
    list: &mut Vec<DefinitionRecord>,
    what: &str,
    name: &str,
) -> Result<i32, StorageError> {
    if Tables::definition_by_name(list, name).is_some() {
        return Err(StorageError::integrity(format!("{what}: {name} already exists")));
    }
    Ok(push_definition(list, name))
}
