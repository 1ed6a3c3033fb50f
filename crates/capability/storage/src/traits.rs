//! 存储接口 Trait 定义
//!
//! 定义所有资源存储的异步接口：
//! - BuildingStore：楼宇存储
//! - RoomStore：房间存储
//! - DeviceStore：设备存储（聚合组装 + 属性修改 + 创建）
//! - PortConfigurationStore：端口配置存储
//! - DefinitionStore：定义表查询
//!
//! 设计原则：
//! - 所有接口返回 StorageError
//! - 单条查询返回 `Option`，由调用方决定如何处理不存在
//! - 使用 async_trait 支持动态分发

use crate::error::StorageError;
use crate::models::{
    BuildingRecord, DefinitionRecord, DeviceAttributeInfo, DevicePowerStateRecord, DeviceRecord,
    NewBuilding, NewDevice, PortConfigurationRecord, RoomRecord,
};
use async_trait::async_trait;
use domain::{DeviceLocation, RoomLocation};

/// 楼宇存储接口
#[async_trait]
pub trait BuildingStore: Send + Sync {
    /// 列出所有楼宇
    async fn list_buildings(&self) -> Result<Vec<BuildingRecord>, StorageError>;

    async fn find_building_by_id(
        &self,
        building_id: i32,
    ) -> Result<Option<BuildingRecord>, StorageError>;

    async fn find_building_by_name(
        &self,
        name: &str,
    ) -> Result<Option<BuildingRecord>, StorageError>;

    async fn find_building_by_shortname(
        &self,
        shortname: &str,
    ) -> Result<Option<BuildingRecord>, StorageError>;

    /// 创建楼宇，插入后按名称回读
    ///
    /// 不做存在性预检，重名由数据库约束决定。
    async fn make_building(&self, building: NewBuilding) -> Result<BuildingRecord, StorageError>;
}

/// 房间存储接口
///
/// 列表查询返回不含设备的房间；单个房间查询返回完整聚合（设备 + 配置）。
#[async_trait]
pub trait RoomStore: Send + Sync {
    async fn list_rooms(&self) -> Result<Vec<RoomRecord>, StorageError>;

    async fn find_room_by_id(&self, room_id: i32) -> Result<Option<RoomRecord>, StorageError>;

    /// 按房间名查找（跨楼宇重名时取 ID 最小者）
    async fn find_room_by_name(&self, name: &str) -> Result<Option<RoomRecord>, StorageError>;

    /// 列出指定楼宇（简称）下的房间
    async fn list_rooms_by_building(
        &self,
        building_shortname: &str,
    ) -> Result<Vec<RoomRecord>, StorageError>;

    async fn find_room_by_location(
        &self,
        location: &RoomLocation,
    ) -> Result<Option<RoomRecord>, StorageError>;

    /// 创建房间
    ///
    /// 楼宇不存在时返回 NotFound 且不插入任何行；成功后按（楼宇简称, 房间名）回读完整聚合。
    async fn make_room(
        &self,
        name: &str,
        building_shortname: &str,
        vlan: i32,
    ) -> Result<RoomRecord, StorageError>;
}

/// 设备存储接口
#[async_trait]
pub trait DeviceStore: Send + Sync {
    async fn list_devices(&self) -> Result<Vec<DeviceRecord>, StorageError>;

    async fn find_device_by_id(&self, device_id: i32)
    -> Result<Option<DeviceRecord>, StorageError>;

    async fn find_device_by_location(
        &self,
        location: &DeviceLocation,
    ) -> Result<Option<DeviceRecord>, StorageError>;

    /// 房间内的所有设备
    async fn list_devices_by_room(
        &self,
        location: &RoomLocation,
    ) -> Result<Vec<DeviceRecord>, StorageError>;

    async fn list_devices_by_room_id(&self, room_id: i32)
    -> Result<Vec<DeviceRecord>, StorageError>;

    /// 同时位于房间 `room_id` 且关联角色定义 `role_id` 的设备
    async fn list_devices_by_room_id_and_role_id(
        &self,
        room_id: i32,
        role_id: i32,
    ) -> Result<Vec<DeviceRecord>, StorageError>;

    async fn list_devices_by_room_and_role(
        &self,
        location: &RoomLocation,
        role: &str,
    ) -> Result<Vec<DeviceRecord>, StorageError>;

    /// 按角色名、设备类别名、房间用途（production 等）查询
    async fn list_devices_by_role_and_class(
        &self,
        role: &str,
        device_class: &str,
        room_designation: &str,
    ) -> Result<Vec<DeviceRecord>, StorageError>;

    /// 修改单个白名单属性并返回回读后的设备
    ///
    /// 字段名或值校验失败时不会访问数据库；影响行数必须恰好为 1。
    async fn set_device_attribute(
        &self,
        info: DeviceAttributeInfo,
    ) -> Result<DeviceRecord, StorageError>;

    /// 按位置修改设备属性
    async fn set_device_attribute_by_location(
        &self,
        location: &DeviceLocation,
        attribute_name: &str,
        attribute_value: &str,
    ) -> Result<DeviceRecord, StorageError> {
        let device = self
            .find_device_by_location(location)
            .await?
            .ok_or_else(|| StorageError::not_found(format!("no device found at {location}")))?;
        self.set_device_attribute(DeviceAttributeInfo {
            device_id: device.device_id,
            attribute_name: attribute_name.to_string(),
            attribute_value: attribute_value.to_string(),
        })
        .await
    }

    /// 创建设备（含角色与电源状态关联），整体原子执行
    async fn add_device(&self, device: NewDevice) -> Result<DeviceRecord, StorageError>;
}

/// 端口配置存储接口
#[async_trait]
pub trait PortConfigurationStore: Send + Sync {
    async fn list_port_configurations(&self)
    -> Result<Vec<PortConfigurationRecord>, StorageError>;

    async fn add_port_configuration(
        &self,
        record: PortConfigurationRecord,
    ) -> Result<PortConfigurationRecord, StorageError>;
}

/// 定义表查询接口
#[async_trait]
pub trait DefinitionStore: Send + Sync {
    async fn list_role_definitions(&self) -> Result<Vec<DefinitionRecord>, StorageError>;

    async fn list_power_states(&self) -> Result<Vec<DefinitionRecord>, StorageError>;

    async fn list_device_types(&self) -> Result<Vec<DefinitionRecord>, StorageError>;

    async fn list_device_classes(&self) -> Result<Vec<DefinitionRecord>, StorageError>;

    async fn find_role_definition_by_name(
        &self,
        name: &str,
    ) -> Result<Option<DefinitionRecord>, StorageError>;

    async fn find_power_state_by_name(
        &self,
        name: &str,
    ) -> Result<Option<DefinitionRecord>, StorageError>;

    async fn find_device_type_by_name(
        &self,
        name: &str,
    ) -> Result<Option<DefinitionRecord>, StorageError>;

    async fn find_device_class_by_name(
        &self,
        name: &str,
    ) -> Result<Option<DefinitionRecord>, StorageError>;

    async fn list_device_power_states(&self)
    -> Result<Vec<DevicePowerStateRecord>, StorageError>;
}
