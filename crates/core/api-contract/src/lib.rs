//! 稳定的 DTO 与请求体契约。
//!
//! 成功响应直接返回 DTO 或 DTO 数组，不加外层封装；字段名统一 camelCase。
//! 错误响应为纯文本，不在此定义。

use serde::{Deserialize, Serialize};

/// 健康检查响应。
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthDto {
    pub ok: bool,
}

/// 楼宇返回结构。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingDto {
    pub id: i32,
    pub name: String,
    pub shortname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// 楼宇创建请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBuildingRequest {
    pub name: String,
    pub shortname: String,
    pub description: Option<String>,
}

/// 设备中嵌入的房间摘要（不含设备与配置）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: i32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_designation: Option<String>,
}

/// 配置评估器。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluatorDto {
    pub id: i32,
    pub evaluator_key: String,
    pub priority: i32,
}

/// 房间配置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomConfigurationDto {
    pub id: i32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub evaluators: Vec<EvaluatorDto>,
}

/// 房间返回结构。
///
/// 列表接口返回的房间 `devices` 为空数组。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub id: i32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_designation: Option<String>,
    pub building: BuildingDto,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_video_input: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_audio_input: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_video_output: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_audio_output: Option<i32>,
    #[serde(rename = "configurationID", default, skip_serializing_if = "Option::is_none")]
    pub configuration_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<RoomConfigurationDto>,
    pub devices: Vec<DeviceDto>,
}

/// 房间创建请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub name: String,
    /// 楼宇简称
    pub building: String,
    pub vlan: i32,
}

/// 设备端口。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortDto {
    pub source: String,
    pub name: String,
    pub destination: String,
    pub host: String,
}

/// 命令端点。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointDto {
    pub name: String,
    pub path: String,
}

/// 设备命令。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDto {
    pub name: String,
    pub endpoint: EndpointDto,
    pub microservice: String,
}

/// 设备返回结构。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDto {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub input: bool,
    pub output: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub building: BuildingDto,
    pub room: RoomSummaryDto,
    #[serde(rename = "type")]
    pub device_type: String,
    #[serde(rename = "class")]
    pub device_class: String,
    pub roles: Vec<String>,
    pub power_states: Vec<String>,
    pub ports: Vec<PortDto>,
    pub commands: Vec<CommandDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muted: Option<bool>,
}

/// 设备创建请求体。
///
/// 类型、类别、角色、电源状态均以名称给出。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeviceRequest {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub input: bool,
    #[serde(default)]
    pub output: bool,
    pub display_name: Option<String>,
    /// 楼宇简称
    pub building: String,
    /// 房间名
    pub room: String,
    #[serde(rename = "type")]
    pub device_type: String,
    #[serde(rename = "class")]
    pub device_class: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub power_states: Vec<String>,
}

/// 属性修改请求体（值一律为字符串，按列类型解析）。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAttributeRequest {
    pub attribute_name: String,
    pub attribute_value: String,
}

/// 端口配置（请求与响应共用）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortConfigurationDto {
    pub id: i32,
    #[serde(rename = "portID")]
    pub port_id: i32,
    #[serde(rename = "sourceDeviceID")]
    pub source_device_id: i32,
    #[serde(rename = "destinationDeviceID")]
    pub destination_device_id: i32,
    #[serde(rename = "hostDeviceID")]
    pub host_device_id: i32,
}

/// 定义表条目（角色、电源状态、类型、类别）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionDto {
    pub id: i32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// 请求计数快照。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
    pub requests: u64,
    pub client_errors: u64,
    pub server_errors: u64,
}
