//! 数据模型
//!
//! 定义所有存储相关的数据模型：
//! - 楼宇：BuildingRecord, NewBuilding
//! - 房间：RoomRecord（完整聚合）, RoomSummary（嵌入设备中的摘要）, RoomConfigurationRecord
//! - 设备：DeviceRecord（完整聚合）, NewDevice, DeviceAttributeInfo
//! - 设备子集合：PortRecord, CommandRecord
//! - 端口配置：PortConfigurationRecord
//! - 定义表：DefinitionRecord, DevicePowerStateRecord

/// 楼宇记录。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingRecord {
    pub building_id: i32,
    pub name: String,
    pub shortname: String,
    pub description: Option<String>,
}

/// 楼宇创建输入。
#[derive(Debug, Clone)]
pub struct NewBuilding {
    pub name: String,
    pub shortname: String,
    pub description: Option<String>,
}

/// 房间摘要，嵌入在设备聚合中。
///
/// 不含设备列表与配置，设备聚合序列化时不会产生循环嵌套。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub room_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub room_designation: Option<String>,
}

/// 房间聚合。
///
/// 设备不存储在房间行上，而是由设备表反查得出。
/// 列表查询返回的房间 `devices` 为空、`configuration` 为 None。
#[derive(Debug, Clone)]
pub struct RoomRecord {
    pub room_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub room_designation: Option<String>,
    pub building: BuildingRecord,
    pub vlan: Option<i32>,
    pub current_video_input: Option<i32>,
    pub current_audio_input: Option<i32>,
    pub current_video_output: Option<i32>,
    pub current_audio_output: Option<i32>,
    pub configuration_id: Option<i32>,
    pub configuration: Option<RoomConfigurationRecord>,
    pub devices: Vec<DeviceRecord>,
}

/// 房间配置（含评估器列表）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomConfigurationRecord {
    pub configuration_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub evaluators: Vec<ConfigurationEvaluatorRecord>,
}

/// 配置评估器，按 priority 升序排列。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationEvaluatorRecord {
    pub evaluator_id: i32,
    pub evaluator_key: String,
    pub priority: i32,
}

/// 设备聚合。
///
/// 由 devices、rooms、buildings、device_classes、device_types 联表得到标量字段，
/// 再按设备分别查询命令、端口、电源状态和角色。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    pub device_id: i32,
    pub name: String,
    pub address: String,
    pub input: bool,
    pub output: bool,
    pub display_name: Option<String>,
    pub building: BuildingRecord,
    pub room: RoomSummary,
    pub device_type: String,
    pub device_class: String,
    pub roles: Vec<String>,
    pub power_states: Vec<String>,
    pub ports: Vec<PortRecord>,
    pub commands: Vec<CommandRecord>,
    /// 音频状态（无 audio_devices 行时为 None）
    pub volume: Option<i32>,
    pub muted: Option<bool>,
}

/// 设备创建输入。
///
/// 类型、类别、角色、电源状态均按名称给出，创建时解析为 ID。
#[derive(Debug, Clone)]
pub struct NewDevice {
    pub name: String,
    pub address: String,
    pub input: bool,
    pub output: bool,
    pub display_name: Option<String>,
    /// 楼宇简称
    pub building: String,
    /// 房间名
    pub room: String,
    pub device_type: String,
    pub device_class: String,
    pub roles: Vec<String>,
    pub power_states: Vec<String>,
}

/// 属性修改输入（未校验的原始字段名与字符串值）。
#[derive(Debug, Clone)]
pub struct DeviceAttributeInfo {
    pub device_id: i32,
    pub attribute_name: String,
    pub attribute_value: String,
}

/// 设备端口（以设备名表示的信号路径）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortRecord {
    pub source: String,
    pub name: String,
    pub destination: String,
    pub host: String,
}

/// 设备命令，解析到具体的端点和微服务地址。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    pub name: String,
    pub endpoint_name: String,
    pub endpoint_path: String,
    pub microservice: String,
}

/// 端口配置记录。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortConfigurationRecord {
    pub port_configuration_id: i32,
    pub port_id: i32,
    pub source_device_id: i32,
    pub destination_device_id: i32,
    pub host_device_id: i32,
}

/// 定义表记录（角色、电源状态、设备类型、设备类别）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionRecord {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

/// 设备与电源状态的关联。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePowerStateRecord {
    pub device_power_state_id: i32,
    pub device_id: i32,
    pub power_state_id: i32,
}
