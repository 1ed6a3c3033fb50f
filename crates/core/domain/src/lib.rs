pub mod attribute;

pub use attribute::{
    AttributeError, AttributeKind, AttributeTable, AttributeValue, DeviceAttribute,
    DeviceAttributeUpdate,
};

/// 房间定位：楼宇简称 + 房间名。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomLocation {
    pub building: String,
    pub room: String,
}

impl RoomLocation {
    pub fn new(building: impl Into<String>, room: impl Into<String>) -> Self {
        Self {
            building: building.into(),
            room: room.into(),
        }
    }
}

/// 设备定位：楼宇简称 + 房间名 + 设备名。
///
/// 设备名在同一房间内唯一（由创建时的存在性检查保证）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceLocation {
    pub building: String,
    pub room: String,
    pub device: String,
}

impl DeviceLocation {
    pub fn new(
        building: impl Into<String>,
        room: impl Into<String>,
        device: impl Into<String>,
    ) -> Self {
        Self {
            building: building.into(),
            room: room.into(),
            device: device.into(),
        }
    }

    /// 所在房间
    pub fn room_location(&self) -> RoomLocation {
        RoomLocation::new(self.building.clone(), self.room.clone())
    }
}

impl std::fmt::Display for DeviceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.building, self.room, self.device)
    }
}
