//! 设备属性白名单
//!
//! 属性修改只允许白名单内的字段，每个字段声明自己的标量类型：
//! - 字符串：原样写入
//! - 整数：按十进制解析
//! - 布尔：只接受字面量 "true" / "false"（区分大小写）
//!
//! 字段名在这里解析成 [`DeviceAttribute`]，之后拼接 SQL 时只使用
//! 枚举自带的 `&'static str` 列名，请求中的原始字段名不会进入语句。

/// 属性校验错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributeError {
    #[error("invalid column name: {0}")]
    InvalidColumn(String),
    #[error("invalid value for an integer column: {0}")]
    InvalidInteger(String),
    #[error("invalid value for a boolean column: {0}")]
    InvalidBoolean(String),
}

/// 属性的标量类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Text,
    Integer,
    Boolean,
}

impl AttributeKind {
    /// 将字符串值解析为当前类型。
    pub fn parse(self, raw: &str) -> Result<AttributeValue, AttributeError> {
        match self {
            AttributeKind::Text => Ok(AttributeValue::Text(raw.to_string())),
            AttributeKind::Integer => raw
                .parse::<i32>()
                .map(AttributeValue::Integer)
                .map_err(|_| AttributeError::InvalidInteger(raw.to_string())),
            AttributeKind::Boolean => match raw {
                "true" => Ok(AttributeValue::Boolean(true)),
                "false" => Ok(AttributeValue::Boolean(false)),
                _ => Err(AttributeError::InvalidBoolean(raw.to_string())),
            },
        }
    }
}

/// 解析后的属性值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Text(String),
    Integer(i32),
    Boolean(bool),
}

impl AttributeValue {
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Text(_) => AttributeKind::Text,
            AttributeValue::Integer(_) => AttributeKind::Integer,
            AttributeValue::Boolean(_) => AttributeKind::Boolean,
        }
    }
}

/// 属性所在的表。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeTable {
    /// devices 表
    Devices,
    /// audio_devices 表（每个设备至多一行）
    AudioDevices,
}

/// 允许修改的设备属性。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceAttribute {
    Address,
    Input,
    Output,
    BuildingId,
    RoomId,
    ClassId,
    TypeId,
    DisplayName,
    Volume,
    Muted,
}

impl DeviceAttribute {
    pub const ALL: [DeviceAttribute; 10] = [
        DeviceAttribute::Address,
        DeviceAttribute::Input,
        DeviceAttribute::Output,
        DeviceAttribute::BuildingId,
        DeviceAttribute::RoomId,
        DeviceAttribute::ClassId,
        DeviceAttribute::TypeId,
        DeviceAttribute::DisplayName,
        DeviceAttribute::Volume,
        DeviceAttribute::Muted,
    ];

    /// 根据请求中的字段名查找属性。
    pub fn from_field(field: &str) -> Result<Self, AttributeError> {
        Self::ALL
            .into_iter()
            .find(|attribute| attribute.field() == field)
            .ok_or_else(|| AttributeError::InvalidColumn(field.to_string()))
    }

    /// 对外字段名
    pub fn field(self) -> &'static str {
        match self {
            DeviceAttribute::Address => "address",
            DeviceAttribute::Input => "input",
            DeviceAttribute::Output => "output",
            DeviceAttribute::BuildingId => "buildingID",
            DeviceAttribute::RoomId => "roomID",
            DeviceAttribute::ClassId => "classID",
            DeviceAttribute::TypeId => "typeID",
            DeviceAttribute::DisplayName => "displayName",
            DeviceAttribute::Volume => "volume",
            DeviceAttribute::Muted => "muted",
        }
    }

    /// 数据库列名
    pub fn column(self) -> &'static str {
        match self {
            DeviceAttribute::Address => "address",
            DeviceAttribute::Input => "input",
            DeviceAttribute::Output => "output",
            DeviceAttribute::BuildingId => "building_id",
            DeviceAttribute::RoomId => "room_id",
            DeviceAttribute::ClassId => "class_id",
            DeviceAttribute::TypeId => "type_id",
            DeviceAttribute::DisplayName => "display_name",
            DeviceAttribute::Volume => "volume",
            DeviceAttribute::Muted => "muted",
        }
    }

    pub fn table(self) -> AttributeTable {
        match self {
            DeviceAttribute::Volume | DeviceAttribute::Muted => AttributeTable::AudioDevices,
            _ => AttributeTable::Devices,
        }
    }

    pub fn kind(self) -> AttributeKind {
        match self {
            DeviceAttribute::Address | DeviceAttribute::DisplayName => AttributeKind::Text,
            DeviceAttribute::Input | DeviceAttribute::Output | DeviceAttribute::Muted => {
                AttributeKind::Boolean
            }
            DeviceAttribute::BuildingId
            | DeviceAttribute::RoomId
            | DeviceAttribute::ClassId
            | DeviceAttribute::TypeId
            | DeviceAttribute::Volume => AttributeKind::Integer,
        }
    }
}

/// 已通过白名单与类型校验的属性修改。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceAttributeUpdate {
    pub device_id: i32,
    pub attribute: DeviceAttribute,
    pub value: AttributeValue,
}

impl DeviceAttributeUpdate {
    /// 校验字段名和值，任何一步失败都不会产生可执行的修改。
    pub fn parse(device_id: i32, field: &str, raw_value: &str) -> Result<Self, AttributeError> {
        let attribute = DeviceAttribute::from_field(field)?;
        let value = attribute.kind().parse(raw_value)?;
        Ok(Self {
            device_id,
            attribute,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_accepts_only_literals() {
        assert_eq!(
            AttributeKind::Boolean.parse("true"),
            Ok(AttributeValue::Boolean(true))
        );
        assert_eq!(
            AttributeKind::Boolean.parse("false"),
            Ok(AttributeValue::Boolean(false))
        );
        for raw in ["True", "FALSE", "1", "0", "yes", "", "frobnicate"] {
            assert_eq!(
                AttributeKind::Boolean.parse(raw),
                Err(AttributeError::InvalidBoolean(raw.to_string()))
            );
        }
    }

    #[test]
    fn field_names_round_trip_through_allow_list() {
        for attribute in DeviceAttribute::ALL {
            assert_eq!(DeviceAttribute::from_field(attribute.field()), Ok(attribute));
        }
    }
}
