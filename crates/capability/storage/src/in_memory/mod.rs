//! 内存存储实现模块
//!
//! 仅用于测试和本地演示。
//!
//! `InMemoryConfigDb` 一个类型同时实现全部存储接口：
//! - BuildingStore (`building.rs`)
//! - RoomStore (`room.rs`)
//! - DeviceStore (`device.rs`)
//! - PortConfigurationStore (`port.rs`)
//! - DefinitionStore (`definition.rs`)

pub mod building;
pub mod definition;
pub mod device;
pub mod port;
pub mod room;
pub mod tables;

pub use tables::InMemoryConfigDb;
