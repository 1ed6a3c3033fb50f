//! Handlers 模块

pub mod buildings;
pub mod definitions;
pub mod devices;
pub mod health;
pub mod ports;
pub mod rooms;

pub use buildings::*;
pub use definitions::*;
pub use devices::*;
pub use health::*;
pub use ports::*;
pub use rooms::*;
