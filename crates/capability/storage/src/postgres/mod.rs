//! # PostgreSQL 存储实现模块
//!
//! 本模块提供所有存储接口的 PostgreSQL 实现，用于生产环境。
//!
//! ## 包含的实现
//!
//! - **BuildingStore** (`building.rs`)：楼宇查询与创建
//! - **RoomStore** (`room.rs`)：房间查询与创建（创建在事务中完成）
//! - **DeviceStore** (`device.rs`)：设备聚合查询、属性修改、设备创建
//! - **PortConfigurationStore** (`port.rs`)：端口配置
//! - **DefinitionStore** (`definition.rs`)：角色、电源状态、类型、类别定义表
//!
//! 聚合组装逻辑集中在 `assembler.rs`，过滤片段在 `filter.rs`。
//!
//! ## 数据库模式
//!
//! 表结构见仓库根目录 `schema/schema.sql`：
//!
//! - `buildings`、`rooms`、`room_configurations`、`configuration_evaluators`
//! - `devices`、`audio_devices`、`device_classes`、`device_types`
//! - `device_role_definitions`、`device_roles`
//! - `power_states`、`device_power_states`
//! - `ports`、`port_configurations`
//! - `commands`、`endpoints`、`microservices`、`device_type_commands`
//!
//! ## 安全考虑
//!
//! - 所有值通过参数绑定（`$1`, `$2` 等）传入
//! - 过滤片段文本只能是 `&'static str`
//! - 属性修改语句的列名来自 `domain::DeviceAttribute`，不使用请求中的字段名
//!
//! ## 事务
//!
//! 设备创建和房间创建在单个事务中执行：
//!
//! ```rust,ignore
//! let mut tx = pool.begin().await?;
//! // 解析引用、存在性检查、插入
//! tx.commit().await?;
//! ```
//!
//! 事务对象在未提交时被丢弃即回滚，任一步返回错误都不会留下部分数据。
//! 存在性检查在默认隔离级别下仍然只是建议性的，并发创建同名设备可能都通过检查。

pub mod assembler;
pub mod building;
pub mod definition;
pub mod device;
pub mod filter;
pub mod port;
pub mod room;

pub use building::*;
pub use definition::*;
pub use device::*;
pub use filter::{FilterFragment, FilterParam};
pub use port::*;
pub use room::*;
