//! 聚合组装
//!
//! 设备聚合的组装流程：
//! 1. 一条联表查询（devices / rooms / buildings / device_classes / device_types /
//!    device_roles / device_role_definitions / audio_devices）取出设备级字段，
//!    `select distinct` 去掉因多个角色产生的重复行；角色信息不从这条查询取
//! 2. 每个设备再执行四条子查询：命令、端口、电源状态、角色
//! 3. 任何一步出错立即返回错误，不返回部分结果
//!
//! 子查询与基础查询一样经由 `devices.building_id` 关联楼宇，
//! 设备的楼宇被改成与房间不同时，命令与端口仍按设备自身的楼宇查到。
//!
//! 每个设备需要 1 + 4 次往返，查询大量设备时开销与设备数成正比。

use crate::error::StorageError;
use crate::models::{
    BuildingRecord, CommandRecord, ConfigurationEvaluatorRecord, DeviceRecord, PortRecord,
    RoomConfigurationRecord, RoomRecord, RoomSummary,
};
use crate::postgres::filter::FilterFragment;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::debug;

/// 设备聚合的固定联表前缀
///
/// 过滤片段可以引用这里出现的所有表，包括 device_role_definitions。
pub const DEVICE_BASE_QUERY: &str = "select distinct \
     devices.device_id, \
     devices.name as device_name, \
     devices.address as device_address, \
     devices.input, \
     devices.output, \
     devices.display_name, \
     rooms.room_id, \
     rooms.name as room_name, \
     rooms.description as room_description, \
     rooms.room_designation, \
     buildings.building_id, \
     buildings.name as building_name, \
     buildings.shortname as building_shortname, \
     buildings.description as building_description, \
     device_types.name as device_type, \
     device_classes.name as device_class, \
     audio_devices.volume, \
     audio_devices.muted \
     from devices \
     join rooms on rooms.room_id = devices.room_id \
     join buildings on buildings.building_id = devices.building_id \
     join device_classes on device_classes.device_class_id = devices.class_id \
     join device_types on device_types.device_type_id = devices.type_id \
     left join device_roles on device_roles.device_id = devices.device_id \
     left join device_role_definitions on device_role_definitions.device_role_definition_id = device_roles.device_role_definition_id \
     left join audio_devices on audio_devices.device_id = devices.device_id";

const DEVICE_ORDER: &str = "order by devices.device_id";

const COMMANDS_QUERY: &str = "select commands.name as command_name, \
     endpoints.name as endpoint_name, \
     endpoints.path as endpoint_path, \
     microservices.address as microservice_address \
     from devices \
     join device_types on device_types.device_type_id = devices.type_id \
     join device_type_commands on device_type_commands.device_type_id = device_types.device_type_id \
     join commands on commands.command_id = device_type_commands.command_id \
     join endpoints on endpoints.endpoint_id = device_type_commands.endpoint_id \
     join microservices on microservices.microservice_id = device_type_commands.microservice_id \
     join rooms on rooms.room_id = devices.room_id \
     join buildings on buildings.building_id = devices.building_id \
     where rooms.name = $1 and buildings.shortname = $2 and devices.name = $3 \
     order by device_type_commands.device_type_command_id";

const PORTS_QUERY: &str = "select source_device.name as source_name, \
     ports.name as port_name, \
     destination_device.name as destination_name, \
     host_device.name as host_name \
     from ports \
     join port_configurations on port_configurations.port_id = ports.port_id \
     join devices as source_device on source_device.device_id = port_configurations.source_device_id \
     join devices as destination_device on destination_device.device_id = port_configurations.destination_device_id \
     join devices as host_device on host_device.device_id = port_configurations.host_device_id \
     join rooms on rooms.room_id = host_device.room_id \
     join buildings on buildings.building_id = host_device.building_id \
     where rooms.name = $1 and buildings.shortname = $2 and host_device.name = $3 \
     order by port_configurations.port_configuration_id";

const POWER_STATES_QUERY: &str = "select power_states.name from power_states \
     join device_power_states on device_power_states.power_state_id = power_states.power_state_id \
     where device_power_states.device_id = $1 \
     order by device_power_states.device_power_state_id";

const ROLES_QUERY: &str = "select device_role_definitions.name from device_role_definitions \
     join device_roles on device_roles.device_role_definition_id = device_role_definitions.device_role_definition_id \
     where device_roles.device_id = $1 \
     order by device_roles.device_role_id";

/// 房间的固定联表前缀
pub const ROOM_BASE_QUERY: &str = "select rooms.room_id, \
     rooms.name as room_name, \
     rooms.description as room_description, \
     rooms.room_designation, \
     rooms.vlan, \
     rooms.current_video_input, \
     rooms.current_audio_input, \
     rooms.current_video_output, \
     rooms.current_audio_output, \
     rooms.configuration_id, \
     buildings.building_id, \
     buildings.name as building_name, \
     buildings.shortname as building_shortname, \
     buildings.description as building_description \
     from rooms \
     join buildings on buildings.building_id = rooms.building_id";

const ROOM_ORDER: &str = "order by rooms.room_id";

/// 按过滤片段组装设备聚合
pub async fn fetch_devices(
    pool: &PgPool,
    filter: &FilterFragment,
) -> Result<Vec<DeviceRecord>, StorageError> {
    let sql = filter.compose(DEVICE_BASE_QUERY, DEVICE_ORDER);
    let rows = filter.bind(sqlx::query(&sql)).fetch_all(pool).await?;
    debug!(rows = rows.len(), clause = filter.clause(), "device query executed");

    let mut devices = Vec::with_capacity(rows.len());
    for row in rows {
        let mut device = device_from_row(&row)?;
        device.commands = fetch_commands(pool, &device).await?;
        device.ports = fetch_ports(pool, &device).await?;
        device.power_states = fetch_power_states(pool, device.device_id).await?;
        device.roles = fetch_roles(pool, device.device_id).await?;
        devices.push(device);
    }
    Ok(devices)
}

/// 按过滤片段查询房间（不含设备与配置）
pub async fn fetch_rooms(
    pool: &PgPool,
    filter: &FilterFragment,
) -> Result<Vec<RoomRecord>, StorageError> {
    let sql = filter.compose(ROOM_BASE_QUERY, ROOM_ORDER);
    let rows = filter.bind(sqlx::query(&sql)).fetch_all(pool).await?;
    let mut rooms = Vec::with_capacity(rows.len());
    for row in rows {
        rooms.push(room_from_row(&row)?);
    }
    Ok(rooms)
}

/// 补全单个房间的设备列表与配置
pub async fn load_room_details(pool: &PgPool, mut room: RoomRecord) -> Result<RoomRecord, StorageError> {
    let filter = FilterFragment::new("where rooms.room_id = $1").int(room.room_id);
    room.devices = fetch_devices(pool, &filter).await?;
    room.configuration = match room.configuration_id {
        Some(configuration_id) => fetch_configuration(pool, configuration_id).await?,
        None => None,
    };
    Ok(room)
}

/// 查询房间配置及其评估器
pub async fn fetch_configuration(
    pool: &PgPool,
    configuration_id: i32,
) -> Result<Option<RoomConfigurationRecord>, StorageError> {
    let row = sqlx::query(
        "select room_configuration_id, name, description \
         from room_configurations where room_configuration_id = $1",
    )
    .bind(configuration_id)
    .fetch_optional(pool)
    .await?;
    let Some(row) = row else {
        return Ok(None);
    };
    let evaluator_rows = sqlx::query(
        "select evaluator_id, evaluator_key, priority \
         from configuration_evaluators where room_configuration_id = $1 \
         order by priority, evaluator_id",
    )
    .bind(configuration_id)
    .fetch_all(pool)
    .await?;
    let mut evaluators = Vec::with_capacity(evaluator_rows.len());
    for row in evaluator_rows {
        evaluators.push(ConfigurationEvaluatorRecord {
            evaluator_id: row.try_get("evaluator_id")?,
            evaluator_key: row.try_get("evaluator_key")?,
            priority: row.try_get("priority")?,
        });
    }
    Ok(Some(RoomConfigurationRecord {
        configuration_id: row.try_get("room_configuration_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        evaluators,
    }))
}

async fn fetch_commands(
    pool: &PgPool,
    device: &DeviceRecord,
) -> Result<Vec<CommandRecord>, StorageError> {
    let rows = sqlx::query(COMMANDS_QUERY)
        .bind(&device.room.name)
        .bind(&device.building.shortname)
        .bind(&device.name)
        .fetch_all(pool)
        .await?;
    let mut commands = Vec::with_capacity(rows.len());
    for row in rows {
        commands.push(CommandRecord {
            name: row.try_get("command_name")?,
            endpoint_name: row.try_get("endpoint_name")?,
            endpoint_path: row.try_get("endpoint_path")?,
            microservice: row.try_get("microservice_address")?,
        });
    }
    debug!(device_id = device.device_id, count = commands.len(), "found commands");
    Ok(commands)
}

async fn fetch_ports(pool: &PgPool, device: &DeviceRecord) -> Result<Vec<PortRecord>, StorageError> {
    let rows = sqlx::query(PORTS_QUERY)
        .bind(&device.room.name)
        .bind(&device.building.shortname)
        .bind(&device.name)
        .fetch_all(pool)
        .await?;
    let mut ports = Vec::with_capacity(rows.len());
    for row in rows {
        ports.push(PortRecord {
            source: row.try_get("source_name")?,
            name: row.try_get("port_name")?,
            destination: row.try_get("destination_name")?,
            host: row.try_get("host_name")?,
        });
    }
    Ok(ports)
}

async fn fetch_power_states(pool: &PgPool, device_id: i32) -> Result<Vec<String>, StorageError> {
    let names: Vec<String> = sqlx::query_scalar(POWER_STATES_QUERY)
        .bind(device_id)
        .fetch_all(pool)
        .await?;
    Ok(names)
}

async fn fetch_roles(pool: &PgPool, device_id: i32) -> Result<Vec<String>, StorageError> {
    let names: Vec<String> = sqlx::query_scalar(ROLES_QUERY)
        .bind(device_id)
        .fetch_all(pool)
        .await?;
    Ok(names)
}

fn building_from_row(row: &PgRow) -> Result<BuildingRecord, StorageError> {
    Ok(BuildingRecord {
        building_id: row.try_get("building_id")?,
        name: row.try_get("building_name")?,
        shortname: row.try_get("building_shortname")?,
        description: row.try_get("building_description")?,
    })
}

fn device_from_row(row: &PgRow) -> Result<DeviceRecord, StorageError> {
    Ok(DeviceRecord {
        device_id: row.try_get("device_id")?,
        name: row.try_get("device_name")?,
        address: row.try_get("device_address")?,
        input: row.try_get("input")?,
        output: row.try_get("output")?,
        display_name: row.try_get("display_name")?,
        building: building_from_row(row)?,
        room: RoomSummary {
            room_id: row.try_get("room_id")?,
            name: row.try_get("room_name")?,
            description: row.try_get("room_description")?,
            room_designation: row.try_get("room_designation")?,
        },
        device_type: row.try_get("device_type")?,
        device_class: row.try_get("device_class")?,
        roles: Vec::new(),
        power_states: Vec::new(),
        ports: Vec::new(),
        commands: Vec::new(),
        volume: row.try_get("volume")?,
        muted: row.try_get("muted")?,
    })
}

fn room_from_row(row: &PgRow) -> Result<RoomRecord, StorageError> {
    Ok(RoomRecord {
        room_id: row.try_get("room_id")?,
        name: row.try_get("room_name")?,
        description: row.try_get("room_description")?,
        room_designation: row.try_get("room_designation")?,
        building: building_from_row(row)?,
        vlan: row.try_get("vlan")?,
        current_video_input: row.try_get("current_video_input")?,
        current_audio_input: row.try_get("current_audio_input")?,
        current_video_output: row.try_get("current_video_output")?,
        current_audio_output: row.try_get("current_audio_output")?,
        configuration_id: row.try_get("configuration_id")?,
        configuration: None,
        devices: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEVICE_BUILDING_JOIN: &str = "join buildings on buildings.building_id = devices.building_id";

    #[test]
    fn sub_queries_reach_buildings_like_the_base_query() {
        assert!(DEVICE_BASE_QUERY.contains(DEVICE_BUILDING_JOIN));
        assert!(COMMANDS_QUERY.contains(DEVICE_BUILDING_JOIN));
        assert!(PORTS_QUERY
            .contains("join buildings on buildings.building_id = host_device.building_id"));
        for sql in [COMMANDS_QUERY, PORTS_QUERY] {
            assert!(!sql.contains("buildings.building_id = rooms.building_id"));
        }
    }
}
