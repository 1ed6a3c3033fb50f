//! 内存房间存储
//!
//! 与 Postgres 实现保持相同的查询语义：列表不含设备，单个房间补全设备与配置。

use crate::error::StorageError;
use crate::in_memory::device::assemble_devices;
use crate::in_memory::tables::{InMemoryConfigDb, RoomRow, Tables, next_id};
use crate::models::{ConfigurationEvaluatorRecord, RoomConfigurationRecord, RoomRecord};
use crate::traits::RoomStore;
use domain::RoomLocation;

/// 房间行联表楼宇，楼宇缺失的行被丢弃
fn room_record(tables: &Tables, row: &RoomRow) -> Option<RoomRecord> {
    let building = tables.building(row.building_id)?.clone();
    Some(RoomRecord {
        room_id: row.room_id,
        name: row.name.clone(),
        description: row.description.clone(),
        room_designation: row.room_designation.clone(),
        building,
        vlan: row.vlan,
        current_video_input: row.current_video_input,
        current_audio_input: row.current_audio_input,
        current_video_output: row.current_video_output,
        current_audio_output: row.current_audio_output,
        configuration_id: row.configuration_id,
        configuration: None,
        devices: Vec::new(),
    })
}

fn rooms_where(tables: &Tables, keep: impl Fn(&RoomRecord) -> bool) -> Vec<RoomRecord> {
    let mut rooms: Vec<RoomRecord> = tables
        .rooms
        .iter()
        .filter_map(|row| room_record(tables, row))
        .filter(|room| keep(room))
        .collect();
    rooms.sort_by_key(|room| room.room_id);
    rooms
}

fn configuration(tables: &Tables, configuration_id: i32) -> Option<RoomConfigurationRecord> {
    let row = tables
        .configurations
        .iter()
        .find(|row| row.configuration_id == configuration_id)?;
    let mut evaluators: Vec<ConfigurationEvaluatorRecord> = tables
        .evaluators
        .iter()
        .filter(|evaluator| evaluator.configuration_id == configuration_id)
        .map(|evaluator| ConfigurationEvaluatorRecord {
            evaluator_id: evaluator.evaluator_id,
            evaluator_key: evaluator.evaluator_key.clone(),
            priority: evaluator.priority,
        })
        .collect();
    evaluators.sort_by_key(|evaluator| (evaluator.priority, evaluator.evaluator_id));
    Some(RoomConfigurationRecord {
        configuration_id: row.configuration_id,
        name: row.name.clone(),
        description: row.description.clone(),
        evaluators,
    })
}

/// 取第一条匹配的房间并补全设备与配置
fn find_full(tables: &Tables, keep: impl Fn(&RoomRecord) -> bool) -> Option<RoomRecord> {
    let mut room = rooms_where(tables, keep).into_iter().next()?;
    let room_id = room.room_id;
    room.devices = assemble_devices(tables, |joined| joined.row.room_id == room_id);
    room.configuration = room
        .configuration_id
        .and_then(|configuration_id| configuration(tables, configuration_id));
    Some(room)
}

#[async_trait::async_trait]
impl RoomStore for InMemoryConfigDb {
    async fn list_rooms(&self) -> Result<Vec<RoomRecord>, StorageError> {
        let tables = self.read()?;
        Ok(rooms_where(&tables, |_| true))
    }

    async fn find_room_by_id(&self, room_id: i32) -> Result<Option<RoomRecord>, StorageError> {
        let tables = self.read()?;
        Ok(find_full(&tables, |room| room.room_id == room_id))
    }

    async fn find_room_by_name(&self, name: &str) -> Result<Option<RoomRecord>, StorageError> {
        let tables = self.read()?;
        Ok(find_full(&tables, |room| room.name == name))
    }

    async fn list_rooms_by_building(
        &self,
        building_shortname: &str,
    ) -> Result<Vec<RoomRecord>, StorageError> {
        let tables = self.read()?;
        Ok(rooms_where(&tables, |room| {
            room.building.shortname == building_shortname
        }))
    }

    async fn find_room_by_location(
        &self,
        location: &RoomLocation,
    ) -> Result<Option<RoomRecord>, StorageError> {
        let tables = self.read()?;
        Ok(find_full(&tables, |room| {
            room.building.shortname == location.building && room.name == location.room
        }))
    }

    async fn make_room(
        &self,
        name: &str,
        building_shortname: &str,
        vlan: i32,
    ) -> Result<RoomRecord, StorageError> {
        let mut tables = self.write()?;
        let building_id = tables
            .buildings
            .iter()
            .find(|building| building.shortname == building_shortname)
            .map(|building| building.building_id)
            .ok_or_else(|| {
                StorageError::not_found(format!(
                    "could not find a building with the \"{building_shortname}\" shortname"
                ))
            })?;
        if tables.room_at(building_shortname, name).is_some() {
            return Err(StorageError::integrity(format!(
                "room {name} already exists in building {building_shortname}"
            )));
        }
        let room_id = next_id(&tables.rooms, |row| row.room_id);
        tables.rooms.push(RoomRow {
            room_id,
            name: name.to_string(),
            description: None,
            room_designation: None,
            building_id,
            vlan: Some(vlan),
            current_video_input: None,
            current_audio_input: None,
            current_video_output: None,
            current_audio_output: None,
            configuration_id: None,
        });
        find_full(&tables, |room| room.room_id == room_id)
            .ok_or_else(|| StorageError::not_found(format!("no room found for {building_shortname}-{name}")))
    }
}
