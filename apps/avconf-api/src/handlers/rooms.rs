//! 房间 handlers
//!
//! - GET /rooms - 列出房间（不含设备）
//! - POST /rooms - 创建房间
//! - GET /rooms/{room} - 数字按 ID 查询，否则按名称
//! - GET /buildings/{building}/rooms/{room} - 按位置查询完整房间

use crate::AppState;
use crate::utils::normalize_required;
use crate::utils::response::{json_ok, missing_error, room_to_dto, storage_error};
use api_contract::{CreateRoomRequest, RoomDto};
use axum::{
    Json,
    extract::{Path, State},
    response::Response,
};
use domain::RoomLocation;
use tracing::info;

#[derive(serde::Deserialize)]
pub struct RoomPath {
    room: String,
}

#[derive(serde::Deserialize)]
pub struct BuildingRoomPath {
    pub(crate) building: String,
    pub(crate) room: String,
}

pub async fn list_rooms(State(state): State<AppState>) -> Response {
    match state.room_store.list_rooms().await {
        Ok(items) => {
            let data: Vec<RoomDto> = items.into_iter().map(room_to_dto).collect();
            json_ok(data)
        }
        Err(err) => storage_error(err),
    }
}

/// 创建房间
///
/// 楼宇按简称解析；楼宇不存在时不插入任何行，返回存储层错误文本。
pub async fn create_room(
    State(state): State<AppState>,
    Json(req): Json<CreateRoomRequest>,
) -> Response {
    let name = match normalize_required(req.name, "name") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let building = match normalize_required(req.building, "building") {
        Ok(value) => value,
        Err(response) => return response,
    };
    info!(room = %name, building = %building, vlan = req.vlan, "creating room");
    match state.room_store.make_room(&name, &building, req.vlan).await {
        Ok(record) => json_ok(room_to_dto(record)),
        Err(err) => storage_error(err),
    }
}

pub async fn get_room(State(state): State<AppState>, Path(path): Path<RoomPath>) -> Response {
    let result = match path.room.parse::<i32>() {
        Ok(room_id) => state.room_store.find_room_by_id(room_id).await,
        Err(_) => state.room_store.find_room_by_name(&path.room).await,
    };
    match result {
        Ok(Some(record)) => json_ok(room_to_dto(record)),
        Ok(None) => missing_error(format!("no room found for {}", path.room)),
        Err(err) => storage_error(err),
    }
}

pub async fn get_building_room(
    State(state): State<AppState>,
    Path(path): Path<BuildingRoomPath>,
) -> Response {
    let location = RoomLocation::new(path.building, path.room);
    match state.room_store.find_room_by_location(&location).await {
        Ok(Some(record)) => json_ok(room_to_dto(record)),
        Ok(None) => missing_error(format!(
            "no room found for {}-{}",
            location.building, location.room
        )),
        Err(err) => storage_error(err),
    }
}
