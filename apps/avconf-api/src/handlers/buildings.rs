//! 楼宇 handlers
//!
//! - GET /buildings - 列出楼宇
//! - POST /buildings - 创建楼宇
//! - GET /buildings/{building} - 数字按 ID 查询，否则先按简称再按名称
//! - GET /buildings/{building}/rooms - 楼宇下的房间（不含设备）

use crate::AppState;
use crate::utils::response::{
    building_to_dto, json_ok, missing_error, room_to_dto, storage_error,
};
use crate::utils::{normalize_optional, normalize_required};
use api_contract::{BuildingDto, CreateBuildingRequest, RoomDto};
use avconf_storage::{BuildingRecord, NewBuilding, StorageError};
use axum::{
    Json,
    extract::{Path, State},
    response::Response,
};
use tracing::info;

#[derive(serde::Deserialize)]
pub struct BuildingPath {
    building: String,
}

pub async fn list_buildings(State(state): State<AppState>) -> Response {
    match state.building_store.list_buildings().await {
        Ok(items) => {
            let data: Vec<BuildingDto> = items.into_iter().map(building_to_dto).collect();
            json_ok(data)
        }
        Err(err) => storage_error(err),
    }
}

/// 创建楼宇
///
/// 名称与简称必填；重名由存储层决定。
pub async fn create_building(
    State(state): State<AppState>,
    Json(req): Json<CreateBuildingRequest>,
) -> Response {
    let name = match normalize_required(req.name, "name") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let shortname = match normalize_required(req.shortname, "shortname") {
        Ok(value) => value,
        Err(response) => return response,
    };
    info!(name = %name, shortname = %shortname, "creating building");
    let building = NewBuilding {
        name,
        shortname,
        description: normalize_optional(req.description),
    };
    match state.building_store.make_building(building).await {
        Ok(record) => json_ok(building_to_dto(record)),
        Err(err) => storage_error(err),
    }
}

async fn resolve_building(
    state: &AppState,
    building: &str,
) -> Result<Option<BuildingRecord>, StorageError> {
    if let Ok(building_id) = building.parse::<i32>() {
        return state.building_store.find_building_by_id(building_id).await;
    }
    if let Some(record) = state.building_store.find_building_by_shortname(building).await? {
        return Ok(Some(record));
    }
    state.building_store.find_building_by_name(building).await
}

pub async fn get_building(
    State(state): State<AppState>,
    Path(path): Path<BuildingPath>,
) -> Response {
    match resolve_building(&state, &path.building).await {
        Ok(Some(record)) => json_ok(building_to_dto(record)),
        Ok(None) => missing_error(format!("no building found for {}", path.building)),
        Err(err) => storage_error(err),
    }
}

pub async fn list_building_rooms(
    State(state): State<AppState>,
    Path(path): Path<BuildingPath>,
) -> Response {
    match state.room_store.list_rooms_by_building(&path.building).await {
        Ok(items) => {
            let data: Vec<RoomDto> = items.into_iter().map(room_to_dto).collect();
            json_ok(data)
        }
        Err(err) => storage_error(err),
    }
}
