//! 设备 handlers
//!
//! 提供设备聚合的查询、创建和属性修改接口：
//! - GET /devices - 列出全部设备
//! - GET /devices/{device} - 按 ID 获取设备
//! - PUT /devices/{device}/attribute - 修改单个属性，返回回读后的设备
//! - GET /buildings/{building}/rooms/{room}/devices - 房间内设备
//! - GET /buildings/{building}/rooms/{room}/devices/{device} - 数字按 ID，否则按名称
//! - POST /buildings/{building}/rooms/{room}/devices/{device} - 创建设备
//! - PUT /buildings/{building}/rooms/{room}/devices/{device}/attributes/{attribute}/{value} - 按位置修改属性
//! - GET /buildings/{building}/rooms/{room}/role/{role} - 房间内指定角色的设备
//! - GET /rooms/{room}/roles/{role}/devices - 按房间 ID + 角色 ID
//! - GET /roles/{role}/classes/{class}/designations/{designation}/devices - 按角色、类别、房间用途
//!
//! 属性名与值的校验在存储层完成，校验失败与设备不存在都返回 500 和错误文本。

use crate::AppState;
use crate::handlers::rooms::BuildingRoomPath;
use crate::utils::response::{device_to_dto, json_ok, missing_error, storage_error};
use crate::utils::{ensure_path_matches, normalize_optional, normalize_required};
use api_contract::{CreateDeviceRequest, DeviceDto, SetAttributeRequest};
use avconf_storage::{DeviceAttributeInfo, DeviceRecord, NewDevice, StorageError};
use axum::{
    Json,
    extract::{Path, State},
    response::Response,
};
use domain::{DeviceLocation, RoomLocation};
use tracing::info;

#[derive(serde::Deserialize)]
pub struct DevicePath {
    building: String,
    room: String,
    device: String,
}

#[derive(serde::Deserialize)]
pub struct DeviceAttributePath {
    building: String,
    room: String,
    device: String,
    attribute: String,
    value: String,
}

#[derive(serde::Deserialize)]
pub struct RoomRolePath {
    building: String,
    room: String,
    role: String,
}

#[derive(serde::Deserialize)]
pub struct RoomIdRolePath {
    room: i32,
    role: i32,
}

#[derive(serde::Deserialize)]
pub struct RoleClassPath {
    role: String,
    class: String,
    designation: String,
}

fn devices_response(result: Result<Vec<DeviceRecord>, StorageError>) -> Response {
    match result {
        Ok(items) => {
            let data: Vec<DeviceDto> = items.into_iter().map(device_to_dto).collect();
            json_ok(data)
        }
        Err(err) => storage_error(err),
    }
}

fn device_response(result: Result<Option<DeviceRecord>, StorageError>, missing: String) -> Response {
    match result {
        Ok(Some(record)) => json_ok(device_to_dto(record)),
        Ok(None) => missing_error(missing),
        Err(err) => storage_error(err),
    }
}

pub async fn list_devices(State(state): State<AppState>) -> Response {
    devices_response(state.device_store.list_devices().await)
}

pub async fn get_device(State(state): State<AppState>, Path(device_id): Path<i32>) -> Response {
    device_response(
        state.device_store.find_device_by_id(device_id).await,
        format!("no devices found for id {device_id}"),
    )
}

/// 修改设备属性
///
/// 请求体 `{attributeName, attributeValue}`，值一律为字符串，由存储层按列类型解析。
pub async fn set_device_attribute(
    State(state): State<AppState>,
    Path(device_id): Path<i32>,
    Json(req): Json<SetAttributeRequest>,
) -> Response {
    info!(device_id, attribute = %req.attribute_name, "setting device attribute");
    let info = DeviceAttributeInfo {
        device_id,
        attribute_name: req.attribute_name,
        attribute_value: req.attribute_value,
    };
    match state.device_store.set_device_attribute(info).await {
        Ok(record) => json_ok(device_to_dto(record)),
        Err(err) => storage_error(err),
    }
}

pub async fn list_room_devices(
    State(state): State<AppState>,
    Path(path): Path<BuildingRoomPath>,
) -> Response {
    let location = RoomLocation::new(path.building, path.room);
    devices_response(state.device_store.list_devices_by_room(&location).await)
}

pub async fn get_room_device(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
) -> Response {
    match path.device.parse::<i32>() {
        Ok(device_id) => device_response(
            state.device_store.find_device_by_id(device_id).await,
            format!("no devices found for id {device_id}"),
        ),
        Err(_) => {
            let location = DeviceLocation::new(path.building, path.room, path.device);
            device_response(
                state.device_store.find_device_by_location(&location).await,
                format!("no device found at {location}"),
            )
        }
    }
}

/// 创建设备
///
/// 路径中的楼宇、房间、设备名必须与请求体一致，否则返回 400。
/// 类型、类别、角色、电源状态按名称解析，任一未定义时整体失败。
pub async fn create_device(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
    Json(req): Json<CreateDeviceRequest>,
) -> Response {
    let name = match normalize_required(req.name, "name") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let address = match normalize_required(req.address, "address") {
        Ok(value) => value,
        Err(response) => return response,
    };
    for (path_value, body_value, field) in [
        (&path.building, &req.building, "building"),
        (&path.room, &req.room, "room"),
        (&path.device, &name, "device"),
    ] {
        if let Err(response) = ensure_path_matches(path_value, body_value, field) {
            return response;
        }
    }

    let device = NewDevice {
        name,
        address,
        input: req.input,
        output: req.output,
        display_name: normalize_optional(req.display_name),
        building: req.building,
        room: req.room,
        device_type: req.device_type,
        device_class: req.device_class,
        roles: req.roles,
        power_states: req.power_states,
    };
    match state.device_store.add_device(device).await {
        Ok(record) => json_ok(device_to_dto(record)),
        Err(err) => storage_error(err),
    }
}

/// 按位置修改设备属性
pub async fn set_room_device_attribute(
    State(state): State<AppState>,
    Path(path): Path<DeviceAttributePath>,
) -> Response {
    let location = DeviceLocation::new(path.building, path.room, path.device);
    info!(device = %location, attribute = %path.attribute, "setting device attribute");
    match state
        .device_store
        .set_device_attribute_by_location(&location, &path.attribute, &path.value)
        .await
    {
        Ok(record) => json_ok(device_to_dto(record)),
        Err(err) => storage_error(err),
    }
}

pub async fn list_room_devices_by_role(
    State(state): State<AppState>,
    Path(path): Path<RoomRolePath>,
) -> Response {
    let location = RoomLocation::new(path.building, path.room);
    devices_response(
        state
            .device_store
            .list_devices_by_room_and_role(&location, &path.role)
            .await,
    )
}

pub async fn list_room_devices_by_role_id(
    State(state): State<AppState>,
    Path(path): Path<RoomIdRolePath>,
) -> Response {
    devices_response(
        state
            .device_store
            .list_devices_by_room_id_and_role_id(path.room, path.role)
            .await,
    )
}

pub async fn list_devices_by_role_and_class(
    State(state): State<AppState>,
    Path(path): Path<RoleClassPath>,
) -> Response {
    devices_response(
        state
            .device_store
            .list_devices_by_role_and_class(&path.role, &path.class, &path.designation)
            .await,
    )
}
