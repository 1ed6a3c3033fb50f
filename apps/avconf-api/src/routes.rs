//! 路由定义
//!
//! 集中管理所有 API 路由，将路径映射到对应的 handlers。
//! 路由包括：
//! - 健康检查与计数：/health, /metrics
//! - 楼宇：/buildings/*
//! - 房间：/rooms/*, /buildings/{building}/rooms/*
//! - 设备：/devices/*, /buildings/{building}/rooms/{room}/devices/*, /roles/*
//! - 端口配置：/portconfigurations/*
//! - 定义表：/definitions/*

use super::AppState;
use super::handlers::*;
use axum::{
    Router,
    routing::{get, post, put},
};

/// 创建 API 路由
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(get_metrics))
        .route("/buildings", get(list_buildings).post(create_building))
        .route("/buildings/:building", get(get_building))
        .route("/buildings/:building/rooms", get(list_building_rooms))
        .route("/buildings/:building/rooms/:room", get(get_building_room))
        .route(
            "/buildings/:building/rooms/:room/devices",
            get(list_room_devices),
        )
        .route(
            "/buildings/:building/rooms/:room/devices/:device",
            get(get_room_device).post(create_device),
        )
        .route(
            "/buildings/:building/rooms/:room/devices/:device/attributes/:attribute/:value",
            put(set_room_device_attribute),
        )
        .route(
            "/buildings/:building/rooms/:room/role/:role",
            get(list_room_devices_by_role),
        )
        .route("/rooms", get(list_rooms).post(create_room))
        .route("/rooms/:room", get(get_room))
        .route(
            "/rooms/:room/roles/:role/devices",
            get(list_room_devices_by_role_id),
        )
        .route("/devices", get(list_devices))
        .route("/devices/:device", get(get_device))
        .route("/devices/:device/attribute", put(set_device_attribute))
        .route(
            "/roles/:role/classes/:class/designations/:designation/devices",
            get(list_devices_by_role_and_class),
        )
        .route("/portconfigurations", get(list_port_configurations))
        .route("/portconfigurations/:id", post(add_port_configuration))
        .route("/definitions/roles", get(list_role_definitions))
        .route("/definitions/powerstates", get(list_power_states))
        .route("/definitions/types", get(list_device_types))
        .route("/definitions/classes", get(list_device_classes))
}
