//! 端口配置 handlers
//!
//! - GET /portconfigurations
//! - POST /portconfigurations/{id} - 路径 ID 必须与请求体 id 一致

use crate::AppState;
use crate::utils::response::{
    bad_request_error, json_ok, port_configuration_from_dto, port_configuration_to_dto,
    storage_error,
};
use api_contract::PortConfigurationDto;
use axum::{
    Json,
    extract::{Path, State},
    response::Response,
};

pub async fn list_port_configurations(State(state): State<AppState>) -> Response {
    match state.port_store.list_port_configurations().await {
        Ok(items) => {
            let data: Vec<PortConfigurationDto> =
                items.into_iter().map(port_configuration_to_dto).collect();
            json_ok(data)
        }
        Err(err) => storage_error(err),
    }
}

pub async fn add_port_configuration(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<PortConfigurationDto>,
) -> Response {
    if req.id != id {
        return bad_request_error("endpoint parameter and json id must match");
    }
    match state
        .port_store
        .add_port_configuration(port_configuration_from_dto(req))
        .await
    {
        Ok(record) => json_ok(port_configuration_to_dto(record)),
        Err(err) => storage_error(err),
    }
}
