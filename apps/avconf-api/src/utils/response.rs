//! HTTP 响应辅助函数和 DTO 转换
//!
//! 提供统一的错误响应构造函数和 DTO 转换函数：
//! - 成功响应：json_ok
//! - 错误响应：bad_request_error, storage_error, missing_error
//! - DTO 转换：building_to_dto, room_to_dto, device_to_dto, port_configuration_to_dto, definition_to_dto
//!
//! 设计原则：
//! - 成功响应直接返回 JSON，不加外层封装
//! - 错误响应为纯文本，正文即错误信息
//! - 400 只用于路径参数与请求体本身的问题（缺字段、路径与请求体不一致）
//! - 存储层返回的任何错误（包括属性校验失败、记录不存在）一律 500，正文为错误文本

use api_contract::{
    BuildingDto, CommandDto, DefinitionDto, DeviceDto, EndpointDto, EvaluatorDto,
    PortConfigurationDto, PortDto, RoomConfigurationDto, RoomDto, RoomSummaryDto,
};
use avconf_storage::{
    BuildingRecord, DefinitionRecord, DeviceRecord, PortConfigurationRecord,
    RoomConfigurationRecord, RoomRecord, RoomSummary, StorageError,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{error, warn};

/// 200 OK + JSON 正文
pub fn json_ok<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, message.into()).into_response()
}

/// 存储错误响应
pub fn storage_error(err: StorageError) -> Response {
    let message = err.to_string();
    match err {
        StorageError::Validation(_) | StorageError::NotFound(_) => {
            warn!(error = %message, "storage request rejected");
        }
        _ => {
            error!(error = %message, "storage error");
        }
    }
    (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}

/// 单条查询没有结果时的响应，与存储层的 NotFound 同样处理
pub fn missing_error(message: impl Into<String>) -> Response {
    storage_error(StorageError::not_found(message))
}

/// BuildingRecord 转 BuildingDto
pub fn building_to_dto(record: BuildingRecord) -> BuildingDto {
    BuildingDto {
        id: record.building_id,
        name: record.name,
        shortname: record.shortname,
        description: record.description,
    }
}

fn room_summary_to_dto(record: RoomSummary) -> RoomSummaryDto {
    RoomSummaryDto {
        id: record.room_id,
        name: record.name,
        description: record.description,
        room_designation: record.room_designation,
    }
}

fn configuration_to_dto(record: RoomConfigurationRecord) -> RoomConfigurationDto {
    RoomConfigurationDto {
        id: record.configuration_id,
        name: record.name,
        description: record.description,
        evaluators: record
            .evaluators
            .into_iter()
            .map(|evaluator| EvaluatorDto {
                id: evaluator.evaluator_id,
                evaluator_key: evaluator.evaluator_key,
                priority: evaluator.priority,
            })
            .collect(),
    }
}

/// RoomRecord 转 RoomDto
pub fn room_to_dto(record: RoomRecord) -> RoomDto {
    RoomDto {
        id: record.room_id,
        name: record.name,
        description: record.description,
        room_designation: record.room_designation,
        building: building_to_dto(record.building),
        vlan: record.vlan,
        current_video_input: record.current_video_input,
        current_audio_input: record.current_audio_input,
        current_video_output: record.current_video_output,
        current_audio_output: record.current_audio_output,
        configuration_id: record.configuration_id,
        configuration: record.configuration.map(configuration_to_dto),
        devices: record.devices.into_iter().map(device_to_dto).collect(),
    }
}

/// DeviceRecord 转 DeviceDto
pub fn device_to_dto(record: DeviceRecord) -> DeviceDto {
    DeviceDto {
        id: record.device_id,
        name: record.name,
        address: record.address,
        input: record.input,
        output: record.output,
        display_name: record.display_name,
        building: building_to_dto(record.building),
        room: room_summary_to_dto(record.room),
        device_type: record.device_type,
        device_class: record.device_class,
        roles: record.roles,
        power_states: record.power_states,
        ports: record
            .ports
            .into_iter()
            .map(|port| PortDto {
                source: port.source,
                name: port.name,
                destination: port.destination,
                host: port.host,
            })
            .collect(),
        commands: record
            .commands
            .into_iter()
            .map(|command| CommandDto {
                name: command.name,
                endpoint: EndpointDto {
                    name: command.endpoint_name,
                    path: command.endpoint_path,
                },
                microservice: command.microservice,
            })
            .collect(),
        volume: record.volume,
        muted: record.muted,
    }
}

/// PortConfigurationRecord 转 PortConfigurationDto
pub fn port_configuration_to_dto(record: PortConfigurationRecord) -> PortConfigurationDto {
    PortConfigurationDto {
        id: record.port_configuration_id,
        port_id: record.port_id,
        source_device_id: record.source_device_id,
        destination_device_id: record.destination_device_id,
        host_device_id: record.host_device_id,
    }
}

/// PortConfigurationDto 转 PortConfigurationRecord
pub fn port_configuration_from_dto(dto: PortConfigurationDto) -> PortConfigurationRecord {
    PortConfigurationRecord {
        port_configuration_id: dto.id,
        port_id: dto.port_id,
        source_device_id: dto.source_device_id,
        destination_device_id: dto.destination_device_id,
        host_device_id: dto.host_device_id,
    }
}

/// DefinitionRecord 转 DefinitionDto
pub fn definition_to_dto(record: DefinitionRecord) -> DefinitionDto {
    DefinitionDto {
        id: record.id,
        name: record.name,
        description: record.description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_is_server_error_with_text_body() {
        let response = storage_error(StorageError::Validation(
            "invalid column name: bogus".to_string(),
        ));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(axum::http::header::CONTENT_TYPE),
            Some(&axum::http::HeaderValue::from_static("text/plain; charset=utf-8"))
        );
    }

    #[test]
    fn missing_lookup_is_server_error() {
        let response = missing_error("no devices found for id 7");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn other_storage_errors_are_server_errors() {
        for err in [
            StorageError::not_found("could not find a building with the \"ZZZ\" shortname"),
            StorageError::integrity("device already exists in room, please choose a different name"),
            StorageError::Internal("lock failed".to_string()),
        ] {
            assert_eq!(storage_error(err).status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
