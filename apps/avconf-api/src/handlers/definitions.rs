//! 定义表 handlers
//!
//! - GET /definitions/roles
//! - GET /definitions/powerstates
//! - GET /definitions/types
//! - GET /definitions/classes

use crate::AppState;
use crate::utils::response::{definition_to_dto, json_ok, storage_error};
use api_contract::DefinitionDto;
use avconf_storage::{DefinitionRecord, StorageError};
use axum::{extract::State, response::Response};

fn definitions_response(result: Result<Vec<DefinitionRecord>, StorageError>) -> Response {
    match result {
        Ok(items) => {
            let data: Vec<DefinitionDto> = items.into_iter().map(definition_to_dto).collect();
            json_ok(data)
        }
        Err(err) => storage_error(err),
    }
}

pub async fn list_role_definitions(State(state): State<AppState>) -> Response {
    definitions_response(state.definition_store.list_role_definitions().await)
}

pub async fn list_power_states(State(state): State<AppState>) -> Response {
    definitions_response(state.definition_store.list_power_states().await)
}

pub async fn list_device_types(State(state): State<AppState>) -> Response {
    definitions_response(state.definition_store.list_device_types().await)
}

pub async fn list_device_classes(State(state): State<AppState>) -> Response {
    definitions_response(state.definition_store.list_device_classes().await)
}
