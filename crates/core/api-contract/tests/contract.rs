use api_contract::{
    BuildingDto, CommandDto, CreateDeviceRequest, CreateRoomRequest, DeviceDto, EndpointDto,
    PortConfigurationDto, RoomSummaryDto, SetAttributeRequest,
};
use serde_json::Value;

fn sample_device() -> DeviceDto {
    DeviceDto {
        id: 42,
        name: "D1".to_string(),
        address: "10.0.0.1".to_string(),
        input: false,
        output: true,
        display_name: Some("Left TV".to_string()),
        building: BuildingDto {
            id: 1,
            name: "Information Technology Building".to_string(),
            shortname: "ITB".to_string(),
            description: None,
        },
        room: RoomSummaryDto {
            id: 5,
            name: "1101".to_string(),
            description: None,
            room_designation: Some("production".to_string()),
        },
        device_type: "tv".to_string(),
        device_class: "display".to_string(),
        roles: vec!["VideoOut".to_string()],
        power_states: vec!["on".to_string()],
        ports: vec![],
        commands: vec![CommandDto {
            name: "PowerOn".to_string(),
            endpoint: EndpointDto {
                name: "power-on".to_string(),
                path: "/:address/power/on".to_string(),
            },
            microservice: "http://sony:8007".to_string(),
        }],
        volume: None,
        muted: Some(true),
    }
}

#[test]
fn device_dto_is_camel_case() {
    let value = serde_json::to_value(sample_device()).expect("serialize");
    assert!(value.get("displayName").is_some());
    assert!(value.get("powerStates").is_some());
    assert_eq!(value.get("type"), Some(&Value::String("tv".to_string())));
    assert_eq!(value.get("class"), Some(&Value::String("display".to_string())));
    assert!(value.get("display_name").is_none());
    assert!(value.get("device_type").is_none());
    assert_eq!(value["room"]["roomDesignation"], "production");
    assert_eq!(value["commands"][0]["endpoint"]["path"], "/:address/power/on");
}

#[test]
fn embedded_room_has_no_devices() {
    let value = serde_json::to_value(sample_device()).expect("serialize");
    let room = value.get("room").expect("room");
    assert!(room.get("devices").is_none());
    assert!(room.get("configuration").is_none());
}

#[test]
fn absent_audio_state_is_omitted() {
    let value = serde_json::to_value(sample_device()).expect("serialize");
    assert!(value.get("volume").is_none());
    assert_eq!(value.get("muted"), Some(&Value::Bool(true)));
}

#[test]
fn set_attribute_request_accepts_camel_case() {
    let payload = r#"{"attributeName":"muted","attributeValue":"true"}"#;
    let req: SetAttributeRequest = serde_json::from_str(payload).expect("parse");
    assert_eq!(req.attribute_name, "muted");
    assert_eq!(req.attribute_value, "true");
}

#[test]
fn create_device_request_defaults_collections() {
    let payload = r#"{
        "name": "D1",
        "address": "10.0.0.1",
        "building": "ITB",
        "room": "1101",
        "type": "tv",
        "class": "display"
    }"#;
    let req: CreateDeviceRequest = serde_json::from_str(payload).expect("parse");
    assert!(req.roles.is_empty());
    assert!(req.power_states.is_empty());
    assert!(!req.input);
    assert_eq!(req.device_type, "tv");
}

#[test]
fn create_room_request_requires_vlan() {
    let payload = r#"{"name":"101","building":"JKB"}"#;
    assert!(serde_json::from_str::<CreateRoomRequest>(payload).is_err());
}

#[test]
fn port_configuration_uses_id_suffix() {
    let dto = PortConfigurationDto {
        id: 3,
        port_id: 1,
        source_device_id: 2,
        destination_device_id: 4,
        host_device_id: 4,
    };
    let value = serde_json::to_value(&dto).expect("serialize");
    assert_eq!(value["portID"], 1);
    assert_eq!(value["hostDeviceID"], 4);
    let back: PortConfigurationDto = serde_json::from_value(value).expect("parse");
    assert_eq!(back, dto);
}
