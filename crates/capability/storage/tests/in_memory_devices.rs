use avconf_storage::{
    BuildingStore, DefinitionStore, DeviceAttributeInfo, DeviceStore, InMemoryConfigDb,
    NewBuilding, NewDevice, PortConfigurationRecord, PortConfigurationStore, RoomStore,
    StorageError,
};
use domain::{DeviceLocation, RoomLocation};

fn new_device(name: &str, room: &str, device_type: &str, class: &str, roles: &[&str]) -> NewDevice {
    NewDevice {
        name: name.to_string(),
        address: format!("{name}.byu.edu"),
        input: false,
        output: true,
        display_name: None,
        building: "ITB".to_string(),
        room: room.to_string(),
        device_type: device_type.to_string(),
        device_class: class.to_string(),
        roles: roles.iter().map(|role| role.to_string()).collect(),
        power_states: vec!["on".to_string(), "standby".to_string()],
    }
}

async fn seeded() -> InMemoryConfigDb {
    let db = InMemoryConfigDb::with_default_definitions();
    db.make_building(NewBuilding {
        name: "Information Technology Building".to_string(),
        shortname: "ITB".to_string(),
        description: None,
    })
    .await
    .expect("building");
    db.make_room("1101", "ITB", 10).await.expect("room 1101");
    db.make_room("1110", "ITB", 11).await.expect("room 1110");
    db.add_command("tv", "PowerOn", "power-on", "/:address/power/on", "http://sony:8007")
        .expect("command");
    db.add_device(new_device("D1", "1101", "tv", "display", &["VideoOut"]))
        .await
        .expect("D1");
    db.add_device(new_device("DSP1", "1101", "dsp", "audio", &["AudioOut", "Microphone"]))
        .await
        .expect("DSP1");
    db.add_device(new_device("D1", "1110", "tv", "display", &[]))
        .await
        .expect("D1 in 1110");
    db
}

#[tokio::test]
async fn device_aggregate_is_complete() {
    let db = seeded().await;
    let device = db
        .find_device_by_location(&DeviceLocation::new("ITB", "1101", "D1"))
        .await
        .expect("query")
        .expect("device");
    assert_eq!(device.device_type, "tv");
    assert_eq!(device.device_class, "display");
    assert_eq!(device.building.shortname, "ITB");
    assert_eq!(device.room.name, "1101");
    assert_eq!(device.roles, vec!["VideoOut".to_string()]);
    assert_eq!(device.power_states, vec!["on".to_string(), "standby".to_string()]);
    assert_eq!(device.commands.len(), 1);
    assert_eq!(device.commands[0].microservice, "http://sony:8007");
    assert!(device.ports.is_empty());
    assert_eq!(device.volume, None);
}

#[tokio::test]
async fn device_without_roles_is_still_listed() {
    let db = seeded().await;
    let devices = db
        .list_devices_by_room(&RoomLocation::new("ITB", "1110"))
        .await
        .expect("query");
    assert_eq!(devices.len(), 1);
    assert!(devices[0].roles.is_empty());
    assert_eq!(db.list_devices().await.expect("all").len(), 3);
}

#[tokio::test]
async fn role_filter_keeps_all_roles_on_result() {
    let db = seeded().await;
    let room = db
        .find_room_by_location(&RoomLocation::new("ITB", "1101"))
        .await
        .expect("query")
        .expect("room");
    let role = db
        .find_role_definition_by_name("Microphone")
        .await
        .expect("query")
        .expect("role");

    let devices = db
        .list_devices_by_room_id_and_role_id(room.room_id, role.id)
        .await
        .expect("query");
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].name, "DSP1");
    assert_eq!(
        devices[0].roles,
        vec!["AudioOut".to_string(), "Microphone".to_string()]
    );

    let by_name = db
        .list_devices_by_room_and_role(&RoomLocation::new("ITB", "1101"), "AudioOut")
        .await
        .expect("query");
    assert_eq!(by_name, devices);
}

#[tokio::test]
async fn role_class_designation_query() {
    let db = seeded().await;
    let room = db
        .find_room_by_location(&RoomLocation::new("ITB", "1101"))
        .await
        .expect("query")
        .expect("room");
    db.set_room_designation(room.room_id, "production")
        .expect("designation");

    let devices = db
        .list_devices_by_role_and_class("VideoOut", "display", "production")
        .await
        .expect("query");
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].room.room_designation.as_deref(), Some("production"));

    let none = db
        .list_devices_by_role_and_class("VideoOut", "display", "stage")
        .await
        .expect("query");
    assert!(none.is_empty());
}

#[tokio::test]
async fn set_muted_and_refetch() {
    let db = seeded().await;
    let device = db
        .set_device_attribute_by_location(
            &DeviceLocation::new("ITB", "1101", "DSP1"),
            "muted",
            "true",
        )
        .await
        .expect("update");
    assert_eq!(device.muted, Some(true));
    assert_eq!(device.volume, None);

    let refetched = db
        .find_device_by_id(device.device_id)
        .await
        .expect("query")
        .expect("device");
    assert_eq!(refetched.muted, Some(true));
}

#[tokio::test]
async fn invalid_boolean_is_rejected_without_change() {
    let db = seeded().await;
    let before = db.find_device_by_id(1).await.expect("query").expect("device");
    let err = db
        .set_device_attribute(DeviceAttributeInfo {
            device_id: 1,
            attribute_name: "muted".to_string(),
            attribute_value: "frobnicate".to_string(),
        })
        .await
        .expect_err("invalid value");
    assert!(matches!(err, StorageError::Validation(_)));
    assert_eq!(err.to_string(), "invalid value for a boolean column: frobnicate");
    let after = db.find_device_by_id(1).await.expect("query").expect("device");
    assert_eq!(before, after);
}

#[tokio::test]
async fn unknown_attribute_is_rejected() {
    let db = seeded().await;
    let err = db
        .set_device_attribute(DeviceAttributeInfo {
            device_id: 1,
            attribute_name: "name; drop table devices".to_string(),
            attribute_value: "x".to_string(),
        })
        .await
        .expect_err("invalid column");
    assert!(matches!(err, StorageError::Validation(_)));
}

#[tokio::test]
async fn update_of_missing_device_affects_no_rows() {
    let db = seeded().await;
    let err = db
        .set_device_attribute(DeviceAttributeInfo {
            device_id: 404,
            attribute_name: "displayName".to_string(),
            attribute_value: "Left TV".to_string(),
        })
        .await
        .expect_err("no rows");
    assert_eq!(
        err.to_string(),
        "there was a problem updating the device: incorrect number of rows affected: 0"
    );

    let err = db
        .set_device_attribute(DeviceAttributeInfo {
            device_id: 404,
            attribute_name: "volume".to_string(),
            attribute_value: "30".to_string(),
        })
        .await
        .expect_err("no rows");
    assert!(matches!(err, StorageError::Integrity(_)));
}

#[tokio::test]
async fn set_display_name_and_room() {
    let db = seeded().await;
    let device = db
        .set_device_attribute(DeviceAttributeInfo {
            device_id: 1,
            attribute_name: "displayName".to_string(),
            attribute_value: "Left TV".to_string(),
        })
        .await
        .expect("update");
    assert_eq!(device.display_name.as_deref(), Some("Left TV"));

    let err = db
        .set_device_attribute(DeviceAttributeInfo {
            device_id: 1,
            attribute_name: "roomID".to_string(),
            attribute_value: "99".to_string(),
        })
        .await
        .expect_err("missing room");
    assert!(matches!(err, StorageError::Integrity(_)));
}

#[tokio::test]
async fn unknown_role_leaves_no_device_row() {
    let db = seeded().await;
    let before = db.device_count();
    let err = db
        .add_device(new_device("D2", "1101", "tv", "display", &["VideoOut", "Cooler"]))
        .await
        .expect_err("unknown role");
    assert_eq!(err.to_string(), "device role definition: Cooler does not exist");
    assert_eq!(db.device_count(), before);
    assert!(
        db.find_device_by_location(&DeviceLocation::new("ITB", "1101", "D2"))
            .await
            .expect("query")
            .is_none()
    );
}

#[tokio::test]
async fn duplicate_name_in_room_is_rejected() {
    let db = seeded().await;
    let err = db
        .add_device(new_device("D1", "1101", "tv", "display", &[]))
        .await
        .expect_err("duplicate");
    assert_eq!(
        err.to_string(),
        "device already exists in room, please choose a different name"
    );
}

#[tokio::test]
async fn unknown_type_and_room_are_rejected() {
    let db = seeded().await;
    let err = db
        .add_device(new_device("P1", "1101", "projector", "display", &[]))
        .await
        .expect_err("unknown type");
    assert_eq!(err.to_string(), "device type: projector does not exist");

    let err = db
        .add_device(new_device("D9", "9999", "tv", "display", &[]))
        .await
        .expect_err("unknown room");
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[tokio::test]
async fn port_configuration_shows_on_host_device() {
    let db = seeded().await;
    let port_id = db.add_port("HDMIIn1").expect("port");
    db.add_port_configuration(PortConfigurationRecord {
        port_configuration_id: 7,
        port_id,
        source_device_id: 1,
        destination_device_id: 2,
        host_device_id: 2,
    })
    .await
    .expect("add");

    let host = db.find_device_by_id(2).await.expect("query").expect("device");
    assert_eq!(host.ports.len(), 1);
    assert_eq!(host.ports[0].source, "D1");
    assert_eq!(host.ports[0].name, "HDMIIn1");
    assert_eq!(host.ports[0].host, "DSP1");
    let source = db.find_device_by_id(1).await.expect("query").expect("device");
    assert!(source.ports.is_empty());

    let items = db.list_port_configurations().await.expect("list");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].port_configuration_id, 7);
}

#[tokio::test]
async fn moved_building_keeps_commands_and_ports() {
    let db = seeded().await;
    let other = db
        .make_building(NewBuilding {
            name: "Engineering Building".to_string(),
            shortname: "EB".to_string(),
            description: None,
        })
        .await
        .expect("building");
    let port_id = db.add_port("HDMIOut").expect("port");
    db.add_port_configuration(PortConfigurationRecord {
        port_configuration_id: 3,
        port_id,
        source_device_id: 1,
        destination_device_id: 2,
        host_device_id: 1,
    })
    .await
    .expect("add");

    let device = db
        .set_device_attribute(DeviceAttributeInfo {
            device_id: 1,
            attribute_name: "buildingID".to_string(),
            attribute_value: other.building_id.to_string(),
        })
        .await
        .expect("update");
    assert_eq!(device.building.shortname, "EB");
    assert_eq!(device.room.name, "1101");
    assert_eq!(device.commands.len(), 1);
    assert_eq!(device.commands[0].name, "PowerOn");
    assert_eq!(device.ports.len(), 1);
    assert_eq!(device.ports[0].name, "HDMIOut");
}
