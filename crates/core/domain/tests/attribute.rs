use domain::{
    AttributeError, AttributeKind, AttributeTable, AttributeValue, DeviceAttribute,
    DeviceAttributeUpdate, DeviceLocation,
};

#[test]
fn unknown_field_is_rejected() {
    let err = DeviceAttributeUpdate::parse(42, "name", "Projector").expect_err("rejected");
    assert_eq!(err, AttributeError::InvalidColumn("name".to_string()));

    let err = DeviceAttributeUpdate::parse(42, "address; drop table devices", "x")
        .expect_err("rejected");
    assert!(matches!(err, AttributeError::InvalidColumn(_)));
}

#[test]
fn field_names_are_case_sensitive() {
    assert!(DeviceAttribute::from_field("roomID").is_ok());
    assert!(DeviceAttribute::from_field("roomid").is_err());
    assert!(DeviceAttribute::from_field("DisplayName").is_err());
}

#[test]
fn values_parse_to_declared_kind() {
    let update = DeviceAttributeUpdate::parse(42, "muted", "true").expect("muted");
    assert_eq!(update.attribute, DeviceAttribute::Muted);
    assert_eq!(update.value, AttributeValue::Boolean(true));
    assert_eq!(update.attribute.table(), AttributeTable::AudioDevices);

    let update = DeviceAttributeUpdate::parse(42, "roomID", "17").expect("room");
    assert_eq!(update.value, AttributeValue::Integer(17));
    assert_eq!(update.attribute.column(), "room_id");

    let update = DeviceAttributeUpdate::parse(42, "address", "10.0.0.5").expect("address");
    assert_eq!(update.value, AttributeValue::Text("10.0.0.5".to_string()));
}

#[test]
fn invalid_values_are_rejected() {
    assert_eq!(
        DeviceAttributeUpdate::parse(42, "muted", "frobnicate"),
        Err(AttributeError::InvalidBoolean("frobnicate".to_string()))
    );
    assert_eq!(
        DeviceAttributeUpdate::parse(42, "volume", "loud"),
        Err(AttributeError::InvalidInteger("loud".to_string()))
    );
    assert_eq!(
        DeviceAttributeUpdate::parse(42, "typeID", "1.5"),
        Err(AttributeError::InvalidInteger("1.5".to_string()))
    );
}

#[test]
fn every_attribute_value_matches_its_kind() {
    let samples = [
        (AttributeKind::Text, "anything"),
        (AttributeKind::Integer, "-3"),
        (AttributeKind::Boolean, "false"),
    ];
    for attribute in DeviceAttribute::ALL {
        let (_, raw) = samples
            .iter()
            .find(|(kind, _)| *kind == attribute.kind())
            .expect("sample");
        let update = DeviceAttributeUpdate::parse(1, attribute.field(), raw).expect("parse");
        assert_eq!(update.value.kind(), attribute.kind());
    }
}

#[test]
fn device_location_displays_joined() {
    let location = DeviceLocation::new("JKB", "101", "D1");
    assert_eq!(location.to_string(), "JKB-101-D1");
    assert_eq!(location.room_location().room, "101");
}
