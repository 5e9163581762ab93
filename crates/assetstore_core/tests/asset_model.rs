use assetstore_core::{
    Asset, AssetData, AssetIdentity, DuplicateReport, IdentityField, STATUS_LOG_CREATED,
};
use uuid::Uuid;

#[test]
fn asset_new_sets_defaults() {
    let asset = Asset::new(AssetData::default(), 1_700_000_000_000);

    assert!(!asset.id.is_nil());
    assert!(!asset.is_deleted);
    assert!(asset.is_active());
    assert_eq!(asset.status_log, STATUS_LOG_CREATED);
    assert_eq!(asset.created_at, 1_700_000_000_000);
    assert_eq!(asset.updated_at, 1_700_000_000_000);
}

#[test]
fn identity_field_labels_are_fixed() {
    let labels: Vec<_> = IdentityField::ALL.iter().map(|f| f.label()).collect();
    assert_eq!(
        labels,
        vec![
            "Serial Number",
            "MAC Address",
            "PC Name",
            "Employee Number",
            "Username"
        ]
    );
    assert_eq!(IdentityField::MacAddress.to_string(), "MAC Address");
}

#[test]
fn asset_serialization_uses_expected_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let asset = Asset {
        id,
        data: AssetData {
            identity: AssetIdentity {
                serial_number: Some("SN1".to_string()),
                mac_address: Some("AA:BB".to_string()),
                pc_name: None,
                employee_number: Some("E-7".to_string()),
                username: Some("alice".to_string()),
            },
            brand: Some("Dell".to_string()),
            buyback_status: Some("Pending".to_string()),
            ..AssetData::default()
        },
        is_deleted: false,
        status_log: "Created".to_string(),
        created_at: 10,
        updated_at: 20,
    };

    let json = serde_json::to_value(&asset).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["serialNumber"], "SN1");
    assert_eq!(json["macAddress"], "AA:BB");
    assert_eq!(json["pcName"], serde_json::Value::Null);
    assert_eq!(json["employeeNumber"], "E-7");
    assert_eq!(json["username"], "alice");
    assert_eq!(json["buybackStatus"], "Pending");
    assert_eq!(json["isDeleted"], false);
    assert_eq!(json["statusLog"], "Created");
    assert_eq!(json["createdAt"], 10);
    assert_eq!(json["updatedAt"], 20);

    let decoded: Asset = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, asset);
}

#[test]
fn duplicate_report_serializes_field_labels() {
    let report = DuplicateReport {
        is_duplicate: true,
        duplicate_fields: vec![IdentityField::PcName, IdentityField::SerialNumber],
        existing_assets: Vec::new(),
    };

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["isDuplicate"], true);
    assert_eq!(
        json["duplicateFields"],
        serde_json::json!(["PC Name", "Serial Number"])
    );
    assert_eq!(json["existingAssets"], serde_json::json!([]));
}
