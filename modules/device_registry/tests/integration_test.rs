//! Integration tests for the device_registry module.
//!
//! Each test runs on a fresh in-memory SQLite DB with migrations applied.
//! The service is built on the SeaORM-backed repository and consumed through
//! the local client, the same way the binary wires it.

use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

use device_registry::{
    config::DeviceRegistryConfig,
    contract::{client::DeviceRegistryApi, error::ErrorKind, model::*},
    domain::repo::{DevicesRepository, InsertOutcome, PassportsRepository},
    infra::storage::sea_orm_repo::SeaOrmRegistryRepository,
    DeviceRegistry,
};

/// One connection keeps the in-memory database alive for the whole test.
async fn create_test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    Database::connect(opts)
        .await
        .expect("Failed to connect to test database")
}

async fn create_test_client() -> Arc<dyn DeviceRegistryApi> {
    let db = create_test_db().await;
    let registry = DeviceRegistry::default();
    registry.migrate(&db).await.expect("Failed to run migrations");
    registry
        .init(db, &DeviceRegistryConfig::default())
        .await
        .expect("Failed to init registry");
    registry.client().expect("client")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_passport(prefix: &str, from: i64, to: i64, months: u32) -> NewPassport {
    NewPassport {
        name: format!("{prefix} series"),
        model: format!("{prefix}-model"),
        serial_prefix: prefix.to_string(),
        from_serial_number: from,
        to_serial_number: to,
        warranty_months: months,
    }
}

fn anonymous(serial: &str, purchase_date: NaiveDate) -> NewDevice {
    NewDevice {
        serial_number: serial.to_string(),
        purchase_date,
        owner_id: None,
    }
}

#[tokio::test]
async fn resolves_serials_inside_the_range() {
    let client = create_test_client().await;
    let passport = client
        .create_passport(new_passport("AB", 100, 999, 6))
        .await
        .unwrap();

    for serial in ["AB150", "AB100", "AB999"] {
        let resolved = client.resolve_passport(serial).await.unwrap();
        assert_eq!(resolved.id, passport.id, "{serial}");
    }

    for serial in ["AB099", "AB1000", "AB", "XY150", ""] {
        let err = client.resolve_passport(serial).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound, "{serial}");
    }

    let err = client.resolve_passport("AB099").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Passport not found for serial number: AB099"
    );
}

#[tokio::test]
async fn very_long_serial_is_not_found() {
    let client = create_test_client().await;
    client
        .create_passport(new_passport("AB", 100, 999, 6))
        .await
        .unwrap();
    let serial = format!("AB{}", "1".repeat(40_000));

    let err = client.resolve_passport(&serial).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(
        err.to_string(),
        format!("Passport not found for serial number: {serial}")
    );

    let err = client
        .register_device(anonymous(&serial, date(2025, 2, 1)))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn resolution_considers_every_leading_prefix() {
    let client = create_test_client().await;
    let short = client
        .create_passport(new_passport("A", 1, 50, 12))
        .await
        .unwrap();
    let long = client
        .create_passport(new_passport("AB", 1, 50, 24))
        .await
        .unwrap();

    // "AB7" parses as "B7" under "A", which is skipped.
    assert_eq!(client.resolve_passport("AB7").await.unwrap().id, long.id);
    assert_eq!(client.resolve_passport("A7").await.unwrap().id, short.id);

    let candidates = client.passports_for_serial("AB7").await.unwrap();
    let ids: Vec<_> = candidates.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![short.id, long.id]);
}

#[tokio::test]
async fn overlapping_ranges_are_rejected_per_prefix() {
    let client = create_test_client().await;
    client
        .create_passport(new_passport("AB", 100, 999, 6))
        .await
        .unwrap();

    let err = client
        .create_passport(new_passport("AB", 500, 600, 6))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(err.to_string(), "Serial number already exists");

    // Touching the boundary is still an overlap.
    let err = client
        .create_passport(new_passport("AB", 999, 1500, 6))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);

    client
        .create_passport(new_passport("CD", 500, 600, 6))
        .await
        .unwrap();
    client
        .create_passport(new_passport("AB", 1000, 1500, 6))
        .await
        .unwrap();

    assert!(client
        .validate_passport_range("AB", 1501, 2000, None)
        .await
        .is_ok());
    let err = client
        .validate_passport_range("AB", 0, 100, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
}

#[tokio::test]
async fn invalid_passports_fail_validation() {
    let client = create_test_client().await;

    let cases = [
        new_passport("AB", 10, 5, 6),
        new_passport("AB", -1, 5, 6),
        new_passport("", 1, 5, 6),
        new_passport("A-B", 1, 5, 6),
        NewPassport {
            name: "   ".to_string(),
            ..new_passport("AB", 1, 5, 6)
        },
    ];
    for case in cases {
        let err = client.create_passport(case.clone()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{case:?}");
    }
}

#[tokio::test]
async fn update_may_overlap_itself_but_not_others() {
    let client = create_test_client().await;
    let first = client
        .create_passport(new_passport("AB", 100, 999, 6))
        .await
        .unwrap();
    let second = client
        .create_passport(new_passport("AB", 1000, 1999, 6))
        .await
        .unwrap();

    let grown = client
        .update_passport(
            first.id,
            PassportPatch {
                from_serial_number: Some(50),
                name: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(grown.from_serial_number, 50);
    assert_eq!(grown.to_serial_number, 999);
    assert_eq!(grown.name, "Renamed");
    assert_eq!(client.get_passport(first.id).await.unwrap(), grown);

    let err = client
        .update_passport(
            second.id,
            PassportPatch {
                from_serial_number: Some(900),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);

    let err = client
        .update_passport(4242, PassportPatch::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "Passport not found");
}

#[tokio::test]
async fn device_lifecycle_recomputes_warranty() {
    let client = create_test_client().await;
    let passport = client
        .create_passport(new_passport("AB", 100, 999, 6))
        .await
        .unwrap();

    let device = client
        .register_device(anonymous("AB150", date(2025, 2, 1)))
        .await
        .unwrap();
    assert_eq!(device.passport_id, passport.id);
    assert_eq!(device.owner_id, None);
    assert_eq!(device.comment, None);
    assert_eq!(device.warranty_expiration_date, date(2025, 8, 1));

    let owner = Uuid::new_v4();
    let owned = client
        .update_device(
            "AB150",
            DevicePatch {
                owner_id: Some(Some(owner)),
                comment: Some("gift".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(owned.owner_id, Some(owner));
    assert_eq!(owned.warranty_expiration_date, date(2026, 8, 1));

    let stored = client.get_device("AB150").await.unwrap();
    assert_eq!(stored, owned);

    // Dropping the owner removes the extension again.
    let released = client
        .update_device(
            "AB150",
            DevicePatch {
                owner_id: Some(None),
                purchase_date: Some(date(2025, 3, 1)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(released.owner_id, None);
    assert_eq!(released.comment.as_deref(), Some("gift"));
    assert_eq!(released.warranty_expiration_date, date(2025, 9, 1));
}

#[tokio::test]
async fn registered_device_gets_owner_extension() {
    let client = create_test_client().await;
    client
        .create_passport(new_passport("ZX", 1, 10, 24))
        .await
        .unwrap();

    let device = client
        .register_device(NewDevice {
            serial_number: "ZX0007".to_string(),
            purchase_date: date(2025, 1, 1),
            owner_id: Some(Uuid::new_v4()),
        })
        .await
        .unwrap();
    assert_eq!(device.warranty_expiration_date, date(2028, 1, 1));
}

#[tokio::test]
async fn device_registration_errors() {
    let client = create_test_client().await;
    client
        .create_passport(new_passport("AB", 100, 999, 6))
        .await
        .unwrap();

    client
        .register_device(anonymous("AB150", date(2025, 2, 1)))
        .await
        .unwrap();
    let err = client
        .register_device(anonymous("AB150", date(2025, 2, 1)))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(err.to_string(), "Device already registered");

    let err = client
        .register_device(anonymous("AB5000", date(2025, 2, 1)))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = client.get_device("AB151").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "Device not found");

    let err = client
        .update_device("AB151", DevicePatch::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn deletion_is_blocked_by_dependents() {
    let client = create_test_client().await;
    let passport = client
        .create_passport(new_passport("AB", 100, 999, 6))
        .await
        .unwrap();
    client
        .register_device(anonymous("AB150", date(2025, 2, 1)))
        .await
        .unwrap();

    let err = client.delete_passport(passport.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Failed);
    assert_eq!(err.to_string(), "Can't delete passport");

    let renovation = client
        .add_renovation(NewRenovation {
            serial_number: "AB150".to_string(),
            description: "Battery replaced".to_string(),
            renovation_date: date(2025, 6, 1),
        })
        .await
        .unwrap();
    assert_eq!(renovation.serial_number, "AB150");

    let err = client.delete_device("AB150").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Failed);
    assert_eq!(err.to_string(), "Cannot delete device: renovations exist");

    // Nothing was removed by the failed attempts.
    assert!(client.get_device("AB150").await.is_ok());
    assert!(client.get_passport(passport.id).await.is_ok());
}

#[tokio::test]
async fn deletion_succeeds_without_dependents() {
    let client = create_test_client().await;
    let passport = client
        .create_passport(new_passport("AB", 100, 999, 6))
        .await
        .unwrap();
    client
        .register_device(anonymous("AB150", date(2025, 2, 1)))
        .await
        .unwrap();

    client.delete_device("AB150").await.unwrap();
    let err = client.delete_device("AB150").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    client.delete_passport(passport.id).await.unwrap();
    let err = client.delete_passport(passport.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = client.get_passport(passport.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn renovations_require_a_registered_device() {
    let client = create_test_client().await;
    client
        .create_passport(new_passport("AB", 100, 999, 6))
        .await
        .unwrap();

    let err = client
        .add_renovation(NewRenovation {
            serial_number: "AB150".to_string(),
            description: "Screen".to_string(),
            renovation_date: date(2025, 6, 1),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "Device not registered");

    client
        .register_device(anonymous("AB150", date(2025, 2, 1)))
        .await
        .unwrap();
    for (description, day) in [("Second", 20), ("First", 10)] {
        client
            .add_renovation(NewRenovation {
                serial_number: "AB150".to_string(),
                description: description.to_string(),
                renovation_date: date(2025, 6, day),
            })
            .await
            .unwrap();
    }

    let history = client.list_renovations("AB150").await.unwrap();
    let descriptions: Vec<_> = history.iter().map(|r| r.description.as_str()).collect();
    assert_eq!(descriptions, vec!["First", "Second"]);
}

#[tokio::test]
async fn passports_are_paged_by_id() {
    let client = create_test_client().await;
    for i in 0..5 {
        client
            .create_passport(new_passport("PG", i * 100, i * 100 + 99, 6))
            .await
            .unwrap();
    }

    let page = client.list_passports(PageRequest::new(2, 2)).await.unwrap();
    assert_eq!(page.total_items, 5);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.current_page, 2);
    assert_eq!(page.size, 2);
    let froms: Vec<_> = page.items.iter().map(|p| p.from_serial_number).collect();
    assert_eq!(froms, vec![200, 300]);

    let last = client.list_passports(PageRequest::new(3, 2)).await.unwrap();
    assert_eq!(last.items.len(), 1);

    let past_end = client.list_passports(PageRequest::new(9, 2)).await.unwrap();
    assert!(past_end.items.is_empty());
    assert_eq!(past_end.total_items, 5);

    let first = client.list_passports(PageRequest::new(0, 0)).await.unwrap();
    assert_eq!(first.current_page, 1);
    assert_eq!(first.size, 1);
}

#[tokio::test]
async fn devices_can_be_searched() {
    let client = create_test_client().await;
    client
        .create_passport(new_passport("AB", 100, 999, 6))
        .await
        .unwrap();
    for serial in ["AB300", "AB100", "AB200"] {
        client
            .register_device(anonymous(serial, date(2025, 2, 1)))
            .await
            .unwrap();
    }
    client
        .update_device(
            "AB300",
            DevicePatch {
                comment: Some("returned by courier".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let all = client
        .list_devices(None, PageRequest::default())
        .await
        .unwrap();
    let serials: Vec<_> = all.items.iter().map(|d| d.serial_number.as_str()).collect();
    assert_eq!(serials, vec!["AB100", "AB200", "AB300"]);

    let by_serial = client
        .list_devices(Some("B2"), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(by_serial.total_items, 1);
    assert_eq!(by_serial.items[0].serial_number, "AB200");

    let by_comment = client
        .list_devices(Some("courier"), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(by_comment.total_items, 1);
    assert_eq!(by_comment.items[0].serial_number, "AB300");

    let blank = client
        .list_devices(Some("  "), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(blank.total_items, 3);
}

#[tokio::test]
async fn search_wildcards_match_literally() {
    let client = create_test_client().await;
    client
        .create_passport(new_passport("AB", 100, 999, 6))
        .await
        .unwrap();
    for serial in ["AB150", "AB250"] {
        client
            .register_device(anonymous(serial, date(2025, 2, 1)))
            .await
            .unwrap();
    }
    client
        .update_device(
            "AB250",
            DevicePatch {
                comment: Some("50% off, box_damaged".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    for term in ["%", "_", "0%", "x_d"] {
        let found = client
            .list_devices(Some(term), PageRequest::default())
            .await
            .unwrap();
        let serials: Vec<_> = found.items.iter().map(|d| d.serial_number.as_str()).collect();
        assert_eq!(serials, vec!["AB250"], "{term}");
    }

    let none = client
        .list_devices(Some("B_5"), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(none.total_items, 0);
}

#[tokio::test]
async fn duplicate_device_insert_keeps_the_first_row() {
    let db = create_test_db().await;
    DeviceRegistry::default()
        .migrate(&db)
        .await
        .expect("Failed to run migrations");
    let repo = SeaOrmRegistryRepository::new(db);

    let passport = PassportsRepository::insert(&repo, new_passport("AB", 100, 999, 6))
        .await
        .unwrap();
    let device = |comment: &str| Device {
        serial_number: "AB150".to_string(),
        passport_id: passport.id,
        purchase_date: date(2025, 2, 1),
        owner_id: None,
        comment: Some(comment.to_string()),
        warranty_expiration_date: date(2025, 8, 1),
    };

    let first = DevicesRepository::insert(&repo, device("first")).await.unwrap();
    let second = DevicesRepository::insert(&repo, device("second")).await.unwrap();
    assert_eq!(first, InsertOutcome::Inserted);
    assert_eq!(second, InsertOutcome::Duplicate);

    let (rows, total) = DevicesRepository::list(&repo, None, 0, 10).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(rows[0].comment.as_deref(), Some("first"));
}

#[tokio::test]
async fn compute_expiration_through_the_client() {
    let client = create_test_client().await;
    let purchase = date(2025, 2, 1);
    assert_eq!(client.compute_expiration(purchase, 6, false), date(2025, 8, 1));
    assert_eq!(client.compute_expiration(purchase, 6, true), date(2026, 8, 1));
}

#[tokio::test]
async fn uninitialized_registry_has_no_client() {
    let registry = DeviceRegistry::default();
    assert!(registry.client().is_err());
    assert!(registry.service().is_err());
}
