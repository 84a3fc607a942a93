use rust_decimal::Decimal;
use shelf::catalog::item::{Item, ItemPatch, ItemRequest, NewItem};
use shelf::catalog::mapper;
use shelf::catalog::service::CatalogService;
use shelf::core::db::{catalog_db_path, initialize_catalog_db};
use shelf::core::error::ShelfError;
use shelf::core::page::PageRequest;
use std::path::Path;
use std::str::FromStr;
use tempfile::tempdir;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn open_service(root: &Path) -> CatalogService {
    initialize_catalog_db(root).unwrap();
    CatalogService::new(root)
}

fn add(service: &CatalogService, name: &str, price: &str) -> Item {
    service
        .create(&NewItem {
            name: name.to_string(),
            price: dec(price),
        })
        .unwrap()
}

#[test]
fn test_create_then_get_round_trip() {
    let tmp = tempdir().unwrap();
    let service = open_service(tmp.path());

    // 1. Create through the mapper, the way the boundary does it.
    let request = ItemRequest {
        name: "Coffee Mug".to_string(),
        price: dec("12.99"),
    };
    let created = service.create(&mapper::to_item(&request)).unwrap();
    assert!(created.id >= 1);
    assert_eq!(created.name, "Coffee Mug");
    assert_eq!(created.price, dec("12.99"));

    // 2. Point lookup returns the same values.
    let loaded = service.get_or_fail(created.id).unwrap();
    assert_eq!(loaded, created);

    // 3. The read-side projection carries them through unchanged.
    let view = mapper::to_view(&loaded);
    assert_eq!(view.id, created.id);
    assert_eq!(view.price, dec("12.99"));
}

#[test]
fn test_get_or_fail_on_empty_store() {
    let tmp = tempdir().unwrap();
    let service = open_service(tmp.path());

    match service.get_or_fail(999) {
        Err(ShelfError::NotFound(999)) => {}
        other => panic!("expected NotFound(999), got {:?}", other),
    }
}

#[test]
fn test_duplicate_names_are_allowed() {
    let tmp = tempdir().unwrap();
    let service = open_service(tmp.path());

    let first = add(&service, "Coffee Mug", "12.99");
    let second = add(&service, "Coffee Mug", "9.99");
    assert_ne!(first.id, second.id);
}

#[test]
fn test_search_is_case_insensitive_containment() {
    let tmp = tempdir().unwrap();
    let service = open_service(tmp.path());
    let target = add(&service, "TestProduct", "5.00");
    add(&service, "Another", "6.00");

    // Full-name match, folded case.
    let page = service
        .search("testproduct", &PageRequest::default())
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, target.id);

    // Substring match.
    let page = service.search("tes", &PageRequest::default()).unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, target.id);

    // Upper-cased query matches the same row.
    let page = service.search("TESTPRODUCT", &PageRequest::default()).unwrap();
    assert_eq!(page.items.len(), 1);

    // No match at all.
    let page = service.search("mug", &PageRequest::default()).unwrap();
    assert!(page.is_empty());
}

#[test]
fn test_search_empty_query_matches_all() {
    let tmp = tempdir().unwrap();
    let service = open_service(tmp.path());
    add(&service, "TestProduct", "5.00");
    add(&service, "Another", "6.00");

    let page = service.search("", &PageRequest::default()).unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_items, 2);
}

#[test]
fn test_update_patch_preserves_absent_fields() {
    let tmp = tempdir().unwrap();
    let service = open_service(tmp.path());
    let item = add(&service, "Old", "5.00");

    let patch = ItemPatch {
        name: None,
        price: Some(dec("10.00")),
    };
    let updated = service.update(item.id, &patch).unwrap();
    assert_eq!(updated.id, item.id);
    assert_eq!(updated.name, "Old");
    assert_eq!(updated.price, dec("10.00"));

    // The merged state is what got persisted.
    let loaded = service.get_or_fail(item.id).unwrap();
    assert_eq!(loaded, updated);
}

#[test]
fn test_update_missing_id_propagates_not_found() {
    let tmp = tempdir().unwrap();
    let service = open_service(tmp.path());
    add(&service, "Coffee Mug", "12.99");

    let patch = ItemPatch {
        name: Some("Travel Mug".to_string()),
        price: None,
    };
    match service.update(42, &patch) {
        Err(ShelfError::NotFound(42)) => {}
        other => panic!("expected NotFound(42), got {:?}", other),
    }
}

#[test]
fn test_replace_overwrites_both_fields() {
    let tmp = tempdir().unwrap();
    let service = open_service(tmp.path());
    let item = add(&service, "Coffee Mug", "12.99");

    let request = ItemRequest {
        name: "Travel Mug".to_string(),
        price: dec("14.50"),
    };
    let replaced = service.replace(item.id, &request).unwrap();
    assert_eq!(replaced.id, item.id);
    assert_eq!(replaced.name, "Travel Mug");
    assert_eq!(replaced.price, dec("14.50"));
}

#[test]
fn test_delete_is_permanent_and_not_idempotent() {
    let tmp = tempdir().unwrap();
    let service = open_service(tmp.path());
    let item = add(&service, "Coffee Mug", "12.99");

    // First delete succeeds with no returned value.
    service.delete(item.id).unwrap();

    // The item is gone.
    match service.get_or_fail(item.id) {
        Err(ShelfError::NotFound(id)) => assert_eq!(id, item.id),
        other => panic!("expected NotFound, got {:?}", other),
    }

    // Second delete of the same id fails with NotFound.
    match service.delete(item.id) {
        Err(ShelfError::NotFound(id)) => assert_eq!(id, item.id),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

/// When the persist step fails mid-update, the pre-update state must stay
/// visible: the load-merge-save sequence commits as a unit or not at all.
#[cfg(unix)]
#[test]
fn test_update_rolls_back_when_persist_fails() {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempdir().unwrap();
    let service = open_service(tmp.path());
    let item = add(&service, "Old", "5.00");

    let db_path = catalog_db_path(tmp.path());
    let writable = fs::metadata(&db_path).unwrap().permissions();
    fs::set_permissions(&db_path, fs::Permissions::from_mode(0o444)).unwrap();

    let patch = ItemPatch {
        name: None,
        price: Some(dec("10.00")),
    };
    assert!(service.update(item.id, &patch).is_err());

    fs::set_permissions(&db_path, writable).unwrap();
    let loaded = service.get_or_fail(item.id).unwrap();
    assert_eq!(loaded.name, "Old");
    assert_eq!(loaded.price, dec("5.00"));
}

#[test]
fn test_broker_records_audit_events() {
    let tmp = tempdir().unwrap();
    let service = open_service(tmp.path());
    add(&service, "Coffee Mug", "12.99");

    let log = tmp.path().join(".shelf").join("data").join("broker.events.jsonl");
    let content = std::fs::read_to_string(log).unwrap();
    let ops: Vec<String> = content
        .lines()
        .map(|line| {
            let ev: serde_json::Value = serde_json::from_str(line).unwrap();
            ev["op"].as_str().unwrap().to_string()
        })
        .collect();
    assert!(ops.contains(&"catalog.init".to_string()));
    assert!(ops.contains(&"catalog.create".to_string()));
}
