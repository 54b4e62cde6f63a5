//! File-backed service: state survives reopening
mod common;

use chrono::Duration;
use common::{file_service, open_in, today};
use food_expiry::{Config, ExpiryError};

// 再オープン後もアイテムと削除マークが保持されることを確認
#[test]
fn test_items_and_deletion_marks_survive_reopen() {
    let config = Config::default();
    let (service, clock, dir) = file_service(&config);
    let milk = service.insert("Milk", today()).unwrap();
    let eggs = service.insert("Eggs", today()).unwrap();
    service.soft_delete(eggs).unwrap();
    drop(service);

    let reopened = open_in(&dir, &config, clock.clone());
    assert_eq!(reopened.get(milk).unwrap().name(), "Milk");
    assert!(!reopened.get(eggs).unwrap().is_live());

    // The undo window keeps running across a restart
    reopened.undo(eggs).unwrap();
    assert_eq!(reopened.grouped().unwrap()[0].items.len(), 2);
}

// 再オープン後も通知履歴が保持され、再送されないことを確認
#[test]
fn test_reminder_state_survives_reopen() {
    let config = Config::default();
    let (service, clock, dir) = file_service(&config);
    service.insert("Milk", today()).unwrap();
    assert_eq!(service.tick().unwrap().len(), 1);
    drop(service);

    let reopened = open_in(&dir, &config, clock.clone());
    assert!(reopened.tick().unwrap().is_empty());
}

// パージ結果がファイルに保存され、IDが再利用されないことを確認
#[test]
fn test_purge_is_persisted() {
    let config = Config::default();
    let (service, clock, dir) = file_service(&config);
    let id = service.insert("Milk", today()).unwrap();
    service.soft_delete(id).unwrap();

    clock.advance(Duration::minutes(1));
    assert_eq!(service.purge_expired().unwrap(), vec![id]);
    drop(service);

    let reopened = open_in(&dir, &config, clock.clone());
    assert!(reopened.list_all().is_empty());
    // Ids are never reused
    assert_ne!(reopened.insert("Milk", today()).unwrap(), id);
}

// 保存に失敗した変更は適用されないことを確認
#[test]
fn test_failed_save_does_not_apply_mutation() {
    let config = Config::default();
    let (service, _clock, dir) = file_service(&config);
    let id = service.insert("Milk", today()).unwrap();

    // Replace the data file's directory entry with a directory so writes fail
    let path = dir.path().join("pantry.toml");
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();

    assert!(service.soft_delete(id).is_err());
    assert!(service.get(id).unwrap().is_live());
    assert_eq!(service.grouped().unwrap().len(), 1);
}

// パージの保存に失敗するとエラーが返り、アイテムは削除済みのまま残ることを確認
#[test]
fn test_failed_purge_keeps_item_soft_deleted() {
    let config = Config::default();
    let (service, clock, dir) = file_service(&config);
    let id = service.insert("Milk", today()).unwrap();
    service.soft_delete(id).unwrap();
    clock.advance(Duration::minutes(1));

    let path = dir.path().join("pantry.toml");
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();

    assert!(matches!(
        service.purge_expired(),
        Err(ExpiryError::Storage(_))
    ));
    let item = service.get(id).unwrap();
    assert!(!item.is_live());

    // A later purge succeeds once the file can be written again
    std::fs::remove_dir(&path).unwrap();
    assert_eq!(service.purge_expired().unwrap(), vec![id]);
    assert!(service.get(id).is_none());
}
