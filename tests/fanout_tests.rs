//! Fan-out core through the public API: store → change feed → send-events → hub

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use tokio::time::timeout;

use hotseat::broadcast::{BroadcastDispatcher, Hub, HubMessage, SendEvents, EVENT_CREATED};
use hotseat::event_store::{EventStore, EventStoreConfig};
use hotseat::types::{Event, StoredRecord};

fn open_store(dir: &TempDir) -> EventStore {
    EventStore::open(EventStoreConfig::new(dir.path())).unwrap()
}

#[tokio::test]
async fn test_batch_commit_fans_out_one_message_per_record() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let hub = Arc::new(Hub::new(64));
    let mut rx = hub.subscribe().unwrap();
    SendEvents::new(BroadcastDispatcher::new(Arc::clone(&hub))).spawn(store.subscribe());

    let committed = store
        .append_batch(vec![
            Event::new("note", json!({"message": "a"})),
            Event::new("vote", json!({"message": "b"})),
            Event::new("note", json!({"message": "c"})),
        ])
        .unwrap();

    for record in &committed {
        let frame = timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
        let msg = HubMessage::from_json(&frame).unwrap();
        assert_eq!(msg.target, EVENT_CREATED);
        assert_eq!(msg.arguments.len(), 1);

        let received: StoredRecord = serde_json::from_value(msg.arguments[0].clone()).unwrap();
        assert_eq!(&received, record);
    }
    assert_eq!(hub.published_count(), 3);
}

#[tokio::test]
async fn test_records_before_trigger_are_not_rebroadcast() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    store.append(Event::new("note", json!({"message": "old"}))).unwrap();

    let hub = Arc::new(Hub::new(64));
    let mut rx = hub.subscribe().unwrap();
    SendEvents::new(BroadcastDispatcher::new(Arc::clone(&hub))).spawn(store.subscribe());

    store.append(Event::new("note", json!({"message": "new"}))).unwrap();

    let frame = timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
    let msg = HubMessage::from_json(&frame).unwrap();
    assert_eq!(msg.arguments[0]["data"]["message"], "new");
    assert_eq!(hub.published_count(), 1);
}

#[tokio::test]
async fn test_two_hubs_each_see_every_commit() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let hubs: Vec<Arc<Hub>> = (0..2).map(|_| Arc::new(Hub::new(64))).collect();
    let mut receivers: Vec<_> = hubs.iter().map(|hub| hub.subscribe().unwrap()).collect();
    for hub in &hubs {
        SendEvents::new(BroadcastDispatcher::new(Arc::clone(hub))).spawn(store.subscribe());
    }

    let record = store.append(Event::new("note", json!({"message": "x"}))).unwrap();

    for rx in &mut receivers {
        let frame = timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
        let msg = HubMessage::from_json(&frame).unwrap();
        assert_eq!(msg.arguments[0]["id"], record.id.as_str());
    }
}
