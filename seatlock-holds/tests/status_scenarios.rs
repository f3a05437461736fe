use async_trait::async_trait;
use seatlock_core::{
    ClaimStatus, CoreResult, InventorySeat, InventorySource, LeaseStore, SeatRequest, SeatStatus,
};
use seatlock_holds::{SeatHoldManager, StatusResolver};
use seatlock_store::MemoryLeaseStore;
use std::sync::Arc;

fn setup() -> (Arc<MemoryLeaseStore>, SeatHoldManager, StatusResolver) {
    let store = Arc::new(MemoryLeaseStore::new());
    let manager = SeatHoldManager::new(store.clone());
    let resolver = StatusResolver::new(manager.clone());
    (store, manager, resolver)
}

struct FixedInventory(Vec<InventorySeat>);

#[async_trait]
impl InventorySource for FixedInventory {
    async fn list_seats(&self) -> CoreResult<Vec<InventorySeat>> {
        Ok(self.0.clone())
    }
}

fn seat(seat_id: &str, baseline_status: SeatStatus) -> InventorySeat {
    InventorySeat {
        seat_id: seat_id.to_string(),
        section_id: "s1".to_string(),
        baseline_status,
    }
}

#[tokio::test]
async fn test_precedence() {
    let (_store, manager, resolver) = setup();

    assert_eq!(resolver.resolve_one("A1").await.unwrap(), None);

    manager.create_hold("A1", "u1", "bk1", "s1").await.unwrap();
    assert_eq!(resolver.resolve_one("A1").await.unwrap(), Some(ClaimStatus::Hold));

    manager.set_seat_booked("A1").await.unwrap();
    assert!(manager.is_held("A1").await.unwrap());
    assert_eq!(resolver.resolve_one("A1").await.unwrap(), Some(ClaimStatus::Booked));
}

#[tokio::test]
async fn test_batch_matches_single_reads() {
    let (store, manager, resolver) = setup();

    manager.set_seat_booked("B1").await.unwrap();
    manager.create_hold("B2", "u1", "bk1", "s1").await.unwrap();
    let seats = [SeatRequest::new("B3", "s1"), SeatRequest::new("B4", "s1")];
    manager.create_multiple_holds(&seats, "u2", "bk2").await.unwrap();
    manager.create_hold("B5", "u3", "bk3", "s1").await.unwrap();
    manager.set_seat_booked("B5").await.unwrap();
    store.put("seat:status:B7", "PENDING", None).await.unwrap();

    let ids: Vec<String> = ["B1", "B2", "B3", "B4", "B5", "B6", "B7"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let batch = resolver.resolve_many(&ids).await.unwrap();

    for id in &ids {
        let single = resolver.resolve_one(id).await.unwrap();
        assert_eq!(batch.get(id).copied(), single, "mismatch on {}", id);
    }
    assert_eq!(batch.len(), 5);
    assert!(!batch.contains_key("B6"));
    assert!(!batch.contains_key("B7"));
}

#[tokio::test]
async fn test_batch_edge_cases() {
    let (_store, manager, resolver) = setup();
    assert!(resolver.resolve_many(&[]).await.unwrap().is_empty());

    manager.create_hold("A1", "u1", "bk1", "s1").await.unwrap();
    let ids = vec!["A1".to_string(), "A1".to_string()];
    let batch = resolver.resolve_many(&ids).await.unwrap();
    assert_eq!(batch.len(), 1);
    assert_eq!(batch["A1"], ClaimStatus::Hold);

    assert!(resolver.resolve_many(&["".to_string()]).await.is_err());
}

#[tokio::test]
async fn test_seat_map_overrides_baseline() {
    let (_store, manager, resolver) = setup();
    let inventory = FixedInventory(vec![
        seat("C1", SeatStatus::Available),
        seat("C2", SeatStatus::Available),
        seat("C3", SeatStatus::Booked),
        seat("C4", SeatStatus::Hold),
    ]);

    manager.create_hold("C1", "u1", "bk1", "s1").await.unwrap();
    manager.set_seat_booked("C2").await.unwrap();

    let map = resolver.seat_map(&inventory).await.unwrap();
    let statuses: Vec<(&str, SeatStatus)> = map.iter().map(|v| (v.seat_id.as_str(), v.status)).collect();
    assert_eq!(
        statuses,
        vec![
            ("C1", SeatStatus::Hold),
            ("C2", SeatStatus::Booked),
            ("C3", SeatStatus::Booked),
            ("C4", SeatStatus::Hold),
        ]
    );
}
