use ship_alloc::{MemoryStore, ShipmentEngine, ShipmentError, ShipmentService, SplitError};

async fn engine_with_root(weight: u64) -> (ShipmentEngine<MemoryStore>, u64) {
    let engine = ShipmentEngine::new(MemoryStore::new());
    let root = engine.create_root_shipment(weight).await.unwrap();
    (engine, root.id)
}

fn split_error(err: ShipmentError) -> SplitError {
    match err {
        ShipmentError::Split(e) => e,
        other => panic!("expected a split error, got {:?}", other),
    }
}

async fn child_weights(engine: &ShipmentEngine<MemoryStore>, root_id: u64) -> Vec<u64> {
    let root = engine.root_shipment(root_id).await.unwrap();
    let mut weights = Vec::new();
    for id in root.split_shipments {
        weights.push(engine.standard_shipment(id).await.unwrap().weight);
    }
    weights
}

#[tokio::test]
async fn test_split_into_single_share() {
    let (engine, root_id) = engine_with_root(1000).await;

    assert_eq!(engine.split(root_id, "1000").await.unwrap(), 1);
    assert_eq!(child_weights(&engine, root_id).await, vec![1000]);
}

#[tokio::test]
async fn test_split_keeps_entry_order() {
    let (engine, root_id) = engine_with_root(1000).await;

    assert_eq!(engine.split(root_id, "500,249,251").await.unwrap(), 3);
    assert_eq!(child_weights(&engine, root_id).await, vec![500, 249, 251]);

    for child in engine.list_standard_shipments().await.unwrap() {
        assert_eq!(child.root_shipment, Some(root_id));
        assert_eq!(child.merged_into, None);
    }
}

#[tokio::test]
async fn test_split_two_shares() {
    let (engine, root_id) = engine_with_root(1000).await;

    assert_eq!(engine.split(root_id, "501,499").await.unwrap(), 2);
    assert_eq!(child_weights(&engine, root_id).await, vec![501, 499]);
}

#[tokio::test]
async fn test_split_sum_below_root_weight_fails() {
    let (engine, root_id) = engine_with_root(1000).await;

    let err = split_error(engine.split(root_id, "333,333,333").await.unwrap_err());
    assert_eq!(
        err,
        SplitError::WeightSumMismatch {
            expected: 1000,
            actual: 999
        }
    );
    assert!(engine.list_standard_shipments().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_split_sum_above_root_weight_fails() {
    let (engine, root_id) = engine_with_root(1000).await;

    let err = split_error(engine.split(root_id, "1001").await.unwrap_err());
    assert!(matches!(err, SplitError::WeightSumMismatch { actual: 1001, .. }));
}

#[tokio::test]
async fn test_second_split_always_fails() {
    let (engine, root_id) = engine_with_root(1000).await;
    engine.split(root_id, "500,500").await.unwrap();

    for weights in ["400,600", "500,500", "1000", "abc"] {
        let err = engine.split(root_id, weights).await.unwrap_err();
        assert!(matches!(err, ShipmentError::Split(_)), "weights {}", weights);
    }

    assert_eq!(child_weights(&engine, root_id).await, vec![500, 500]);
    assert_eq!(engine.list_standard_shipments().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_split_unknown_root() {
    let engine = ShipmentEngine::new(MemoryStore::new());

    let err = split_error(engine.split(99, "10").await.unwrap_err());
    assert_eq!(err, SplitError::RootNotFound(99));
}

#[tokio::test]
async fn test_split_rejects_malformed_lists() {
    let (engine, root_id) = engine_with_root(1000).await;

    for weights in ["", "500,", "500, 500", "-500,1500", "500;500", "5e2,500"] {
        let err = split_error(engine.split(root_id, weights).await.unwrap_err());
        assert_eq!(err, SplitError::MalformedWeightList(weights.to_string()));
    }
}

#[tokio::test]
async fn test_split_rejects_zero_share() {
    let (engine, root_id) = engine_with_root(1000).await;

    let err = split_error(engine.split(root_id, "0,1000").await.unwrap_err());
    assert_eq!(err, SplitError::ZeroWeight);
}

#[tokio::test]
async fn test_share_count_bound() {
    // 35kg 最多 3 份
    let (engine, root_id) = engine_with_root(35).await;

    let err = split_error(engine.split(root_id, "8,9,9,9").await.unwrap_err());
    assert_eq!(
        err,
        SplitError::ShareCountOutOfRange {
            shares: 4,
            weight: 35,
            max_shares: 3
        }
    );

    assert_eq!(engine.split(root_id, "5,10,20").await.unwrap(), 3);
}

#[tokio::test]
async fn test_light_root_cannot_split() {
    let (engine, root_id) = engine_with_root(9).await;

    let err = split_error(engine.split(root_id, "9").await.unwrap_err());
    assert!(matches!(err, SplitError::ShareCountOutOfRange { max_shares: 0, .. }));
}

#[tokio::test]
async fn test_split_even_spreads_leftover() {
    let (engine, root_id) = engine_with_root(1000).await;

    assert_eq!(engine.split_even(root_id, 3).await.unwrap(), 3);
    assert_eq!(child_weights(&engine, root_id).await, vec![334, 333, 333]);
}

#[tokio::test]
async fn test_split_even_checks_share_count() {
    let (engine, root_id) = engine_with_root(100).await;

    assert!(matches!(
        split_error(engine.split_even(root_id, 0).await.unwrap_err()),
        SplitError::ShareCountOutOfRange { shares: 0, .. }
    ));
    assert!(matches!(
        split_error(engine.split_even(root_id, 11).await.unwrap_err()),
        SplitError::ShareCountOutOfRange { shares: 11, .. }
    ));

    assert_eq!(engine.split_even(root_id, 10).await.unwrap(), 10);
    assert!(matches!(
        split_error(engine.split_even(root_id, 2).await.unwrap_err()),
        SplitError::AlreadySplit(_)
    ));
}
