use crate::core::input::parse_integer_list;
use crate::core::tables::UnitOfWork;
use crate::domain::model::{Kilograms, RootShipment, ShipmentId, StandardShipment};
use crate::domain::ports::Repository;
use crate::utils::error::{Result, SplitError};

/// 每份至少 10kg，避免後續按比例調整時被截成 0
pub const MIN_SHARE_WEIGHT: Kilograms = 10;

/// 依重量清單拆分頂層運單，回傳建立的子運單數。
///
/// 例如 1000kg 的運單：
/// - `"1000"`、`"501,499"`、`"500,249,251"` 都可以；
/// - `"333,333,333"`（合計 999kg）與 `"1001"` 會被拒絕；
/// - 已拆分過的運單不能再拆。
pub fn split(uow: &mut UnitOfWork, root_id: ShipmentId, weight_list: &str) -> Result<usize> {
    let root = find_root(uow, root_id)?;

    let weights = parse_integer_list(weight_list).ok_or_else(|| {
        tracing::debug!("Weight list [{}] format error when splitting shipments", weight_list);
        SplitError::MalformedWeightList(weight_list.to_string())
    })?;

    split_root(uow, root, weights)
}

/// 平均拆成 `shares` 份，除不盡的公斤數從第一份開始逐份加 1
pub fn split_even(uow: &mut UnitOfWork, root_id: ShipmentId, shares: usize) -> Result<usize> {
    let root = find_root(uow, root_id)?;
    check_share_count(&root, shares)?;

    let weights = even_shares(root.weight, shares);
    split_root(uow, root, weights)
}

/// 將重量平均分成 `shares` 份，總和等於 `weight`
pub fn even_shares(weight: Kilograms, shares: usize) -> Vec<Kilograms> {
    if shares == 0 {
        return Vec::new();
    }

    let count = shares as Kilograms;
    let per_share = weight / count;
    let leftover = (weight % count) as usize;

    (0..shares)
        .map(|i| if i < leftover { per_share + 1 } else { per_share })
        .collect()
}

fn find_root(uow: &UnitOfWork, root_id: ShipmentId) -> Result<RootShipment> {
    match uow.roots().find_by_id(root_id) {
        Some(root) => Ok(root.clone()),
        None => {
            tracing::debug!("Root shipment [{}] was not found", root_id);
            Err(SplitError::RootNotFound(root_id).into())
        }
    }
}

fn check_share_count(root: &RootShipment, shares: usize) -> Result<()> {
    let max_shares = root.weight / MIN_SHARE_WEIGHT;
    if shares < 1 || shares as u64 > max_shares {
        tracing::debug!(
            "Cannot split root shipment [{}] of {}kg into {} shares",
            root.id,
            root.weight,
            shares
        );
        return Err(SplitError::ShareCountOutOfRange {
            shares,
            weight: root.weight,
            max_shares,
        }
        .into());
    }
    Ok(())
}

fn split_root(uow: &mut UnitOfWork, mut root: RootShipment, weights: Vec<Kilograms>) -> Result<usize> {
    if weights.contains(&0) {
        tracing::debug!("Weight list for root shipment [{}] contains a zero weight", root.id);
        return Err(SplitError::ZeroWeight.into());
    }

    check_share_count(&root, weights.len())?;

    if root.is_split() {
        tracing::debug!("Root shipment [{}] was split before", root.id);
        return Err(SplitError::AlreadySplit(root.id).into());
    }

    let total = weights
        .iter()
        .fold(0 as Kilograms, |sum, weight| sum.saturating_add(*weight));
    if total != root.weight {
        tracing::debug!(
            "Split weights of root shipment [{}] total {}kg, expected {}kg",
            root.id,
            total,
            root.weight
        );
        return Err(SplitError::WeightSumMismatch {
            expected: root.weight,
            actual: total,
        }
        .into());
    }

    let mut children = Vec::with_capacity(weights.len());
    for weight in weights {
        let child_id = uow
            .standards_mut()
            .create(StandardShipment::split_from(root.id, weight));
        children.push(child_id);
    }

    let created = children.len();
    tracing::info!(
        "Root shipment [{}] of {}kg was split into {} standard shipments",
        root.id,
        root.weight,
        created
    );

    root.split_shipments = children;
    uow.roots_mut().update(root)?;

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_shares_keep_the_total() {
        assert_eq!(even_shares(1000, 3), vec![334, 333, 333]);
        assert_eq!(even_shares(1000, 4), vec![250, 250, 250, 250]);
        assert_eq!(even_shares(25, 2), vec![13, 12]);
        assert!(even_shares(100, 0).is_empty());
    }

    #[test]
    fn test_share_count_limit() {
        let mut root = RootShipment::new(35);
        root.id = 1;

        assert!(check_share_count(&root, 1).is_ok());
        assert!(check_share_count(&root, 3).is_ok());
        assert!(check_share_count(&root, 4).is_err());
        assert!(check_share_count(&root, 0).is_err());
    }

    #[test]
    fn test_root_lighter_than_one_share_cannot_split() {
        let mut root = RootShipment::new(9);
        root.id = 1;

        let err = check_share_count(&root, 1).unwrap_err();
        assert!(err.to_string().contains("allowed: 1..=0"));
    }
}
