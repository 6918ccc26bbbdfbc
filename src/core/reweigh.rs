use crate::core::tables::{ShipmentTables, UnitOfWork};
use crate::domain::model::{Entity, Kilograms, ShipmentId, StandardShipment};
use crate::domain::ports::Repository;
use crate::utils::error::{MergeError, Result, ShipmentError, SplitError};
use std::collections::BTreeSet;

pub const MAX_ROOT_WEIGHT: i64 = 1_000_000_000;

/// 調整頂層運單重量，子運單按比例重新分配，再重算受影響的合併運單。
///
/// 6000kg 拆成 1000/2000/3000kg：
/// - 改成 12000kg 後子運單為 2000/4000/6000kg；
/// - 再改成 2000kg 後為 333/666/1001kg，截斷剩下的 1kg 加到最重的一份，
///   同重時給 id 最大的一份。
pub fn change_weight(uow: &mut UnitOfWork, root_id: ShipmentId, new_weight: i64) -> Result<usize> {
    let mut root = match uow.roots().find_by_id(root_id) {
        Some(root) => root.clone(),
        None => {
            tracing::debug!("Root shipment [{}] was not found", root_id);
            return Err(SplitError::RootNotFound(root_id).into());
        }
    };

    if !(1..=MAX_ROOT_WEIGHT).contains(&new_weight) {
        tracing::debug!("Bad weight {} when changing root shipment [{}]", new_weight, root_id);
        return Err(SplitError::WeightOutOfRange(new_weight).into());
    }
    let new_weight = new_weight as Kilograms;

    if !root.is_split() {
        tracing::debug!("Root shipment [{}] was not split before changing its weight", root_id);
        return Err(SplitError::NotSplit(root_id).into());
    }

    let children = root
        .split_shipments
        .iter()
        .map(|id| {
            uow.standards()
                .find_by_id(*id)
                .cloned()
                .ok_or_else(|| ShipmentError::not_found(StandardShipment::KIND, *id))
        })
        .collect::<Result<Vec<_>>>()?;

    // 以下階段不再有驗證失敗
    let new_weights = if children.len() == 1 {
        vec![new_weight]
    } else {
        let current: Vec<(ShipmentId, Kilograms)> =
            children.iter().map(|child| (child.id, child.weight)).collect();
        redistribute(&current, root.weight, new_weight)
    };

    let affected = children.len();
    for (mut child, weight) in children.into_iter().zip(new_weights) {
        tracing::info!(
            "Change split shipment [{}] weight from [{}] to [{}]",
            child.id,
            child.weight,
            weight
        );
        child.weight = weight;
        uow.standards_mut().update(child)?;
    }

    remerge_children(uow, &root.split_shipments)?;

    tracing::info!(
        "Update root shipment [{}] weight from [{}] to [{}]",
        root.id,
        root.weight,
        new_weight
    );
    root.weight = new_weight;
    uow.roots_mut().update(root)?;

    Ok(affected)
}

/// 按比例計算新重量，順序與 `children` 相同。
///
/// 每份為 `floor(new_total * weight / old_total)`；截斷後的差額加到新重量最大的一份，
/// 同重時取 id 最大者。
pub fn redistribute(
    children: &[(ShipmentId, Kilograms)],
    old_total: Kilograms,
    new_total: Kilograms,
) -> Vec<Kilograms> {
    let mut weights = Vec::with_capacity(children.len());
    let mut sum: Kilograms = 0;
    // (index, weight, id)
    let mut largest: Option<(usize, Kilograms, ShipmentId)> = None;

    for (index, &(id, weight)) in children.iter().enumerate() {
        // 整數運算，結果即 floor
        let scaled = (new_total as u128 * weight as u128 / old_total as u128) as Kilograms;
        sum += scaled;

        let replace = match largest {
            None => true,
            Some((_, max_weight, max_id)) => {
                scaled > max_weight || (scaled == max_weight && id > max_id)
            }
        };
        if replace {
            largest = Some((index, scaled, id));
        }

        weights.push(scaled);
    }

    let remainder = new_total as i128 - sum as i128;
    if remainder > 0 {
        if let Some((index, _, id)) = largest {
            tracing::debug!(
                "Add remainder {}kg to standard shipment [{}]",
                remainder,
                id
            );
            weights[index] += remainder as Kilograms;
        }
    } else if remainder < 0 {
        // 截斷只會少算，不會多算
        tracing::warn!(
            "Scaled weights exceed the new total by {}kg, left uncorrected",
            -remainder
        );
    }

    weights
}

/// 依成員目前的重量重算合併運單重量
pub fn recompute_merged_weight(merged_id: ShipmentId, tables: &ShipmentTables) -> Result<Kilograms> {
    let merged = tables
        .merged_shipments
        .find_by_id(merged_id)
        .ok_or(MergeError::MergedShipmentNotFound(merged_id))?;

    merged
        .merged_from
        .iter()
        .try_fold(0 as Kilograms, |total, member_id| -> Result<Kilograms> {
            let member = tables
                .standard_shipments
                .find_by_id(*member_id)
                .ok_or(MergeError::ShipmentNotFound(*member_id))?;
            Ok(total + member.weight)
        })
}

fn remerge_children(uow: &mut UnitOfWork, children: &[ShipmentId]) -> Result<()> {
    let merged_ids: BTreeSet<ShipmentId> = children
        .iter()
        .filter_map(|id| uow.standards().find_by_id(*id))
        .filter_map(|child| child.merged_into)
        .collect();

    for merged_id in merged_ids {
        let weight = recompute_merged_weight(merged_id, uow.tables())?;
        let mut merged = uow
            .merged()
            .find_by_id(merged_id)
            .cloned()
            .ok_or(MergeError::MergedShipmentNotFound(merged_id))?;

        tracing::info!(
            "Merged shipment [{}] was updated from [{}] to [{}]",
            merged_id,
            merged.weight,
            weight
        );
        merged.weight = weight;
        uow.merged_mut().update(merged)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redistribute_doubles_exactly() {
        let children = [(1, 1000), (2, 2000), (3, 3000)];
        assert_eq!(redistribute(&children, 6000, 12000), vec![2000, 4000, 6000]);
    }

    #[test]
    fn test_same_total_keeps_weights() {
        assert_eq!(redistribute(&[(1, 29), (2, 71)], 100, 100), vec![29, 71]);
        assert_eq!(redistribute(&[(1, 7), (2, 13), (3, 80)], 100, 100), vec![7, 13, 80]);
    }

    #[test]
    fn test_large_totals_scale_exactly() {
        let children = [(1, 1000), (2, 2000), (3, 3000)];
        assert_eq!(
            redistribute(&children, 6000, 1_000_000_000),
            vec![166_666_666, 333_333_333, 500_000_001]
        );
    }

    #[test]
    fn test_remainder_goes_to_largest_share() {
        let children = [(1, 1000), (2, 2000), (3, 3000)];
        assert_eq!(redistribute(&children, 6000, 2000), vec![333, 666, 1001]);
    }

    #[test]
    fn test_remainder_tie_goes_to_greatest_id() {
        let children = [(7, 500), (4, 500), (9, 500), (2, 500)];
        // 每份 0.25 * 1001 = 250.25，差額 1kg
        assert_eq!(redistribute(&children, 2000, 1001), vec![250, 250, 251, 250]);
    }

    #[test]
    fn test_all_shares_truncated_to_zero() {
        let children = [(1, 1000), (2, 2000), (3, 3000)];
        assert_eq!(redistribute(&children, 6000, 2), vec![0, 0, 2]);
    }

    #[test]
    fn test_redistribute_keeps_total() {
        let children = [(1, 10), (2, 20), (3, 30), (4, 40)];
        for target in [1u64, 7, 99, 100, 101, 12345, 999_999_999] {
            let weights = redistribute(&children, 100, target);
            assert_eq!(weights.iter().sum::<u64>(), target, "target {}", target);
        }
    }
}
