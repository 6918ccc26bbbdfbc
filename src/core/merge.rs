use crate::core::input::parse_integer_list;
use crate::core::tables::UnitOfWork;
use crate::domain::model::{Kilograms, MergedShipment, ShipmentId, StandardShipment};
use crate::domain::ports::Repository;
use crate::utils::error::{MergeError, Result};
use std::collections::HashSet;

/// 合併至少兩筆子運單，回傳新建立的合併運單 id。
///
/// 子運單一生只能被合併一次；清單中任何一筆已合併過，整個操作失敗。
pub fn merge(uow: &mut UnitOfWork, id_list: &str) -> Result<ShipmentId> {
    let ids = parse_integer_list(id_list).ok_or_else(|| {
        tracing::debug!("Shipment ids [{}] format error when merging shipments", id_list);
        MergeError::MalformedIdList(id_list.to_string())
    })?;

    if ids.len() < 2 {
        tracing::debug!("At least 2 shipments can be merged, got {}", ids.len());
        return Err(MergeError::TooFewShipments(ids.len()).into());
    }

    let mut seen = HashSet::with_capacity(ids.len());
    for &id in &ids {
        if id == 0 {
            return Err(MergeError::ZeroId.into());
        }
        if !seen.insert(id) {
            tracing::debug!("Shipment [{}] is listed twice when merging shipments", id);
            return Err(MergeError::DuplicateShipment(id).into());
        }
    }

    let mut members: Vec<StandardShipment> = Vec::with_capacity(ids.len());
    let mut total: Kilograms = 0;
    for &id in &ids {
        let shipment = uow.standards().find_by_id(id).ok_or_else(|| {
            tracing::debug!("Shipment [{}] was not found when merging shipments", id);
            MergeError::ShipmentNotFound(id)
        })?;

        if let Some(merged_into) = shipment.merged_into {
            tracing::debug!(
                "Found shipment [{}] merged into [{}] before when merging shipments",
                id,
                merged_into
            );
            return Err(MergeError::AlreadyMerged {
                shipment: id,
                merged_into,
            }
            .into());
        }

        total += shipment.weight;
        members.push(shipment.clone());
    }

    let merged_id = uow.merged_mut().create(MergedShipment::new(total, ids));

    for mut member in members {
        member.merged_into = Some(merged_id);
        uow.standards_mut().update(member)?;
    }

    tracing::info!(
        "Merged shipment [{}] was created from [{}] with {}kg",
        merged_id,
        id_list,
        total
    );

    Ok(merged_id)
}
