use crate::core::reweigh::MAX_ROOT_WEIGHT;
use crate::core::tables::UnitOfWork;
use crate::domain::model::{Entity, Kilograms, RootShipment, ShipmentId};
use crate::domain::ports::Repository;
use crate::utils::error::{Result, ShipmentError};
use crate::utils::validation::validate_range;

/// 建立尚未拆分的頂層運單
pub fn create_root(uow: &mut UnitOfWork, weight: Kilograms) -> Result<RootShipment> {
    validate_range("weight", weight, 1, MAX_ROOT_WEIGHT as Kilograms)?;

    let id = uow.roots_mut().create(RootShipment::new(weight));
    tracing::info!("Root shipment [{}] was created with {}kg", id, weight);

    uow.roots()
        .find_by_id(id)
        .cloned()
        .ok_or_else(|| ShipmentError::not_found(RootShipment::KIND, id))
}

/// 刪除頂層運單及其擁有的子運單，回傳刪除的記錄數。
///
/// 任何子運單已被合併時拒絕刪除。
pub fn delete_root(uow: &mut UnitOfWork, root_id: ShipmentId) -> Result<usize> {
    let root = uow
        .roots()
        .find_by_id(root_id)
        .cloned()
        .ok_or_else(|| ShipmentError::not_found(RootShipment::KIND, root_id))?;

    for child_id in &root.split_shipments {
        let merged_into = uow
            .standards()
            .find_by_id(*child_id)
            .and_then(|child| child.merged_into);
        if let Some(merged_id) = merged_into {
            return Err(ShipmentError::StillReferenced {
                entity: RootShipment::KIND,
                id: root_id,
                reason: format!(
                    "standard shipment [{}] is part of merged shipment [{}]",
                    child_id, merged_id
                ),
            });
        }
    }

    let mut deleted = 0;
    for child_id in &root.split_shipments {
        if uow.standards_mut().delete(*child_id).is_some() {
            deleted += 1;
        }
    }
    uow.roots_mut().delete(root_id);
    deleted += 1;

    tracing::info!(
        "Root shipment [{}] was deleted with {} standard shipments",
        root_id,
        root.split_shipments.len()
    );
    Ok(deleted)
}
