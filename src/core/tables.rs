use crate::domain::model::{Entity, MergedShipment, RootShipment, ShipmentId, StandardShipment};
use crate::domain::ports::Repository;
use crate::utils::error::{Result, ShipmentError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::OwnedMutexGuard;

fn first_id() -> ShipmentId {
    1
}

/// 單一實體類型的資料表，id 由表自行遞增配發
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct EntityTable<T> {
    #[serde(default = "first_id")]
    next_id: ShipmentId,
    #[serde(default)]
    rows: BTreeMap<ShipmentId, T>,
}

impl<T> Default for EntityTable<T> {
    fn default() -> Self {
        Self {
            next_id: first_id(),
            rows: BTreeMap::new(),
        }
    }
}

impl<T> EntityTable<T> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T: Entity> EntityTable<T> {
    /// 檢查載入的資料：鍵與記錄 id 一致，且 `next_id` 大於所有現有 id
    pub fn check_ids(&self) -> Result<()> {
        if let Some((key, row)) = self.rows.iter().find(|(key, row)| **key != row.id()) {
            return Err(ShipmentError::StorageError {
                message: format!("{} stored under id {} has id {}", T::KIND, key, row.id()),
            });
        }

        match self.rows.keys().next_back() {
            Some(&max_id) if max_id >= self.next_id => Err(ShipmentError::StorageError {
                message: format!(
                    "{} table would hand out id {} but already holds id {}",
                    T::KIND,
                    self.next_id,
                    max_id
                ),
            }),
            _ => Ok(()),
        }
    }
}

impl<T: Entity> Repository<T> for EntityTable<T> {
    fn create(&mut self, mut entity: T) -> ShipmentId {
        let id = self.next_id;
        self.next_id += 1;
        entity.set_id(id);
        self.rows.insert(id, entity);
        id
    }

    fn find_by_id(&self, id: ShipmentId) -> Option<&T> {
        self.rows.get(&id)
    }

    fn update(&mut self, entity: T) -> Result<()> {
        match self.rows.get_mut(&entity.id()) {
            Some(row) => {
                *row = entity;
                Ok(())
            }
            None => Err(ShipmentError::not_found(T::KIND, entity.id())),
        }
    }

    fn delete(&mut self, id: ShipmentId) -> Option<T> {
        self.rows.remove(&id)
    }

    fn list_all(&self) -> Vec<&T> {
        self.rows.values().collect()
    }
}

/// 三張資料表的完整狀態
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentTables {
    #[serde(default)]
    pub root_shipments: EntityTable<RootShipment>,
    #[serde(default)]
    pub standard_shipments: EntityTable<StandardShipment>,
    #[serde(default)]
    pub merged_shipments: EntityTable<MergedShipment>,
}

impl ShipmentTables {
    pub fn check_ids(&self) -> Result<()> {
        self.root_shipments.check_ids()?;
        self.standard_shipments.check_ids()?;
        self.merged_shipments.check_ids()
    }
}

/// 一次交易的工作副本。
///
/// 開始時持有已提交狀態的鎖並複製一份工作副本，所有讀寫都作用在副本上。
/// 只有交給 `ShipmentStore::commit` 才會寫回；中途返回時副本隨之丟棄，
/// 已提交狀態不受影響。
pub struct UnitOfWork {
    committed: OwnedMutexGuard<ShipmentTables>,
    working: ShipmentTables,
}

impl UnitOfWork {
    pub fn begin(committed: OwnedMutexGuard<ShipmentTables>) -> Self {
        let working = committed.clone();
        Self { committed, working }
    }

    pub fn tables(&self) -> &ShipmentTables {
        &self.working
    }

    pub fn roots(&self) -> &EntityTable<RootShipment> {
        &self.working.root_shipments
    }

    pub fn roots_mut(&mut self) -> &mut EntityTable<RootShipment> {
        &mut self.working.root_shipments
    }

    pub fn standards(&self) -> &EntityTable<StandardShipment> {
        &self.working.standard_shipments
    }

    pub fn standards_mut(&mut self) -> &mut EntityTable<StandardShipment> {
        &mut self.working.standard_shipments
    }

    pub fn merged(&self) -> &EntityTable<MergedShipment> {
        &self.working.merged_shipments
    }

    pub fn merged_mut(&mut self) -> &mut EntityTable<MergedShipment> {
        &mut self.working.merged_shipments
    }

    /// 工作副本是否與已提交狀態不同
    pub fn is_dirty(&self) -> bool {
        *self.committed != self.working
    }

    /// 拆出鎖與工作副本，供儲存層寫回
    pub fn into_parts(self) -> (OwnedMutexGuard<ShipmentTables>, ShipmentTables) {
        (self.committed, self.working)
    }

    pub fn rollback(self) {
        tracing::debug!("Unit of work rolled back");
    }
}
