use crate::core::tables::UnitOfWork;
use crate::core::{merge, records, reweigh, split};
use crate::domain::model::{
    Entity, Kilograms, MergedShipment, RootShipment, ShipmentId, StandardShipment,
};
use crate::domain::ports::{Repository, ShipmentService, ShipmentStore};
use crate::utils::error::{Result, ShipmentError};
use crate::utils::monitor::SystemMonitor;
use async_trait::async_trait;

/// 在交易中執行運單操作：成功才提交，任何錯誤都會丟棄整個工作副本
pub struct ShipmentEngine<S: ShipmentStore> {
    store: S,
    monitor: SystemMonitor,
}

impl<S: ShipmentStore> ShipmentEngine<S> {
    pub fn new(store: S) -> Self {
        Self::new_with_monitoring(store, false)
    }

    pub fn new_with_monitoring(store: S, monitor_enabled: bool) -> Self {
        Self {
            store,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn transact<T, F>(&self, operation: &'static str, work: F) -> Result<T>
    where
        T: Send,
        F: FnOnce(&mut UnitOfWork) -> Result<T> + Send,
    {
        let sample = self.monitor.start(operation);
        let mut uow = self.store.begin().await?;

        let result = match work(&mut uow) {
            Ok(value) => {
                if uow.is_dirty() {
                    self.store.commit(uow).await?;
                } else {
                    uow.rollback();
                }
                tracing::debug!("{} committed", operation);
                Ok(value)
            }
            Err(e) => {
                tracing::debug!("{} rejected: {}", operation, e);
                uow.rollback();
                Err(e)
            }
        };

        self.monitor.log_operation(sample);
        result
    }

    async fn read<T, F>(&self, read: F) -> Result<T>
    where
        T: Send,
        F: FnOnce(&UnitOfWork) -> Result<T> + Send,
    {
        let uow = self.store.begin().await?;
        let result = read(&uow);
        uow.rollback();
        result
    }
}

fn lookup<T: Entity>(table: &impl Repository<T>, id: ShipmentId) -> Result<T> {
    table
        .find_by_id(id)
        .cloned()
        .ok_or_else(|| ShipmentError::not_found(T::KIND, id))
}

fn cloned_rows<T: Entity>(table: &impl Repository<T>) -> Vec<T> {
    table.list_all().into_iter().cloned().collect()
}

#[async_trait]
impl<S: ShipmentStore> ShipmentService for ShipmentEngine<S> {
    async fn split(&self, root_id: ShipmentId, weight_list: &str) -> Result<usize> {
        self.transact("split", |uow| split::split(uow, root_id, weight_list))
            .await
    }

    async fn split_even(&self, root_id: ShipmentId, shares: usize) -> Result<usize> {
        self.transact("split_even", |uow| split::split_even(uow, root_id, shares))
            .await
    }

    async fn merge(&self, id_list: &str) -> Result<ShipmentId> {
        self.transact("merge", |uow| merge::merge(uow, id_list)).await
    }

    async fn change_weight(&self, root_id: ShipmentId, new_weight: i64) -> Result<usize> {
        self.transact("change_weight", |uow| {
            reweigh::change_weight(uow, root_id, new_weight)
        })
        .await
    }

    async fn create_root_shipment(&self, weight: Kilograms) -> Result<RootShipment> {
        self.transact("create_root_shipment", |uow| records::create_root(uow, weight))
            .await
    }

    async fn delete_root_shipment(&self, id: ShipmentId) -> Result<usize> {
        self.transact("delete_root_shipment", |uow| records::delete_root(uow, id))
            .await
    }

    async fn root_shipment(&self, id: ShipmentId) -> Result<RootShipment> {
        self.read(|uow| lookup(uow.roots(), id)).await
    }

    async fn standard_shipment(&self, id: ShipmentId) -> Result<StandardShipment> {
        self.read(|uow| lookup(uow.standards(), id)).await
    }

    async fn merged_shipment(&self, id: ShipmentId) -> Result<MergedShipment> {
        self.read(|uow| lookup(uow.merged(), id)).await
    }

    async fn list_root_shipments(&self) -> Result<Vec<RootShipment>> {
        self.read(|uow| Ok(cloned_rows(uow.roots()))).await
    }

    async fn list_standard_shipments(&self) -> Result<Vec<StandardShipment>> {
        self.read(|uow| Ok(cloned_rows(uow.standards()))).await
    }

    async fn list_merged_shipments(&self) -> Result<Vec<MergedShipment>> {
        self.read(|uow| Ok(cloned_rows(uow.merged()))).await
    }
}
