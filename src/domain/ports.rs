use crate::core::tables::UnitOfWork;
use crate::domain::model::{
    Entity, Kilograms, MergedShipment, RootShipment, ShipmentId, StandardShipment,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 單一實體類型的基本存取
pub trait Repository<T: Entity> {
    /// 寫入新記錄並回傳配發的 id
    fn create(&mut self, entity: T) -> ShipmentId;
    fn find_by_id(&self, id: ShipmentId) -> Option<&T>;
    fn update(&mut self, entity: T) -> Result<()>;
    fn delete(&mut self, id: ShipmentId) -> Option<T>;
    fn list_all(&self) -> Vec<&T>;
}

/// 交易式儲存層
pub trait ShipmentStore: Send + Sync {
    fn begin(&self) -> impl std::future::Future<Output = Result<UnitOfWork>> + Send;
    fn commit(&self, uow: UnitOfWork) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait ShipmentService: Send + Sync {
    async fn split(&self, root_id: ShipmentId, weight_list: &str) -> Result<usize>;
    async fn split_even(&self, root_id: ShipmentId, shares: usize) -> Result<usize>;
    async fn merge(&self, id_list: &str) -> Result<ShipmentId>;
    async fn change_weight(&self, root_id: ShipmentId, new_weight: i64) -> Result<usize>;

    async fn create_root_shipment(&self, weight: Kilograms) -> Result<RootShipment>;
    async fn delete_root_shipment(&self, id: ShipmentId) -> Result<usize>;
    async fn root_shipment(&self, id: ShipmentId) -> Result<RootShipment>;
    async fn standard_shipment(&self, id: ShipmentId) -> Result<StandardShipment>;
    async fn merged_shipment(&self, id: ShipmentId) -> Result<MergedShipment>;
    async fn list_root_shipments(&self) -> Result<Vec<RootShipment>>;
    async fn list_standard_shipments(&self) -> Result<Vec<StandardShipment>>;
    async fn list_merged_shipments(&self) -> Result<Vec<MergedShipment>>;
}
