use crate::core::tables::{ShipmentTables, UnitOfWork};
use crate::core::ShipmentStore;
use crate::utils::error::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

/// 記憶體內的儲存層，交易之間以鎖串行化
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<ShipmentTables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(tables: ShipmentTables) -> Self {
        Self {
            tables: Arc::new(Mutex::new(tables)),
        }
    }

    /// 已提交狀態的複本
    pub async fn snapshot(&self) -> ShipmentTables {
        self.tables.lock().await.clone()
    }
}

impl ShipmentStore for MemoryStore {
    async fn begin(&self) -> Result<UnitOfWork> {
        let committed = self.tables.clone().lock_owned().await;
        Ok(UnitOfWork::begin(committed))
    }

    async fn commit(&self, uow: UnitOfWork) -> Result<()> {
        let (mut committed, working) = uow.into_parts();
        *committed = working;
        Ok(())
    }
}
