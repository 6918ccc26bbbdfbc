use crate::core::tables::{ShipmentTables, UnitOfWork};
use crate::core::ShipmentStore;
use crate::utils::error::{Result, ShipmentError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// 以單一 JSON 檔保存三張資料表。
///
/// 提交時先寫入暫存檔再改名覆蓋；寫檔失敗時記憶體中的已提交狀態維持不變。
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    tables: Arc<Mutex<ShipmentTables>>,
}

impl JsonFileStore {
    /// 開啟資料檔，檔案不存在時從空資料表開始
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let tables = if tokio::fs::try_exists(&path).await? {
            let content = tokio::fs::read(&path).await?;
            if content.iter().all(u8::is_ascii_whitespace) {
                ShipmentTables::default()
            } else {
                let tables: ShipmentTables = serde_json::from_slice(&content)?;
                tables.check_ids()?;
                tables
            }
        } else {
            tracing::debug!("Data file {} does not exist yet, starting empty", path.display());
            ShipmentTables::default()
        };

        Ok(Self {
            path,
            tables: Arc::new(Mutex::new(tables)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 已提交狀態的複本
    pub async fn snapshot(&self) -> ShipmentTables {
        self.tables.lock().await.clone()
    }

    async fn write_tables(&self, tables: &ShipmentTables) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let data = serde_json::to_vec_pretty(tables)?;
        let mut temp_name = self
            .path
            .file_name()
            .ok_or_else(|| ShipmentError::StorageError {
                message: format!("{} is not a file path", self.path.display()),
            })?
            .to_os_string();
        temp_name.push(".tmp");
        let temp_path = self.path.with_file_name(temp_name);

        tokio::fs::write(&temp_path, &data).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;

        tracing::debug!("Wrote {} bytes to {}", data.len(), self.path.display());
        Ok(())
    }
}

impl ShipmentStore for JsonFileStore {
    async fn begin(&self) -> Result<UnitOfWork> {
        let committed = self.tables.clone().lock_owned().await;
        Ok(UnitOfWork::begin(committed))
    }

    async fn commit(&self, uow: UnitOfWork) -> Result<()> {
        let (mut committed, working) = uow.into_parts();
        self.write_tables(&working).await?;
        *committed = working;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Repository, RootShipment};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_commit_writes_and_reopen_reads() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("shipments.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        let mut uow = store.begin().await.unwrap();
        uow.roots_mut().create(RootShipment::new(6000));
        store.commit(uow).await.unwrap();

        assert!(path.exists());
        assert!(!path.with_file_name("shipments.json.tmp").exists());

        let reopened = JsonFileStore::open(&path).await.unwrap();
        let uow = reopened.begin().await.unwrap();
        assert_eq!(uow.roots().find_by_id(1).map(|r| r.weight), Some(6000));
    }

    #[tokio::test]
    async fn test_empty_file_opens_as_empty_tables() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shipments.json");
        std::fs::write(&path, "\n").unwrap();

        let store = JsonFileStore::open(&path).await.unwrap();
        let uow = store.begin().await.unwrap();
        assert!(uow.roots().is_empty());
    }

    #[tokio::test]
    async fn test_inconsistent_ids_are_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shipments.json");
        std::fs::write(
            &path,
            r#"{"root_shipments":{"next_id":1,"rows":{"1":{"id":1,"weight":500,"split_shipments":[]}}}}"#,
        )
        .unwrap();

        let err = JsonFileStore::open(&path).await.unwrap_err();
        assert!(matches!(err, ShipmentError::StorageError { .. }));
    }

    #[tokio::test]
    async fn test_corrupted_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shipments.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::open(&path).await.unwrap_err();
        assert!(matches!(err, ShipmentError::SerializationError(_)));
    }
}
