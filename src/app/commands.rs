use crate::app::response::ResultBox;
use crate::config::cli::{Command, RecordKind};
use crate::core::ShipmentService;
use crate::utils::error::Result;

/// 執行單一指令並包裝成標準輸出
pub async fn execute(service: &dyn ShipmentService, command: &Command) -> Result<ResultBox> {
    match command {
        Command::Create { weight } => {
            let root = service.create_root_shipment(*weight).await?;
            ResultBox::build_by_row(&root)
        }
        Command::Split { root_id, weights } => {
            let created = service.split(*root_id, weights).await?;
            Ok(ResultBox::build_by_count(created))
        }
        Command::SplitEven { root_id, shares } => {
            let created = service.split_even(*root_id, *shares).await?;
            Ok(ResultBox::build_by_count(created))
        }
        Command::Merge { ids } => {
            let merged_id = service.merge(ids).await?;
            ResultBox::build_by_row(&merged_id)
        }
        Command::ChangeWeight { root_id, weight } => {
            let affected = service.change_weight(*root_id, *weight).await?;
            Ok(ResultBox::build_by_count(affected))
        }
        Command::Show { kind, id } => match kind {
            RecordKind::Root => ResultBox::build_by_row(&service.root_shipment(*id).await?),
            RecordKind::Standard => {
                ResultBox::build_by_row(&service.standard_shipment(*id).await?)
            }
            RecordKind::Merged => ResultBox::build_by_row(&service.merged_shipment(*id).await?),
        },
        Command::List { kind } => match kind {
            RecordKind::Root => ResultBox::build_by_rows(&service.list_root_shipments().await?),
            RecordKind::Standard => {
                ResultBox::build_by_rows(&service.list_standard_shipments().await?)
            }
            RecordKind::Merged => {
                ResultBox::build_by_rows(&service.list_merged_shipments().await?)
            }
        },
        Command::Delete { root_id } => {
            let deleted = service.delete_root_shipment(*root_id).await?;
            Ok(ResultBox::build_by_count(deleted))
        }
    }
}
