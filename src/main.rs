use anyhow::Context;
use clap::Parser;
use ship_alloc::app::commands;
use ship_alloc::utils::error::ErrorSeverity;
use ship_alloc::utils::{logger, validation::Validate};
use ship_alloc::{CliConfig, JsonFileStore, MemoryStore, ResultBox, ShipmentEngine, ShipmentService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(2);
        }
    };

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger(cli.verbose, config.logging.level.as_deref());
    } else {
        logger::init_cli_logger(cli.verbose, config.logging.level.as_deref());
    }

    tracing::debug!("CLI config: {:?}", cli);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(2);
    }

    let monitor_enabled = config.monitoring_enabled();
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let store = JsonFileStore::open(config.data_file())
        .await
        .with_context(|| format!("failed to open data file {}", config.data_file()))?;

    // dry run 在資料快照上執行，不寫回檔案
    let service: Box<dyn ShipmentService> = if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - changes will not be saved");
        let tables = store.snapshot().await;
        Box::new(ShipmentEngine::new_with_monitoring(
            MemoryStore::with_tables(tables),
            monitor_enabled,
        ))
    } else {
        Box::new(ShipmentEngine::new_with_monitoring(store, monitor_enabled))
    };

    let (result, severity) = match commands::execute(service.as_ref(), &cli.command).await {
        Ok(result) => (result, None),
        Err(e) => {
            tracing::error!(
                "❌ {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            (ResultBox::from_error(&e), Some(e.severity()))
        }
    };

    let output = if config.output_format() == "csv" && result.is_ok() {
        result.rows_to_csv()?
    } else {
        result.to_json()?
    };
    println!("{}", output.trim_end());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match severity {
        None | Some(ErrorSeverity::Low) => 0,
        Some(ErrorSeverity::Medium) => 2,
        Some(ErrorSeverity::High) => 1,
        Some(ErrorSeverity::Critical) => 3,
    };
    if exit_code > 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}
