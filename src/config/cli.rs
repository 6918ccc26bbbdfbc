use crate::config::toml_config::{TomlConfig, OUTPUT_FORMATS};
use crate::domain::model::{Kilograms, ShipmentId};
use crate::utils::error::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::Path;

#[derive(Debug, Clone, Parser)]
#[command(name = "shipctl")]
#[command(about = "Split, merge and re-weigh shipment records")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// JSON data file holding the shipment tables
    #[arg(long, global = true)]
    pub data_file: Option<String>,

    /// Output format for result rows
    #[arg(long, global = true, value_parser = OUTPUT_FORMATS)]
    pub format: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log process CPU and memory after each operation")]
    pub monitor: bool,

    /// Run the command without saving the result
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create a root shipment
    Create { weight: Kilograms },

    /// Split a root shipment by a weight list, e.g. "500,249,251"
    Split { root_id: ShipmentId, weights: String },

    /// Split a root shipment into equal shares
    SplitEven { root_id: ShipmentId, shares: usize },

    /// Merge standard shipments, e.g. "2,3"
    Merge { ids: String },

    /// Change the weight of a split root shipment
    ChangeWeight {
        root_id: ShipmentId,
        #[arg(allow_negative_numbers = true)]
        weight: i64,
    },

    /// Show one record
    Show { kind: RecordKind, id: ShipmentId },

    /// List all records of a kind
    List { kind: RecordKind },

    /// Delete a root shipment and the standard shipments it owns
    Delete { root_id: ShipmentId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecordKind {
    Root,
    Standard,
    Merged,
}

impl CliConfig {
    /// 載入配置檔並套用命令列覆蓋
    pub fn resolve_config(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(Path::new(path))?,
            None => TomlConfig::default(),
        };

        if let Some(data_file) = &self.data_file {
            config.store.path = data_file.clone();
        }
        if let Some(format) = &self.format {
            config.output.format = format.clone();
        }
        if self.monitor {
            config.monitoring = Some(crate::config::toml_config::MonitoringConfig { enabled: true });
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::Validate;

    #[test]
    fn test_parse_split_command() {
        let cli = CliConfig::try_parse_from(["shipctl", "split", "1", "500,249,251"]).unwrap();

        match cli.command {
            Command::Split { root_id, weights } => {
                assert_eq!(root_id, 1);
                assert_eq!(weights, "500,249,251");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_negative_weight_reaches_the_engine() {
        let cli = CliConfig::try_parse_from(["shipctl", "change-weight", "1", "-5"]).unwrap();
        assert!(matches!(cli.command, Command::ChangeWeight { weight: -5, .. }));
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = CliConfig::try_parse_from([
            "shipctl",
            "--data-file",
            "/tmp/s.json",
            "--format",
            "csv",
            "--monitor",
            "list",
            "merged",
        ])
        .unwrap();

        let config = cli.resolve_config().unwrap();
        assert_eq!(config.data_file(), "/tmp/s.json");
        assert_eq!(config.output_format(), "csv");
        assert!(config.monitoring_enabled());
        assert!(config.validate().is_ok());
        assert!(matches!(cli.command, Command::List { kind: RecordKind::Merged }));
    }

    #[test]
    fn test_flags_after_subcommand() {
        let cli = CliConfig::try_parse_from([
            "shipctl",
            "split",
            "1",
            "500,500",
            "--dry-run",
            "--verbose",
            "--format",
            "csv",
            "--data-file",
            "/tmp/s.json",
            "--monitor",
        ])
        .unwrap();

        assert!(cli.dry_run);
        assert!(cli.verbose);
        assert!(cli.monitor);
        assert_eq!(cli.format.as_deref(), Some("csv"));
        assert_eq!(cli.data_file.as_deref(), Some("/tmp/s.json"));
        assert!(matches!(cli.command, Command::Split { root_id: 1, .. }));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(CliConfig::try_parse_from(["shipctl", "--format", "xml", "list", "root"]).is_err());
    }
}
