use crate::domain::model::ShipmentId;
use thiserror::Error;

/// Split / ChangeWeight 的前置條件違反
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SplitError {
    #[error("Root shipment [{0}] was not found")]
    RootNotFound(ShipmentId),

    #[error("Weight list `{0}` is not a comma-separated list of integers")]
    MalformedWeightList(String),

    #[error("Weight list contains a zero weight")]
    ZeroWeight,

    #[error("Cannot split a {weight}kg root into {shares} shares (allowed: 1..={max_shares})")]
    ShareCountOutOfRange {
        shares: usize,
        weight: u64,
        max_shares: u64,
    },

    #[error("Root shipment [{0}] was split before")]
    AlreadySplit(ShipmentId),

    #[error("Split weights total {actual}kg but root shipment weighs {expected}kg")]
    WeightSumMismatch { expected: u64, actual: u64 },

    #[error("New weight {0} is outside 1..=1000000000")]
    WeightOutOfRange(i64),

    #[error("Root shipment [{0}] has not been split")]
    NotSplit(ShipmentId),
}

/// Merge / ChangeWeight 串聯重算的前置條件違反
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("Shipment id list `{0}` is not a comma-separated list of integers")]
    MalformedIdList(String),

    #[error("At least 2 shipments are needed for a merge, got {0}")]
    TooFewShipments(usize),

    #[error("Shipment id 0 is not a valid identifier")]
    ZeroId,

    #[error("Shipment [{0}] appears more than once in the merge list")]
    DuplicateShipment(ShipmentId),

    #[error("Standard shipment [{0}] was not found")]
    ShipmentNotFound(ShipmentId),

    #[error("Standard shipment [{shipment}] has been merged into [{merged_into}] before")]
    AlreadyMerged {
        shipment: ShipmentId,
        merged_into: ShipmentId,
    },

    #[error("Merged shipment [{0}] was not found")]
    MergedShipmentNotFound(ShipmentId),
}

#[derive(Error, Debug)]
pub enum ShipmentError {
    #[error("Split failed: {0}")]
    Split(#[from] SplitError),

    #[error("Merge failed: {0}")]
    Merge(#[from] MergeError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value `{value}` for {field}: {reason}")]
    InvalidValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{entity} [{id}] was not found")]
    NotFound { entity: &'static str, id: ShipmentId },

    #[error("{entity} [{id}] is still referenced: {reason}")]
    StillReferenced {
        entity: &'static str,
        id: ShipmentId,
        reason: String,
    },

    #[error("Storage error: {message}")]
    StorageError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Domain,
    Validation,
    Lookup,
    Configuration,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// 結果碼，沿用既有 API 的錯誤碼表
pub mod codes {
    pub const OK: i32 = 0;
    pub const EMPTY_RESULT_SET: i32 = -1403;
    pub const STANDARD: i32 = -10000;
    pub const ARGUMENT: i32 = -10010;
    pub const BAD_ARGUMENT: i32 = -10040;

    pub fn message(code: i32) -> &'static str {
        match code {
            OK => "Operation succeeded",
            EMPTY_RESULT_SET => "No data found",
            ARGUMENT => "Argument validation error",
            BAD_ARGUMENT => "Bad argument",
            _ => "Operation failed",
        }
    }
}

impl ShipmentError {
    pub fn not_found(entity: &'static str, id: ShipmentId) -> Self {
        ShipmentError::NotFound { entity, id }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ShipmentError::Split(_) | ShipmentError::Merge(_) => ErrorCategory::Domain,
            ShipmentError::NotFound { .. } | ShipmentError::StillReferenced { .. } => {
                ErrorCategory::Lookup
            }
            ShipmentError::InvalidValueError { .. } => ErrorCategory::Validation,
            ShipmentError::ConfigError { .. } => ErrorCategory::Configuration,
            ShipmentError::IoError(_)
            | ShipmentError::SerializationError(_)
            | ShipmentError::CsvError(_)
            | ShipmentError::StorageError { .. } => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Domain | ErrorCategory::Lookup => ErrorSeverity::High,
            ErrorCategory::Validation | ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// 對應的結果碼
    pub fn code(&self) -> i32 {
        match self {
            ShipmentError::Split(SplitError::RootNotFound(_))
            | ShipmentError::Merge(MergeError::ShipmentNotFound(_))
            | ShipmentError::Merge(MergeError::MergedShipmentNotFound(_))
            | ShipmentError::NotFound { .. } => codes::EMPTY_RESULT_SET,
            ShipmentError::Split(SplitError::MalformedWeightList(_))
            | ShipmentError::Merge(MergeError::MalformedIdList(_))
            | ShipmentError::InvalidValueError { .. } => codes::ARGUMENT,
            ShipmentError::Split(_) | ShipmentError::Merge(_) => codes::BAD_ARGUMENT,
            _ => codes::STANDARD,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ShipmentError::Split(SplitError::AlreadySplit(_)) => {
                "A root shipment can only be split once; change its weight instead"
            }
            ShipmentError::Split(SplitError::NotSplit(_)) => {
                "Split the root shipment before changing its weight"
            }
            ShipmentError::Split(SplitError::WeightSumMismatch { .. }) => {
                "Make the split weights add up to the root shipment weight"
            }
            ShipmentError::Split(_) => "Check the root shipment id and the weight list",
            ShipmentError::Merge(MergeError::AlreadyMerged { .. }) => {
                "Each standard shipment can be merged only once; leave it out of the list"
            }
            ShipmentError::Merge(_) => "Pass at least 2 distinct, existing standard shipment ids",
            ShipmentError::NotFound { .. } => "Check the shipment id",
            ShipmentError::StillReferenced { .. } => "Remove the referencing records first",
            ShipmentError::InvalidValueError { .. } => "Check the value against the allowed range",
            ShipmentError::ConfigError { .. } => "Check the configuration file and command line flags",
            ShipmentError::IoError(_) | ShipmentError::StorageError { .. } => {
                "Check that the data file location exists and is writable"
            }
            ShipmentError::SerializationError(_) | ShipmentError::CsvError(_) => {
                "The data file may be corrupted; restore it from a backup"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Domain => format!("Shipment operation rejected: {}", self),
            ErrorCategory::Lookup => self.to_string(),
            ErrorCategory::Validation => format!("Invalid input: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Storage => format!("Shipment data could not be stored: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShipmentError>;
