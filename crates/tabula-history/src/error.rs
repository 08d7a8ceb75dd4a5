use tabula_model::DatasetId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// The snapshot belongs to a different dataset than the active table.
    #[error("Snapshot belongs to dataset '{snapshot}' but the active dataset is '{active}'")]
    DatasetMismatch {
        snapshot: DatasetId,
        active: DatasetId,
    },

    #[error("No active dataset")]
    NoActiveDataset,

    #[error("Before and after snapshots belong to different datasets ('{before}' and '{after}')")]
    SnapshotMismatch { before: DatasetId, after: DatasetId },

    #[error("History position {target} is out of range for {len} entries")]
    OutOfRange { target: usize, len: usize },

    #[error("Unknown dataset '{0}'")]
    UnknownDataset(DatasetId),
}
