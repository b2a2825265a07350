use crate::{error::SnapshotError, model::TripSnapshot};

/// Source of a consistent copy of one trip's records.
pub trait TripSnapshotSource: Send + Sync {
    fn load(&self) -> Result<TripSnapshot, SnapshotError>;
}

impl TripSnapshotSource for TripSnapshot {
    fn load(&self) -> Result<TripSnapshot, SnapshotError> {
        Ok(self.clone())
    }
}
