pub mod catalog;
pub mod consolidation;
pub mod events;
pub mod ordering;
pub mod repository;
pub mod summary;

pub use catalog::CatalogService;
pub use consolidation::{Consolidation, ShipmentService};
pub use events::{EventPublisher, NoopPublisher};
pub use ordering::OrderService;
pub use repository::{CancelOutcome, RepoError, RepoResult, Repositories};
pub use summary::{summarize, DashboardSummary};

use logi_catalog::{CatalogError, InventoryError};
use logi_order::{ConsolidationError, OrderError};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Consolidation(#[from] ConsolidationError),
    #[error(transparent)]
    Inventory(#[from] InventoryError),
    #[error("Storage failure: {0}")]
    StorageError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

impl From<CatalogError> for CoreError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::ValidationError(msg) => Self::ValidationError(msg),
        }
    }
}

impl From<OrderError> for CoreError {
    fn from(err: OrderError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<RepoError> for CoreError {
    fn from(err: RepoError) -> Self {
        Self::StorageError(err.to_string())
    }
}
