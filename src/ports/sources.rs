/// Record source port traits
///
/// External parsers normalize the client table and the product catalog into
/// sequences of records behind these traits. A source that cannot find its
/// backing data reports `AppError::SourceUnavailable`; the indexer decides
/// whether simulated data may stand in.
use crate::domain::models::{ClientRecord, ProductRecord};
use crate::error::Result;
use async_trait::async_trait;

/// Port trait for the client table
#[async_trait]
pub trait ClientSourcePort: Send + Sync {
    /// Load every client record, in source order
    async fn load_clients(&self) -> Result<Vec<ClientRecord>>;

    /// Short description for log lines (usually the path)
    fn describe(&self) -> String;
}

/// Port trait for the product catalog
#[async_trait]
pub trait ProductSourcePort: Send + Sync {
    /// Load every product record, in source order
    async fn load_products(&self) -> Result<Vec<ProductRecord>>;

    /// Short description for log lines (usually the path)
    fn describe(&self) -> String;
}
