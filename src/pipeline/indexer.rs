//! Data Indexer stage
//!
//! Loads client and product records and builds the run's `IndexedCorpus`.

use crate::config::SimulatedData;
use crate::domain::simulated;
use crate::error::{AppError, Result};
use crate::pipeline::corpus::IndexedCorpus;
use crate::ports::sources::{ClientSourcePort, ProductSourcePort};

pub struct DataIndexer {
    mode: SimulatedData,
}

impl DataIndexer {
    pub fn new(mode: SimulatedData) -> Self {
        Self { mode }
    }

    /// Load both sources and index them.
    ///
    /// A missing (`None`), unavailable or empty source is replaced by
    /// simulated records when the mode allows it, otherwise the run fails
    /// with `SourceUnavailable`.
    pub async fn index(
        &self,
        client_source: Option<&dyn ClientSourcePort>,
        product_source: Option<&dyn ProductSourcePort>,
    ) -> Result<IndexedCorpus> {
        let clients = match client_source {
            Some(source) => {
                log::info!("Loading client data from {}", source.describe());
                source.load_clients().await
            }
            None => Err(AppError::SourceUnavailable(
                "no client source configured".to_string(),
            )),
        };
        let clients = self.mode.settle("client", clients, simulated::clients)?;

        let products = match product_source {
            Some(source) => {
                log::info!("Loading product catalog from {}", source.describe());
                source.load_products().await
            }
            None => Err(AppError::SourceUnavailable(
                "no product source configured".to_string(),
            )),
        };
        let products = self.mode.settle("product", products, simulated::products)?;

        let corpus = IndexedCorpus::build(clients, products);
        log::info!(
            "Indexed {} records ({} clients, {} products)",
            corpus.len(),
            corpus.clients().count(),
            corpus.products().count()
        );
        Ok(corpus)
    }
}
