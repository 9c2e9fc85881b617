// src/lodes.rs

use anyhow::Result;
use tracing::info;

use crate::{
    config::Config,
    dataset::{Dataset, Request},
    fetch::SourceFiles,
    geo::{Crosswalk, TractReference},
    params::{Characteristics, Level},
    process::{aggregate, longform, summary, CountTable},
    store::DatasetStore,
};

/// Entry point tying the pipelines to their collaborators.
pub struct Lodes {
    config: Config,
    sources: Box<dyn SourceFiles>,
    tracts: Box<dyn TractReference>,
    crosswalk: Box<dyn Crosswalk>,
    store: DatasetStore,
}

impl Lodes {
    pub fn new(
        config: Config,
        sources: Box<dyn SourceFiles>,
        tracts: Box<dyn TractReference>,
        crosswalk: Box<dyn Crosswalk>,
    ) -> Self {
        let store = DatasetStore::new(config.data_dir.clone());
        Self {
            config,
            sources,
            tracts,
            crosswalk,
            store,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    /// Rebuild the tract-level table from source. Nothing is read from or
    /// written to the store.
    pub fn download(&self, request: &Request) -> Result<CountTable> {
        let state = self.config.state.as_str();
        let sources = self.sources.as_ref();
        let tracts = self.tracts.as_ref();
        match request.dataset {
            Dataset::WorkLongform => longform::download(
                sources,
                tracts,
                state,
                Characteristics::Work,
                request.year,
                request.job_type,
            ),
            Dataset::HomeLongform => longform::download(
                sources,
                tracts,
                state,
                Characteristics::Residence,
                request.year,
                request.job_type,
            ),
            Dataset::OdSummary(kind) => summary::download(
                sources,
                tracts,
                state,
                request.year,
                kind,
                request.job_type,
            ),
        }
    }

    /// Stored tract-level table (rebuilt when `fresh` or absent), re-expressed
    /// at `level`.
    #[tracing::instrument(level = "info", skip(self))]
    pub fn get(&self, request: &Request, fresh: bool, level: Level) -> Result<CountTable> {
        let tracts = self
            .store
            .get_or_build(request, fresh, || self.download(request))?;
        let out = aggregate::to_level(tracts, level, self.crosswalk.as_ref(), request.year)?;
        info!(rows = out.len(), "ready");
        Ok(out)
    }
}
