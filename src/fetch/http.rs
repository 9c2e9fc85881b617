use anyhow::{Context, Result};
use reqwest::blocking::Client;
use tracing::{debug, info};
use url::Url;

use super::SourceFiles;
use crate::process::RawTable;

/// Source files read straight from the remote LODES directory.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base: Url,
}

impl HttpSource {
    /// `base_url` is the state directory, e.g. `.../LODES7/pa/`.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            base: parse_base(base_url)?,
        })
    }

    pub fn url_of(&self, id: &str) -> Result<Url> {
        self.base
            .join(id)
            .with_context(|| format!("joining {} onto {}", id, self.base))
    }
}

/// Parse a directory URL, adding the trailing slash `Url::join` needs.
pub fn parse_base(base_url: &str) -> Result<Url> {
    let mut s = base_url.to_string();
    if !s.ends_with('/') {
        s.push('/');
    }
    Url::parse(&s).with_context(|| format!("parsing base URL {}", base_url))
}

impl SourceFiles for HttpSource {
    #[tracing::instrument(level = "info", skip(self))]
    fn fetch(&self, id: &str) -> Result<RawTable> {
        let url = self.url_of(id)?;
        info!(%url, "GET");
        let bytes = self
            .client
            .get(url.clone())
            .send()
            .with_context(|| format!("GET {}", url))?
            .error_for_status()
            .with_context(|| format!("non-success status {}", url))?
            .bytes()
            .with_context(|| format!("reading body from {}", url))?;
        debug!(bytes = bytes.len(), "downloaded");
        RawTable::from_bytes(id, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_join_under_the_state_directory() -> Result<()> {
        let src = HttpSource::new("https://lehd.ces.census.gov/data/lodes/LODES7/pa")?;
        assert_eq!(
            src.url_of("od/pa_od_aux_JT00_2017.csv.gz")?.as_str(),
            "https://lehd.ces.census.gov/data/lodes/LODES7/pa/od/pa_od_aux_JT00_2017.csv.gz"
        );
        Ok(())
    }

    #[test]
    fn bad_base_url_is_rejected() {
        assert!(HttpSource::new("not a url").is_err());
    }
}
