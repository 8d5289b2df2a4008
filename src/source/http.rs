//! REST-backed catalog source and name decorator.
//!
//! The listing endpoint is `GET {base_url}/{list_path}?offset={offset}&limit={limit}`
//! and answers with a [`ListPage`] document. The decoration endpoint is
//! `GET {base_url}/{names_path}/{canonical_name}` and answers with a list of
//! localized names, from which the configured language is picked.

use async_trait::async_trait;
use reqwest::Client;
use tracing::Instrument;
use url::Url;

use crate::config::Config;
use crate::domain::error::{CatalogError, Result};
use crate::source::backend::{CatalogSource, NameDecorator};
use crate::source::models::{ListPage, NamesResponse};

/// Paged catalog source over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    http: Client,
    list_url: String,
}

impl HttpCatalogSource {
    #[must_use]
    pub fn new(http: Client, base_url: &str, list_path: &str) -> Self {
        Self {
            http,
            list_url: join_url(base_url, list_path),
        }
    }

    /// Builds the source from the configured endpoint.
    #[must_use]
    pub fn from_config(http: Client, config: &Config) -> Self {
        Self::new(http, &config.base_url, &config.list_path)
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn list(&self, offset: usize, limit: usize) -> Result<ListPage> {
        self.fetch_listing(offset, limit)
            .instrument(tracing::debug_span!("http_list", offset, limit))
            .await
    }
}

impl HttpCatalogSource {
    async fn fetch_listing(&self, offset: usize, limit: usize) -> Result<ListPage> {
        let response = self
            .http
            .get(&self.list_url)
            .query(&[("offset", offset), ("limit", limit)])
            .send()
            .await
            .map_err(|e| CatalogError::SourceUnavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%status, "listing returned unexpected status");
            return Err(CatalogError::SourceUnavailable(format!(
                "unexpected status {status}: {body}"
            )));
        }

        let page = response
            .json::<ListPage>()
            .await
            .map_err(|e| CatalogError::SourceUnavailable(format!("invalid listing: {e}")))?;

        tracing::debug!(items = page.items.len(), has_more = page.has_more(), "listing received");
        Ok(page)
    }
}

/// Name decorator over HTTP, selecting one language.
#[derive(Debug, Clone)]
pub struct HttpNameDecorator {
    http: Client,
    names_url: String,
    language: String,
}

impl HttpNameDecorator {
    #[must_use]
    pub fn new(http: Client, base_url: &str, names_path: &str, language: impl Into<String>) -> Self {
        Self {
            http,
            names_url: join_url(base_url, names_path),
            language: language.into(),
        }
    }

    #[must_use]
    pub fn from_config(http: Client, config: &Config) -> Self {
        Self::new(http, &config.base_url, &config.names_path, config.language.clone())
    }

    /// Appends `canonical_name` as one percent-encoded path segment.
    fn names_endpoint(&self, canonical_name: &str) -> std::result::Result<Url, String> {
        let mut url = Url::parse(&self.names_url).map_err(|e| format!("invalid names url: {e}"))?;
        url.path_segments_mut()
            .map_err(|_| format!("names url cannot take a path: {}", self.names_url))?
            .pop_if_empty()
            .push(canonical_name);
        Ok(url)
    }
}

#[async_trait]
impl NameDecorator for HttpNameDecorator {
    async fn decorate(&self, canonical_name: &str) -> Result<String> {
        let failed = |reason: String| CatalogError::DecorationFailed {
            name: canonical_name.to_string(),
            reason,
        };

        let endpoint = self.names_endpoint(canonical_name).map_err(failed)?;
        let response = self
            .http
            .get(endpoint)
            .send()
            .await
            .map_err(|e| failed(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failed(format!("unexpected status {status}")));
        }

        let names = response
            .json::<NamesResponse>()
            .await
            .map_err(|e| failed(format!("invalid names document: {e}")))?;

        names
            .localized(&self.language)
            .map(str::to_string)
            .ok_or_else(|| failed(format!("no name for language {}", self.language)))
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_without_duplicate_slashes() {
        assert_eq!(
            join_url("https://pokeapi.co/api/v2/", "/pokemon-species/"),
            "https://pokeapi.co/api/v2/pokemon-species"
        );
        assert_eq!(join_url("http://h", "x"), "http://h/x");
    }

    #[test]
    fn builds_endpoints_from_config() {
        let config = Config::default();
        let source = HttpCatalogSource::from_config(Client::new(), &config);
        assert_eq!(source.list_url, "https://pokeapi.co/api/v2/pokemon-species");

        let decorator = HttpNameDecorator::from_config(Client::new(), &config);
        assert_eq!(decorator.language, "ko");
    }

    #[test]
    fn canonical_name_is_one_encoded_segment() {
        let decorator = HttpNameDecorator::new(Client::new(), "http://h/api/", "/names/", "en");

        let url = decorator.names_endpoint("mr. mime").unwrap();
        assert_eq!(url.as_str(), "http://h/api/names/mr.%20mime");

        let url = decorator.names_endpoint("type/null?x#y").unwrap();
        assert_eq!(url.as_str(), "http://h/api/names/type%2Fnull%3Fx%23y");
    }

    #[test]
    fn unusable_names_url_is_a_decoration_failure() {
        let decorator = HttpNameDecorator::new(Client::new(), "not a url", "names", "en");
        assert!(decorator.names_endpoint("bulbasaur").is_err());
    }
}
