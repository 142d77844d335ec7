//! Loading web map documents from the portal or from disk.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use tracing::{debug, info};

use crate::error::{Result, WebMapError};
use crate::esri::{PortalErrorEnvelope, WebMapDocument};

pub const DEFAULT_PORTAL_URL: &str = "https://www.arcgis.com";

/// Something that can produce a web map document.
pub trait WebMapSource: Send + Sync {
    fn fetch_web_map<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<WebMapDocument>> + Send + 'a>>;
}

/// REST resource holding a web map item's JSON.
pub fn item_data_url(portal_url: &str, item_id: &str) -> String {
    format!(
        "{}/sharing/rest/content/items/{item_id}/data?f=json",
        portal_url.trim_end_matches('/')
    )
}

/// Decodes an item data body, surfacing the portal's in-band error envelope.
pub fn parse_document(body: serde_json::Value) -> Result<WebMapDocument> {
    if body.get("error").is_some() {
        let envelope: PortalErrorEnvelope = serde_json::from_value(body)?;
        return Err(WebMapError::Portal {
            code: envelope.error.code,
            message: envelope.error.message,
        });
    }
    Ok(serde_json::from_value(body)?)
}

/// Fetches a public web map item from an ArcGIS portal.
#[derive(Clone, Debug)]
pub struct PortalClient {
    http: reqwest::Client,
    portal_url: String,
    item_id: String,
}

impl PortalClient {
    pub fn new(portal_url: impl Into<String>, item_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            portal_url: portal_url.into(),
            item_id: item_id.into(),
        }
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn item_data_url(&self) -> String {
        item_data_url(&self.portal_url, &self.item_id)
    }

    pub async fn fetch(&self) -> Result<WebMapDocument> {
        let url = self.item_data_url();
        info!("Fetching web map {} from {url}", self.item_id);

        let body: serde_json::Value = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_document(body)
    }
}

impl WebMapSource for PortalClient {
    fn fetch_web_map<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<WebMapDocument>> + Send + 'a>> {
        Box::pin(self.fetch())
    }
}

/// Reads a saved item data document, e.g. one downloaded with `curl`.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn load(&self) -> Result<WebMapDocument> {
        debug!("Reading web map from {}", self.path.display());
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| WebMapError::Io {
                path: self.path.clone(),
                source,
            })?;
        parse_document(serde_json::from_slice(&bytes)?)
    }
}

impl WebMapSource for FileSource {
    fn fetch_web_map<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<WebMapDocument>> + Send + 'a>> {
        Box::pin(self.load())
    }
}
