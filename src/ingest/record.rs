use crate::extract::ExtractedDocument;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Body of one ingestion POST
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionRecord {
    /// Datasource the record is filed under
    pub datasource_id: String,

    /// Stable hash of the page URL, see [`content_id`]
    pub content_id: i64,

    /// Run-constant epoch millis at which the crawl started
    pub parsing_date: i64,

    /// Same text as the document's `content`
    pub raw_content: String,

    /// JSON string of the shape `{"web": {"url", "title", "content", "favicon"}}`
    pub datasource_payload: String,
}

#[derive(Serialize)]
struct DatasourcePayload<'a> {
    web: &'a ExtractedDocument,
}

impl IngestionRecord {
    /// Packages an extracted document for delivery
    pub fn new(
        datasource_id: &str,
        parsing_date: i64,
        document: &ExtractedDocument,
    ) -> Result<Self, serde_json::Error> {
        let datasource_payload = serde_json::to_string(&DatasourcePayload { web: document })?;

        Ok(Self {
            datasource_id: datasource_id.to_string(),
            content_id: content_id(&document.url),
            parsing_date,
            raw_content: document.content.clone(),
            datasource_payload,
        })
    }
}

/// Derives the content id of a page from its URL
///
/// The id is the first 8 bytes of the SHA-256 digest of the URL's UTF-8 bytes,
/// read as a big-endian signed 64-bit integer. It depends on nothing but the
/// URL string, so it is the same across runs, processes and machines.
///
/// # Examples
///
/// ```
/// use web_connector::ingest::content_id;
///
/// assert_eq!(content_id("https://example.com"), 1154751836401231525);
/// ```
pub fn content_id(url: &str) -> i64 {
    let digest = Sha256::digest(url.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    i64::from_be_bytes(prefix)
}
