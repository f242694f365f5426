//! # HTTP Corpus Client
//!
//! reqwest-backed implementation of [`CorpusStore`] against the corpus
//! search service maintained by the ingestion pipeline. The service
//! exposes a single `POST /v1/search` endpoint taking the query text, a
//! family filter, and a result limit, and returns scored passages.
//!
//! ## Error Mapping
//!
//! Transport failures, timeouts, and 5xx responses map to
//! [`CorpusError::Unreachable`]; the engine treats those as fatal to the
//! analysis. 4xx responses and undecodable bodies map to
//! [`CorpusError::MalformedResponse`] — they indicate a contract drift
//! between engine and corpus service, not a transient outage.

use std::time::Duration;

use serde::Deserialize;

use regent_core::RegulationFamily;

use crate::passage::{EvidencePassage, Provenance, RelevanceBps, SourceKind};
use crate::store::{CorpusError, CorpusStore};

/// Configuration for the HTTP corpus client.
#[derive(Debug, Clone)]
pub struct CorpusConfig {
    /// Base URL of the corpus search service, e.g. `http://corpus:8098`.
    pub base_url: String,
    /// Bearer token for the corpus service.
    pub api_key: String,
    /// Per-request timeout in seconds (default: 10).
    pub timeout_secs: u64,
}

impl CorpusConfig {
    /// Create a configuration with the default timeout.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout_secs: 10,
        }
    }
}

/// HTTP client for the corpus search service.
///
/// `Send + Sync`; designed to be shared via `Arc` across the per-family
/// retrieval fan-out.
#[derive(Debug)]
pub struct HttpCorpusStore {
    client: reqwest::Client,
    base_url: String,
}

/// Wire shape of one search hit.
#[derive(Debug, Deserialize)]
struct SearchHit {
    document_id: String,
    offset: u64,
    source: String,
    kind: SourceKind,
    excerpt: String,
    score: f64,
}

/// Wire shape of the search response.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchHit>,
}

impl HttpCorpusStore {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// `CorpusError::Unreachable` if the HTTP client cannot be built
    /// (e.g. the API key contains non-header characters).
    pub fn new(config: CorpusConfig) -> Result<Self, CorpusError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::AUTHORIZATION,
            reqwest::header::HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|_| CorpusError::Unreachable {
                    reason: "invalid API key characters".into(),
                })?,
        );
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| CorpusError::Unreachable {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn search(
        &self,
        text: &str,
        family: RegulationFamily,
        k: usize,
    ) -> Result<Vec<EvidencePassage>, CorpusError> {
        let url = format!("{}/v1/search", self.base_url);
        let body = serde_json::json!({
            "query": text,
            "family": family,
            "limit": k,
        });

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CorpusError::Unreachable {
                reason: format!("search: {e}"),
            })?;

        let status = resp.status();
        if status.is_server_error() {
            let excerpt = resp.text().await.unwrap_or_default();
            return Err(CorpusError::Unreachable {
                reason: format!("search: HTTP {status} — {excerpt}"),
            });
        }
        if !status.is_success() {
            let excerpt = resp.text().await.unwrap_or_default();
            return Err(CorpusError::MalformedResponse {
                endpoint: url,
                reason: format!("HTTP {status} — {excerpt}"),
            });
        }

        let parsed: SearchResponse =
            resp.json().await.map_err(|e| CorpusError::MalformedResponse {
                endpoint: url.clone(),
                reason: format!("response deserialization failed: {e}"),
            })?;

        tracing::debug!(
            family = %family,
            hits = parsed.results.len(),
            "corpus search returned hits"
        );

        Ok(parsed
            .results
            .into_iter()
            .map(|hit| {
                let provenance = Provenance {
                    document_id: hit.document_id,
                    offset: hit.offset,
                };
                EvidencePassage {
                    id: provenance.passage_id(),
                    source: hit.source,
                    kind: hit.kind,
                    family,
                    excerpt: hit.excerpt,
                    relevance: RelevanceBps::from_score(hit.score),
                    provenance,
                }
            })
            .collect())
    }
}

impl CorpusStore for HttpCorpusStore {
    fn query(
        &self,
        text: &str,
        family: RegulationFamily,
        k: usize,
    ) -> impl std::future::Future<Output = Result<Vec<EvidencePassage>, CorpusError>> + Send {
        self.search(text, family, k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_for(server: &MockServer) -> HttpCorpusStore {
        HttpCorpusStore::new(CorpusConfig::new(server.uri(), "test-key")).unwrap()
    }

    #[tokio::test]
    async fn query_maps_hits_to_passages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/search"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({"family": "GDPR", "limit": 5})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{
                    "document_id": "gdpr-2016-679",
                    "offset": 1840,
                    "source": "GDPR Art. 17",
                    "kind": "regulation",
                    "excerpt": "The data subject shall have the right to erasure...",
                    "score": 0.91
                }]
            })))
            .mount(&server)
            .await;

        let passages = store_for(&server)
            .query("staking pool retention", RegulationFamily::Gdpr, 5)
            .await
            .unwrap();

        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].id.as_str(), "gdpr-2016-679@1840");
        assert_eq!(passages[0].relevance.as_bps(), 9100);
        assert_eq!(passages[0].family, RegulationFamily::Gdpr);
    }

    #[tokio::test]
    async fn query_empty_results_is_ok_not_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"results": []})),
            )
            .mount(&server)
            .await;

        let passages = store_for(&server)
            .query("anything", RegulationFamily::Mica, 10)
            .await
            .unwrap();
        assert!(passages.is_empty());
    }

    #[tokio::test]
    async fn server_error_maps_to_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = store_for(&server)
            .query("anything", RegulationFamily::Gdpr, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, CorpusError::Unreachable { .. }));
    }

    #[tokio::test]
    async fn undecodable_body_maps_to_malformed_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = store_for(&server)
            .query("anything", RegulationFamily::Gdpr, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, CorpusError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn connection_refused_maps_to_unreachable() {
        // Port 1 is never listening.
        let store =
            HttpCorpusStore::new(CorpusConfig::new("http://127.0.0.1:1", "k")).unwrap();
        let err = store
            .query("anything", RegulationFamily::Gdpr, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, CorpusError::Unreachable { .. }));
    }
}
