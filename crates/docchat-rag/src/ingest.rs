//! Forwarding client for the external ingestion service.
//!
//! Parsing, chunking, and embedding of PDFs happen in a separate service
//! that writes retrievable chunks into the same collection the chat
//! pipeline reads. This client only hands the document URLs over.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::IngestError;

pub struct IngestClient {
    client: reqwest::Client,
    analyse_url: String,
    timeout: Duration,
}

impl IngestClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let analyse_url = format!("{}/analyse", base_url.trim_end_matches('/'));
        Self {
            client: reqwest::Client::new(),
            analyse_url,
            timeout,
        }
    }

    /// Submit PDF URLs for indexing; returns the service's confirmation
    /// message. Failures are surfaced unchanged.
    pub async fn analyse(&self, pdf_urls: &[String]) -> Result<String, IngestError> {
        let response = self
            .client
            .post(&self.analyse_url)
            .timeout(self.timeout)
            .json(&AnalyseRequest { pdf_urls })
            .send()
            .await
            .map_err(|e| IngestError::IngestionFailed(format!("ingestion service unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(IngestError::IngestionFailed(format!(
                "analyse request failed ({status}): {body}"
            )));
        }

        let parsed: AnalyseResponse = response
            .json()
            .await
            .map_err(|e| IngestError::IngestionFailed(format!("malformed analyse response: {e}")))?;
        Ok(parsed.message)
    }
}

#[derive(Serialize)]
struct AnalyseRequest<'a> {
    pdf_urls: &'a [String],
}

#[derive(Deserialize)]
struct AnalyseResponse {
    message: String,
}
