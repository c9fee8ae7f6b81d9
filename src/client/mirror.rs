//! Best-effort mirror store for trustline records.
//!
//! The mirror is a hosted `trustlines` table reached over REST. It is an
//! observability cache, not a source of truth: the workflow logs and moves
//! on when it is unavailable.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;

use crate::error::SextantError;
use crate::trustline::types::{Asset, TrustRecord};

#[async_trait]
pub trait MirrorStore: Send + Sync {
    /// Point lookup by (user_id, asset_code, asset_issuer).
    async fn find_trustline(
        &self,
        user_id: &str,
        asset: &Asset,
    ) -> Result<Option<TrustRecord>, SextantError>;

    async fn insert_trustline(&self, record: &TrustRecord) -> Result<(), SextantError>;
}

/// REST implementation over a hosted table with query-parameter filters.
pub struct HttpMirrorStore {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl HttpMirrorStore {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    fn with_auth(&self, request: RequestBuilder) -> RequestBuilder {
        if let Some(key) = &self.api_key {
            request
                .header("apikey", key)
                .header("Authorization", format!("Bearer {}", key))
        } else {
            request
        }
    }

    fn table_url(&self) -> String {
        format!("{}/trustlines", self.base_url)
    }
}

#[async_trait]
impl MirrorStore for HttpMirrorStore {
    async fn find_trustline(
        &self,
        user_id: &str,
        asset: &Asset,
    ) -> Result<Option<TrustRecord>, SextantError> {
        let request = self.client.get(self.table_url()).query(&[
            ("user_id", format!("eq.{}", user_id)),
            ("asset_code", format!("eq.{}", asset.code)),
            ("asset_issuer", format!("eq.{}", asset.issuer)),
            ("limit", "1".to_string()),
        ]);

        let response = self
            .with_auth(request)
            .send()
            .await
            .map_err(|e| SextantError::MirrorStoreError(format!("Lookup failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(SextantError::MirrorStoreError(format!(
                "Lookup returned {}",
                response.status()
            )));
        }

        let rows: Vec<TrustRecord> = response
            .json()
            .await
            .map_err(|e| SextantError::MirrorStoreError(format!("Malformed rows: {}", e)))?;

        Ok(rows.into_iter().next())
    }

    async fn insert_trustline(&self, record: &TrustRecord) -> Result<(), SextantError> {
        let request = self.client.post(self.table_url()).json(record);

        let response = self
            .with_auth(request)
            .send()
            .await
            .map_err(|e| SextantError::MirrorStoreError(format!("Insert failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(SextantError::MirrorStoreError(format!(
                "Insert returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
