//! A [TransactionsApi] implementation backed by `reqwest`.

use std::time::Duration;

use reqwest::{Client as HttpClient, Response, Url};
use serde::de::DeserializeOwned;

use crate::{
    Error,
    api::{ApiError, DataEnvelope, TransactionQuery, TransactionsApi, parse_error_body},
    transaction::{Transaction, TransactionDraft, TransactionId},
};

const TRANSACTIONS_PATH: &str = "transactions";

/// Talks to the remote transactions service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransactionsApi {
    base_url: Url,
    http_client: HttpClient,
}

impl HttpTransactionsApi {
    /// Create a client for the API rooted at `base_url`, e.g.
    /// "http://localhost:5000/api/v1".
    ///
    /// # Errors
    /// Returns an [Error::InvalidApiUrl] if `base_url` is not an absolute HTTP
    /// URL, or an [Error::HttpClient] if the HTTP client could not be built.
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)
            .map_err(|error| Error::InvalidApiUrl(format!("{base_url}: {error}")))?;

        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::InvalidApiUrl(base_url.to_string()));
        }

        let http_client = HttpClient::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|error| Error::HttpClient(error.to_string()))?;

        Ok(Self {
            base_url,
            http_client,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();

        // `new` guarantees the URL can be a base.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }

        url
    }
}

impl TransactionsApi for HttpTransactionsApi {
    async fn list(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, ApiError> {
        let url = self.endpoint(&[TRANSACTIONS_PATH]);
        tracing::debug!("GET {url} with {query:?}");

        let response = self
            .http_client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(log_transport_error)?;

        read_data(response).await
    }

    async fn create(&self, draft: &TransactionDraft) -> Result<Transaction, ApiError> {
        let url = self.endpoint(&[TRANSACTIONS_PATH]);
        tracing::debug!("POST {url}");

        let response = self
            .http_client
            .post(url)
            .json(draft)
            .send()
            .await
            .map_err(log_transport_error)?;

        read_data(response).await
    }

    async fn update(
        &self,
        id: &TransactionId,
        draft: &TransactionDraft,
    ) -> Result<Transaction, ApiError> {
        let url = self.endpoint(&[TRANSACTIONS_PATH, id.as_ref()]);
        tracing::debug!("PUT {url}");

        let response = self
            .http_client
            .put(url)
            .json(draft)
            .send()
            .await
            .map_err(log_transport_error)?;

        read_data(response).await
    }

    async fn delete(&self, id: &TransactionId) -> Result<(), ApiError> {
        let url = self.endpoint(&[TRANSACTIONS_PATH, id.as_ref()]);
        tracing::debug!("DELETE {url}");

        let response = self
            .http_client
            .delete(url)
            .send()
            .await
            .map_err(log_transport_error)?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(read_error(response).await)
    }
}

fn log_transport_error(error: reqwest::Error) -> ApiError {
    tracing::error!("could not reach the transactions API: {error}");
    ApiError::Unavailable
}

/// Unwrap the `data` field of a successful response.
async fn read_data<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.status().is_success() {
        return Err(read_error(response).await);
    }

    let body = response.bytes().await.map_err(log_transport_error)?;

    serde_json::from_slice::<DataEnvelope<T>>(&body)
        .map(|envelope| envelope.data)
        .map_err(|error| {
            tracing::error!("could not parse response from the transactions API: {error}");
            ApiError::Unavailable
        })
}

async fn read_error(response: Response) -> ApiError {
    let status = response.status();

    match response.bytes().await {
        Ok(body) => {
            let error = parse_error_body(&body);
            tracing::warn!("transactions API responded with {status}: {error:?}");
            error
        }
        Err(error) => {
            tracing::error!("could not read error response ({status}): {error}");
            ApiError::Unavailable
        }
    }
}
