//! HTTP client for the bath ledger REST API.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{
    ErrorBody, TransactionId, endpoints,
    endpoints::format_endpoint,
    setting::BathPrice,
    transaction::{DeleteAcknowledgement, NewTransaction, Transaction},
};

/// The address of a server running locally with the default port.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// The errors that may occur when talking to the REST API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request could not be sent or the response could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    ///
    /// `message` is the `error` field of the response body, or the body text
    /// if it was not a JSON error.
    #[error("API error ({status}): {message}")]
    Api {
        /// The status code of the response.
        status: StatusCode,
        /// What the server said went wrong.
        message: String,
    },
}

/// A typed client for the transaction and bath price endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the server at `base_url`, e.g. `http://localhost:3000`.
    ///
    /// # Errors
    /// Returns a [ClientError::Http] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder().build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get all transactions, most recent first.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>, ClientError> {
        let response = self
            .http_client
            .get(self.url(endpoints::TRANSACTIONS_API))
            .send()
            .await?;

        parse_response(response).await
    }

    /// Store a new transaction and return it as saved by the server.
    pub async fn create_transaction(
        &self,
        new_transaction: &NewTransaction,
    ) -> Result<Transaction, ClientError> {
        let response = self
            .http_client
            .post(self.url(endpoints::TRANSACTIONS_API))
            .json(new_transaction)
            .send()
            .await?;

        parse_response(response).await
    }

    /// Delete the transaction with the ID `transaction_id`.
    pub async fn delete_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<(), ClientError> {
        let path = format_endpoint(endpoints::TRANSACTION, transaction_id);
        let response = self.http_client.delete(self.url(&path)).send().await?;

        parse_response::<DeleteAcknowledgement>(response)
            .await
            .map(|_| ())
    }

    /// Get the current bath price.
    pub async fn get_bath_price(&self) -> Result<i64, ClientError> {
        let response = self
            .http_client
            .get(self.url(endpoints::BATH_PRICE))
            .send()
            .await?;

        parse_response::<BathPrice>(response)
            .await
            .map(|body| body.price)
    }

    /// Set the bath price and return the price accepted by the server.
    pub async fn set_bath_price(&self, price: i64) -> Result<i64, ClientError> {
        let response = self
            .http_client
            .post(self.url(endpoints::BATH_PRICE))
            .json(&json!({ "price": price }))
            .send()
            .await?;

        parse_response::<BathPrice>(response)
            .await
            .map(|body| body.price)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }
}

async fn parse_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await?;
    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.error,
        Err(_) if text.is_empty() => status.to_string(),
        Err(_) => text,
    };

    Err(ClientError::Api { status, message })
}
