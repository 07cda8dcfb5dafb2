//! The client-side ledger: a cache of the server's transactions and bath
//! price, plus the totals derived from them.

use crate::{
    TransactionId,
    client::{ApiClient, ClientError},
    transaction::{NewTransaction, Transaction, TransactionType},
};

/// The bath price assumed until the server's price has been loaded.
pub const DEFAULT_BATH_PRICE: i64 = 1_500_000;

/// Cached ledger state backed by an [ApiClient].
///
/// Every action marks the ledger as loading and clears the previous error
/// before calling the server. On failure a short message is stored in
/// [Ledger::error] and the cache is left unchanged.
#[derive(Debug, Clone)]
pub struct Ledger {
    client: ApiClient,
    transactions: Vec<Transaction>,
    bath_price: i64,
    is_loading: bool,
    error: Option<String>,
}

impl Ledger {
    /// Create an empty ledger that talks to the server through `client`.
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            transactions: Vec::new(),
            bath_price: DEFAULT_BATH_PRICE,
            is_loading: false,
            error: None,
        }
    }

    /// The cached transactions, most recent first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The cached bath price.
    pub fn bath_price(&self) -> i64 {
        self.bath_price
    }

    /// Whether an action is in progress.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// The message of the last failed action, cleared when the next action starts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The sum of the cached income amounts.
    pub fn total_income(&self) -> f64 {
        self.total_of(TransactionType::Income)
    }

    /// The sum of the cached expense amounts.
    pub fn total_expense(&self) -> f64 {
        self.total_of(TransactionType::Expense)
    }

    /// Replace the cached transactions with the server's.
    pub async fn fetch_transactions(&mut self) {
        self.start();
        let result = self.client.list_transactions().await;

        match result {
            Ok(transactions) => self.transactions = transactions,
            Err(error) => self.fail("Failed to load transactions", &error),
        }
        self.is_loading = false;
    }

    /// Store a new transaction and put it at the front of the cache.
    ///
    /// # Errors
    /// Returns the [ClientError] from the server call, after recording it.
    pub async fn add_transaction(
        &mut self,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, ClientError> {
        self.start();
        let result = self.client.create_transaction(&new_transaction).await;

        match &result {
            Ok(transaction) => self.transactions.insert(0, transaction.clone()),
            Err(error) => self.fail("Failed to add transaction", error),
        }
        self.is_loading = false;

        result
    }

    /// Delete a transaction on the server and drop it from the cache.
    pub async fn delete_transaction(&mut self, transaction_id: TransactionId) {
        self.start();
        let result = self.client.delete_transaction(transaction_id).await;

        match result {
            Ok(()) => self
                .transactions
                .retain(|transaction| transaction.id != transaction_id),
            Err(error) => self.fail("Failed to delete transaction", &error),
        }
        self.is_loading = false;
    }

    /// Set the bath price on the server and cache the accepted price.
    pub async fn update_bath_price(&mut self, price: i64) {
        self.start();
        let result = self.client.set_bath_price(price).await;

        match result {
            Ok(price) => self.bath_price = price,
            Err(error) => self.fail("Failed to update bath price", &error),
        }
        self.is_loading = false;
    }

    /// Load the server's bath price into the cache.
    pub async fn fetch_bath_price(&mut self) {
        self.start();
        let result = self.client.get_bath_price().await;

        match result {
            Ok(price) => self.bath_price = price,
            Err(error) => self.fail("Failed to load bath price", &error),
        }
        self.is_loading = false;
    }

    fn start(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    fn fail(&mut self, message: &str, error: &ClientError) {
        tracing::error!("{message}: {error}");
        self.error = Some(message.to_owned());
    }

    fn total_of(&self, kind: TransactionType) -> f64 {
        self.transactions
            .iter()
            .filter(|transaction| transaction.kind == kind)
            .map(|transaction| transaction.amount)
            .sum()
    }
}
