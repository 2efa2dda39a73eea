//! Submission plans, results and the sequential / fan-out driver

use super::endpoint::RelayEndpoint;
use super::sdk::TransactionSdk;
use crate::client::HttpClient;
use crate::logging::NetworkLogger;
use crate::types::{ConcurrencyMode, SubmitEncoding};
use futures::future::join_all;
use solana_sdk::transaction::Transaction;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// What the relay said about one transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Relay accepted; usually the transaction signature
    Accepted { response: String },
    /// JSON-RPC error, HTTP error status or transport failure
    Rejected { reason: String },
}

/// Outcome of one submission to one endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    pub label: String,
    pub encoding: SubmitEncoding,
    pub elapsed: Duration,
    pub outcome: SubmissionOutcome,
}

impl SubmissionResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self.outcome, SubmissionOutcome::Accepted { .. })
    }
}

/// Results in plan order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionReport {
    pub results: Vec<SubmissionResult>,
}

impl SubmissionReport {
    pub fn get(&self, label: &str) -> Option<&SubmissionResult> {
        self.results.iter().find(|r| r.label == label)
    }

    pub fn accepted_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_accepted()).count()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Signed transactions paired with the endpoints they go to
#[derive(Debug, Clone)]
pub struct SubmissionPlan {
    pub entries: Vec<(RelayEndpoint, Transaction)>,
    pub mode: ConcurrencyMode,
    pub encoding: SubmitEncoding,
    /// Issue a warm-up request to each endpoint before the timed submission
    pub keep_alive: bool,
}

impl SubmissionPlan {
    pub fn single(endpoint: RelayEndpoint, transaction: Transaction, encoding: SubmitEncoding) -> Self {
        Self {
            entries: vec![(endpoint, transaction)],
            mode: ConcurrencyMode::Sequential,
            encoding,
            keep_alive: false,
        }
    }

    pub fn fan_out(entries: Vec<(RelayEndpoint, Transaction)>) -> Self {
        Self {
            entries,
            mode: ConcurrencyMode::FanOut,
            encoding: SubmitEncoding::JsonRpc,
            keep_alive: false,
        }
    }

    pub fn with_keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }
}

/// Drives a plan through an SDK, sharing its HTTP client for warm-ups
pub struct Submitter {
    client: Arc<dyn HttpClient>,
    logger: NetworkLogger,
}

impl Submitter {
    pub fn new(client: Arc<dyn HttpClient>, logger: NetworkLogger) -> Self {
        Self { client, logger }
    }

    /// GET the endpoint's health path so the submission reuses a warm connection
    pub async fn warm_up(&self, endpoint: &RelayEndpoint) {
        let url = match endpoint.health_url() {
            Ok(url) => url,
            Err(e) => {
                self.logger
                    .log_warm_up(&endpoint.base_url, false, Some(&e.to_string()))
                    .await;
                return;
            }
        };

        match self.client.get(&url).await {
            Ok(_) => self.logger.log_warm_up(&url, true, None).await,
            Err(e) => self.logger.log_warm_up(&url, false, Some(&e.to_string())).await,
        }
    }

    /// Submit every entry; one failure never affects another
    pub async fn execute(&self, plan: &SubmissionPlan, sdk: &dyn TransactionSdk) -> SubmissionReport {
        let correlation_id = Uuid::new_v4().to_string();

        if plan.keep_alive {
            for (endpoint, _) in &plan.entries {
                self.warm_up(endpoint).await;
            }
        }

        let results = match plan.mode {
            ConcurrencyMode::Sequential => {
                let mut results = Vec::with_capacity(plan.entries.len());
                for (endpoint, transaction) in &plan.entries {
                    results.push(sdk.submit(endpoint, transaction, plan.encoding).await);
                }
                results
            }
            ConcurrencyMode::FanOut => {
                join_all(
                    plan.entries
                        .iter()
                        .map(|(endpoint, transaction)| sdk.submit(endpoint, transaction, plan.encoding)),
                )
                .await
            }
        };

        self.log_results(&results, &correlation_id).await;
        SubmissionReport { results }
    }

    /// Submit `cold` on whatever connection the client has, warm the
    /// endpoint up, then submit `warm` on the same client.
    ///
    /// Results are labelled `"<label> (cold)"` and `"<label> (warm)"`.
    pub async fn compare_keep_alive(
        &self,
        endpoint: &RelayEndpoint,
        cold: &Transaction,
        warm: &Transaction,
        encoding: SubmitEncoding,
        sdk: &dyn TransactionSdk,
    ) -> SubmissionReport {
        let correlation_id = Uuid::new_v4().to_string();

        let mut cold_result = sdk.submit(endpoint, cold, encoding).await;
        cold_result.label = format!("{} (cold)", endpoint.label);

        self.warm_up(endpoint).await;

        let mut warm_result = sdk.submit(endpoint, warm, encoding).await;
        warm_result.label = format!("{} (warm)", endpoint.label);

        let results = vec![cold_result, warm_result];
        self.log_results(&results, &correlation_id).await;
        SubmissionReport { results }
    }

    async fn log_results(&self, results: &[SubmissionResult], correlation_id: &str) {
        for result in results {
            let outcome = match &result.outcome {
                SubmissionOutcome::Accepted { response } => Ok(response.as_str()),
                SubmissionOutcome::Rejected { reason } => Err(reason.as_str()),
            };
            self.logger
                .log_submission(
                    &result.label,
                    result.encoding.name(),
                    result.elapsed,
                    outcome,
                    correlation_id,
                )
                .await;
        }
    }
}
