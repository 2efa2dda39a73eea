//! Sequential HTTP latency sampling against one target at a time

use crate::{
    client::HttpClient,
    error::Result,
    logging::NetworkLogger,
    models::{SampleSet, SamplerOutcome, Target},
    stats,
};
use std::sync::Arc;

/// Issues repeated GET requests over one shared client and aggregates the
/// round-trip times
pub struct LatencySampler {
    client: Arc<dyn HttpClient>,
    logger: NetworkLogger,
}

impl LatencySampler {
    pub fn new(client: Arc<dyn HttpClient>, logger: NetworkLogger) -> Self {
        Self { client, logger }
    }

    /// Sample one target `repetitions` times
    ///
    /// Request N+1 starts only after request N has been recorded. Transport
    /// failures are logged and skipped; any HTTP status counts as a sample.
    /// A target with no successful request is `NoData`, not an error.
    pub async fn run(&self, target: &Target, repetitions: u32) -> Result<SamplerOutcome> {
        let mut samples = SampleSet::with_capacity(repetitions as usize);

        for attempt in 1..=repetitions {
            match self.client.get(&target.url).await {
                Ok(response) => {
                    samples.record(response.elapsed);
                    self.logger
                        .log_http_request(&target.url, "GET", response.status_code, response.elapsed)
                        .await;
                }
                Err(e) => {
                    self.logger.log_request_failure(&target.url, attempt, &e).await;
                }
            }
        }

        if samples.is_empty() {
            return Ok(SamplerOutcome::NoData {
                label: target.label.clone(),
                url: target.url.clone(),
                attempted: repetitions,
            });
        }

        let summary = stats::summarize(&target.label, &target.url, repetitions, &samples)?;
        Ok(SamplerOutcome::Summary(summary))
    }

    /// Sample each target in turn
    pub async fn run_sweep(&self, targets: &[Target], repetitions: u32) -> Result<Vec<SamplerOutcome>> {
        let mut outcomes = Vec::with_capacity(targets.len());
        for target in targets {
            outcomes.push(self.run(target, repetitions).await?);
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{HttpResponse, NetworkClient};
    use crate::error::{AppError, Result};
    use crate::models::Config;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sampler_with(client: Arc<dyn HttpClient>) -> LatencySampler {
        LatencySampler::new(client, NetworkLogger::new(&Config::default()))
    }

    fn network_sampler() -> LatencySampler {
        sampler_with(Arc::new(NetworkClient::new().unwrap()))
    }

    /// Fails every other request
    struct FlakyClient {
        calls: AtomicU32,
    }

    #[async_trait]
    impl HttpClient for FlakyClient {
        async fn get(&self, _url: &str) -> Result<HttpResponse> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call % 2 == 0 {
                Err(AppError::network("connection reset"))
            } else {
                Ok(HttpResponse {
                    status_code: 200,
                    body: String::new(),
                    elapsed: Duration::from_millis(10 * call as u64),
                })
            }
        }

        async fn post_json(&self, _url: &str, _body: &serde_json::Value) -> Result<HttpResponse> {
            Err(AppError::internal("unused"))
        }

        async fn post_bytes(&self, _url: &str, _body: Vec<u8>) -> Result<HttpResponse> {
            Err(AppError::internal("unused"))
        }
    }

    #[tokio::test]
    async fn test_fixed_delay_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(100)))
            .expect(10)
            .mount(&server)
            .await;

        let target = Target::new("stub", server.uri());
        let outcome = network_sampler().run(&target, 10).await.unwrap();

        let summary = outcome.summary().expect("summary expected");
        assert_eq!(summary.successful, 10);
        assert_eq!(summary.attempted, 10);
        assert!(summary.min_secs >= 0.1);
        assert!(summary.max_secs < 0.5);
        assert!(summary.mean_secs >= summary.min_secs && summary.mean_secs <= summary.max_secs);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_yields_no_data() {
        let target = Target::new("closed", "http://127.0.0.1:1/");
        let outcome = network_sampler().run(&target, 3).await.unwrap();

        assert_eq!(
            outcome,
            SamplerOutcome::NoData {
                label: "closed".to_string(),
                url: "http://127.0.0.1:1/".to_string(),
                attempted: 3,
            }
        );
    }

    #[tokio::test]
    async fn test_error_status_still_counts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let target = Target::new("failing-status", server.uri());
        let outcome = network_sampler().run(&target, 4).await.unwrap();
        assert_eq!(outcome.successful(), 4);
    }

    #[tokio::test]
    async fn test_transport_failures_are_skipped() {
        let sampler = sampler_with(Arc::new(FlakyClient {
            calls: AtomicU32::new(0),
        }));
        let outcome = sampler.run(&Target::new("flaky", "http://flaky/"), 6).await.unwrap();

        let summary = outcome.summary().expect("summary expected");
        assert_eq!(summary.attempted, 6);
        assert_eq!(summary.successful, 3);
        assert!((summary.min_secs - 0.01).abs() < 1e-9);
        assert!((summary.max_secs - 0.05).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_sweep_preserves_target_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let targets = vec![
            Target::new("first", server.uri()),
            Target::new("second", "http://127.0.0.1:1/"),
        ];
        let outcomes = network_sampler().run_sweep(&targets, 2).await.unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].label(), "first");
        assert!(outcomes[0].has_data());
        assert_eq!(outcomes[1].label(), "second");
        assert!(!outcomes[1].has_data());
    }
}
