//! ViaCEP Lookup Adapter
//!
//! Implements `AddressLookupPort` against the ViaCEP REST service
//! (`GET {base_url}/ws/{cep}/json/`), the public lookup for Brazilian
//! postal codes (CEP).
//!
//! # Not-found handling
//!
//! ViaCEP reports an unknown CEP as `200 {"erro": true}` and a malformed one
//! as `400`. Both become `Address::unresolved()`, the port's sentinel. Codes
//! that do not reduce to eight digits are answered with the sentinel without
//! a request.
//!
//! # Error Handling
//!
//! Transport failures are mapped to `PortError` variants:
//! - 429 -> `PortError::RateLimited`
//! - 5xx and an open circuit -> `PortError::ServiceUnavailable`
//! - Timeouts -> `PortError::Timeout`
//! - Connection failures -> `PortError::Connection`
//! - Undecodable bodies -> `PortError::Transformation`
//!
//! Nothing is retried here. Repeated transport failures open the circuit
//! breaker, which then fails calls fast until the reset timeout elapses.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use url::Url;

use core_kernel::{
    AdapterHealth, CircuitBreakerConfig, DomainPort, HealthCheckResult, HealthCheckable,
    PortError, PostalCode,
};

use crate::address::Address;
use crate::ports::AddressLookupPort;

const ADAPTER_ID: &str = "viacep-lookup-adapter";
const SERVICE_NAME: &str = "ViaCEP";

/// Configuration for the ViaCEP adapter
#[derive(Debug, Clone)]
pub struct ViaCepConfig {
    /// Base URL of the service (e.g., "https://viacep.com.br/")
    pub base_url: Url,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Circuit breaker configuration, `None` disables it
    pub circuit_breaker: Option<CircuitBreakerConfig>,
}

impl ViaCepConfig {
    /// Creates a configuration with default timeout and circuit breaker
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout_secs: 10,
            circuit_breaker: Some(CircuitBreakerConfig::default()),
        }
    }
}

/// Circuit breaker state for fault tolerance
#[derive(Debug)]
struct CircuitBreaker {
    config: CircuitBreakerConfig,
    failure_count: AtomicU64,
    success_count: AtomicU64,
    is_open: AtomicBool,
    last_failure_time: RwLock<Option<Instant>>,
}

impl CircuitBreaker {
    fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            failure_count: AtomicU64::new(0),
            success_count: AtomicU64::new(0),
            is_open: AtomicBool::new(false),
            last_failure_time: RwLock::new(None),
        }
    }

    async fn is_available(&self) -> bool {
        if !self.is_open.load(Ordering::Relaxed) {
            return true;
        }

        // half-open once the reset timeout has elapsed
        let last_failure = self.last_failure_time.read().await;
        last_failure.is_some_and(|time| {
            time.elapsed() > Duration::from_secs(self.config.reset_timeout_secs)
        })
    }

    fn record_success(&self) {
        self.failure_count.store(0, Ordering::Relaxed);
        if !self.is_open.load(Ordering::Relaxed) {
            return;
        }
        let success = self.success_count.fetch_add(1, Ordering::Relaxed) + 1;
        if success >= u64::from(self.config.success_threshold) {
            self.is_open.store(false, Ordering::Relaxed);
            self.success_count.store(0, Ordering::Relaxed);
        }
    }

    async fn record_failure(&self) {
        self.success_count.store(0, Ordering::Relaxed);
        let failures = self.failure_count.fetch_add(1, Ordering::Relaxed) + 1;
        if failures >= u64::from(self.config.failure_threshold) {
            self.is_open.store(true, Ordering::Relaxed);
            *self.last_failure_time.write().await = Some(Instant::now());
        }
    }
}

/// ViaCEP implementation of `AddressLookupPort`
///
/// # Example
///
/// ```rust,ignore
/// use domain_customer::adapters::{ViaCepAdapter, ViaCepConfig};
///
/// let adapter = ViaCepAdapter::new(ViaCepConfig::new(
///     "https://viacep.com.br/".parse()?,
/// ))?;
/// let address = adapter.lookup(&PostalCode::new("01001-000")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ViaCepAdapter {
    http: Client,
    config: ViaCepConfig,
    circuit_breaker: Option<Arc<CircuitBreaker>>,
}

impl ViaCepAdapter {
    /// Creates an adapter with its own HTTP client
    ///
    /// # Errors
    ///
    /// Returns `PortError::Internal` if the HTTP client cannot be built
    pub fn new(config: ViaCepConfig) -> Result<Self, PortError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PortError::internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(config, http))
    }

    /// Creates an adapter around an existing HTTP client
    pub fn with_client(config: ViaCepConfig, http: Client) -> Self {
        let circuit_breaker = config
            .circuit_breaker
            .clone()
            .map(|cb| Arc::new(CircuitBreaker::new(cb)));

        Self {
            http,
            config,
            circuit_breaker,
        }
    }

    /// Returns the base URL of the lookup service
    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// Checks if the circuit breaker is open (blocking requests)
    pub async fn is_circuit_open(&self) -> bool {
        match self.circuit_breaker {
            Some(ref cb) => !cb.is_available().await,
            None => false,
        }
    }

    async fn fetch(&self, digits: &str) -> Result<Address, PortError> {
        let url = self
            .config
            .base_url
            .join(&format!("ws/{digits}/json/"))
            .map_err(|e| PortError::internal(format!("failed to build url: {e}")))?;

        let response = self.http.get(url).send().await.map_err(|e| self.map_transport_error(e))?;

        match response.status() {
            status if status.is_success() => {
                let body: ViaCepResponse = response.json().await.map_err(|e| {
                    PortError::Transformation {
                        message: format!("unexpected ViaCEP response: {e}"),
                    }
                })?;
                Ok(body.into_address())
            }
            StatusCode::BAD_REQUEST => {
                debug!("ViaCEP rejected the postal code format");
                Ok(Address::unresolved())
            }
            StatusCode::TOO_MANY_REQUESTS => Err(PortError::RateLimited {
                retry_after_secs: retry_after_secs(&response).unwrap_or(1),
            }),
            status if status.is_server_error() => Err(PortError::unavailable(format!(
                "{SERVICE_NAME} responded {status}"
            ))),
            status => Err(PortError::internal(format!(
                "unexpected {SERVICE_NAME} status {status}"
            ))),
        }
    }

    fn map_transport_error(&self, error: reqwest::Error) -> PortError {
        if error.is_timeout() {
            PortError::timeout(
                format!("{SERVICE_NAME} lookup"),
                Duration::from_secs(self.config.timeout_secs),
            )
        } else if error.is_connect() {
            PortError::Connection {
                message: format!("cannot reach {SERVICE_NAME}"),
                source: Some(Box::new(error)),
            }
        } else {
            PortError::Internal {
                message: format!("{SERVICE_NAME} request failed"),
                source: Some(Box::new(error)),
            }
        }
    }
}

fn retry_after_secs(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

impl DomainPort for ViaCepAdapter {}

#[async_trait]
impl HealthCheckable for ViaCepAdapter {
    /// Reports the circuit state; does not call the remote service
    async fn health_check(&self) -> HealthCheckResult {
        if self.is_circuit_open().await {
            return HealthCheckResult::new(ADAPTER_ID, AdapterHealth::Degraded, 0)
                .with_message("Circuit breaker is open");
        }
        HealthCheckResult::new(ADAPTER_ID, AdapterHealth::Healthy, 0)
    }
}

#[async_trait]
impl AddressLookupPort for ViaCepAdapter {
    #[instrument(skip(self), fields(postal_code = %postal_code))]
    async fn lookup(&self, postal_code: &PostalCode) -> Result<Address, PortError> {
        let digits = postal_code.digits();
        if digits.len() != 8 {
            debug!("Postal code is not a CEP, skipping request");
            return Ok(Address::unresolved());
        }

        if let Some(ref cb) = self.circuit_breaker {
            if !cb.is_available().await {
                return Err(PortError::unavailable(format!(
                    "{SERVICE_NAME} circuit breaker is open"
                )));
            }
        }

        let result = self.fetch(&digits).await;

        if let Some(ref cb) = self.circuit_breaker {
            match &result {
                Err(e) if e.is_transient() => {
                    warn!(error = %e, "ViaCEP lookup failed");
                    cb.record_failure().await;
                }
                _ => cb.record_success(),
            }
        }

        result
    }
}

// =============================================================================
// ViaCEP Data Transfer Objects
// =============================================================================

/// Body of `GET /ws/{cep}/json/`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ViaCepResponse {
    cep: Option<String>,
    logradouro: Option<String>,
    complemento: Option<String>,
    bairro: Option<String>,
    localidade: Option<String>,
    uf: Option<String>,
    ibge: Option<String>,
    ddd: Option<String>,
    /// `true` (or `"true"`) for unknown CEPs
    erro: Option<serde_json::Value>,
}

impl ViaCepResponse {
    fn is_error(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            Some(_) => true,
            None => false,
        }
    }

    fn into_address(self) -> Address {
        if self.is_error() {
            return Address::unresolved();
        }
        let Some(cep) = self.cep.filter(|c| !c.trim().is_empty()) else {
            return Address::unresolved();
        };

        Address {
            postal_code: PostalCode::new(cep),
            street: self.logradouro.unwrap_or_default(),
            complement: non_empty(self.complemento),
            neighborhood: self.bairro.unwrap_or_default(),
            city: self.localidade.unwrap_or_default(),
            state: self.uf.unwrap_or_default(),
            ibge_code: non_empty(self.ibge),
            area_code: non_empty(self.ddd),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn adapter(server: &MockServer, circuit_breaker: Option<CircuitBreakerConfig>) -> ViaCepAdapter {
        let config = ViaCepConfig {
            base_url: Url::parse(&server.url("/")).expect("url"),
            timeout_secs: 5,
            circuit_breaker,
        };
        ViaCepAdapter::new(config).expect("adapter")
    }

    #[tokio::test]
    async fn lookup_maps_viacep_fields() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/ws/01001000/json/");
                then.status(200).json_body(json!({
                    "cep": "01001-000",
                    "logradouro": "Praça da Sé",
                    "complemento": "lado ímpar",
                    "bairro": "Sé",
                    "localidade": "São Paulo",
                    "uf": "SP",
                    "ibge": "3550308",
                    "gia": "1004",
                    "ddd": "11",
                    "siafi": "7107"
                }));
            })
            .await;

        let address = adapter(&server, None)
            .lookup(&PostalCode::new("01001-000"))
            .await
            .expect("lookup");

        mock.assert_async().await;
        assert_eq!(address.postal_code.as_str(), "01001-000");
        assert_eq!(address.street, "Praça da Sé");
        assert_eq!(address.complement.as_deref(), Some("lado ímpar"));
        assert_eq!(address.neighborhood, "Sé");
        assert_eq!(address.city, "São Paulo");
        assert_eq!(address.state, "SP");
        assert_eq!(address.ibge_code.as_deref(), Some("3550308"));
        assert_eq!(address.area_code.as_deref(), Some("11"));
    }

    #[tokio::test]
    async fn unknown_cep_yields_sentinel() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/ws/99999999/json/");
                then.status(200).json_body(json!({ "erro": "true" }));
            })
            .await;

        let address = adapter(&server, None)
            .lookup(&PostalCode::new("99999-999"))
            .await
            .expect("lookup");

        assert!(address.is_unresolved());
    }

    #[tokio::test]
    async fn rejected_format_yields_sentinel() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/ws/01001000/json/");
                then.status(400).body("Bad Request");
            })
            .await;

        let address = adapter(&server, None)
            .lookup(&PostalCode::new("01001000"))
            .await
            .expect("lookup");

        assert!(address.is_unresolved());
    }

    #[tokio::test]
    async fn non_cep_input_skips_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200).json_body(json!({}));
            })
            .await;

        let address = adapter(&server, None)
            .lookup(&PostalCode::new("1234"))
            .await
            .expect("lookup");

        assert!(address.is_unresolved());
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn server_error_is_unavailable() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/ws/01001000/json/");
                then.status(503);
            })
            .await;

        let err = adapter(&server, None)
            .lookup(&PostalCode::new("01001-000"))
            .await
            .expect_err("should fail");

        assert!(matches!(err, PortError::ServiceUnavailable { .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn rate_limit_reads_retry_after() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/ws/01001000/json/");
                then.status(429).header("Retry-After", "30");
            })
            .await;

        let err = adapter(&server, None)
            .lookup(&PostalCode::new("01001-000"))
            .await
            .expect_err("should fail");

        assert!(matches!(err, PortError::RateLimited { retry_after_secs: 30 }));
    }

    #[tokio::test]
    async fn garbage_body_is_transformation_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/ws/01001000/json/");
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        let err = adapter(&server, None)
            .lookup(&PostalCode::new("01001-000"))
            .await
            .expect_err("should fail");

        assert!(matches!(err, PortError::Transformation { .. }));
    }

    #[tokio::test]
    async fn circuit_opens_after_repeated_failures() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/ws/01001000/json/");
                then.status(500);
            })
            .await;

        let adapter = adapter(
            &server,
            Some(CircuitBreakerConfig {
                failure_threshold: 2,
                reset_timeout_secs: 60,
                success_threshold: 1,
            }),
        );
        let code = PostalCode::new("01001-000");

        for _ in 0..2 {
            assert!(adapter.lookup(&code).await.is_err());
        }
        assert!(adapter.is_circuit_open().await);

        let err = adapter.lookup(&code).await.expect_err("fails fast");
        assert!(matches!(err, PortError::ServiceUnavailable { .. }));
        assert_eq!(mock.hits_async().await, 2);

        let health = adapter.health_check().await;
        assert_eq!(health.status, AdapterHealth::Degraded);
    }

    #[test]
    fn test_config_defaults() {
        let config = ViaCepConfig::new(Url::parse("https://viacep.com.br/").unwrap());
        assert_eq!(config.timeout_secs, 10);
        assert!(config.circuit_breaker.is_some());
    }
}
