//! Prometheus metrics.
//!
//! Counters recorded by the search path:
//!
//! | Metric | Labels |
//! |--------|--------|
//! | `search_requests_total` | `mode` |
//! | `search_semantic_started` | |
//! | `search_semantic_completed` | `status` |
//! | `search_fallback_total` | `reason` |
//! | `search_semantic_unknown_ids_total` | |
//! | `search_duration_ms` (histogram) | `source` |
//! | `description_enhance_total` | `status` |

use crate::config::parse_bool_env;
use crate::{Error, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::thread;
use std::time::Duration;

/// Default listener port.
const DEFAULT_PORT: u16 = 9090;

/// Metrics configuration.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether metrics are enabled.
    pub enabled: bool,
    /// Address to bind the metrics exporter.
    pub listen_addr: SocketAddr,
    /// Push gateway endpoint, for runs too short to be scraped.
    pub push_gateway: Option<String>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            push_gateway: None,
        }
    }
}

impl MetricsConfig {
    /// Builds metrics configuration from environment variables.
    ///
    /// Reads `SKILLSWAP_METRICS_ENABLED`, `SKILLSWAP_METRICS_PORT` and
    /// `SKILLSWAP_METRICS_PUSH_GATEWAY`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(enabled) = parse_bool_env("SKILLSWAP_METRICS_ENABLED") {
            config.enabled = enabled;
        }
        if let Some(port) = std::env::var("SKILLSWAP_METRICS_PORT")
            .ok()
            .and_then(|value| value.trim().parse::<u16>().ok())
        {
            config.listen_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port);
        }
        config.push_gateway = std::env::var("SKILLSWAP_METRICS_PUSH_GATEWAY")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        config
    }
}

/// Metrics handle for flushing on shutdown.
#[derive(Debug)]
pub struct MetricsHandle {
    prometheus: PrometheusHandle,
    push_gateway: Option<String>,
}

impl MetricsHandle {
    /// Renders the current metrics in Prometheus text format.
    #[must_use]
    pub fn render(&self) -> String {
        self.prometheus.render()
    }
}

/// Installs the Prometheus recorder, with an HTTP listener when `expose` is set.
///
/// # Errors
///
/// Returns an error if a global recorder is already installed or the listener
/// cannot start.
pub fn install_prometheus(config: &MetricsConfig, expose: bool) -> Result<Option<MetricsHandle>> {
    if !config.enabled {
        return Ok(None);
    }

    let builder = PrometheusBuilder::new();
    let prometheus = if expose {
        install_listener(builder.with_http_listener(config.listen_addr))?
    } else {
        let recorder = builder.build_recorder();
        let handle = recorder.handle();
        set_global_recorder(recorder)?;
        handle
    };

    tracing::debug!(expose, addr = %config.listen_addr, "Metrics recorder installed");

    Ok(Some(MetricsHandle {
        prometheus,
        push_gateway: config.push_gateway.clone(),
    }))
}

/// Pushes metrics to the push gateway if one is configured.
pub fn flush(handle: &MetricsHandle) {
    let Some(endpoint) = handle.push_gateway.clone() else {
        tracing::debug!("No push gateway configured, skipping flush");
        return;
    };

    let mut payload = handle.prometheus.render();
    if !payload.ends_with('\n') {
        payload.push('\n');
    }

    tracing::debug!(bytes = payload.len(), endpoint = %endpoint, "Pushing metrics");

    // The blocking client must not run on a runtime thread
    if tokio::runtime::Handle::try_current().is_ok() {
        let worker = thread::spawn(move || push_to_gateway(&endpoint, payload));
        let _ = worker.join();
    } else {
        push_to_gateway(&endpoint, payload);
    }
}

fn push_to_gateway(endpoint: &str, payload: String) {
    let response = Client::new()
        .post(endpoint)
        .header(CONTENT_TYPE, "text/plain; version=0.0.4")
        .timeout(Duration::from_secs(5))
        .body(payload)
        .send();

    match response {
        Ok(resp) if resp.status().is_success() => {
            tracing::debug!(status = %resp.status(), "Metrics pushed");
        },
        Ok(resp) => tracing::warn!(status = %resp.status(), "Metrics push failed"),
        Err(err) => tracing::warn!("Failed to push metrics: {err}"),
    }
}

fn install_listener(builder: PrometheusBuilder) -> Result<PrometheusHandle> {
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        return install_with_runtime(builder, &handle);
    }
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::OperationFailed {
            operation: "metrics_runtime_init".to_string(),
            cause: e.to_string(),
        })?;
    let handle = runtime.handle().clone();
    let prometheus = install_with_runtime(builder, &handle)?;
    thread::Builder::new()
        .name("skillswap-metrics-http".to_string())
        .spawn(move || runtime.block_on(std::future::pending::<()>()))
        .map_err(|e| Error::OperationFailed {
            operation: "metrics_runtime_thread".to_string(),
            cause: e.to_string(),
        })?;
    Ok(prometheus)
}

fn install_with_runtime(
    builder: PrometheusBuilder,
    runtime_handle: &tokio::runtime::Handle,
) -> Result<PrometheusHandle> {
    let (recorder, exporter) = {
        let _guard = runtime_handle.enter();
        builder.build().map_err(|e| Error::OperationFailed {
            operation: "metrics_exporter_build".to_string(),
            cause: e.to_string(),
        })?
    };
    let handle = recorder.handle();
    set_global_recorder(recorder)?;
    runtime_handle.spawn(exporter);
    Ok(handle)
}

fn set_global_recorder(recorder: PrometheusRecorder) -> Result<()> {
    metrics::set_global_recorder(recorder).map_err(|e| Error::OperationFailed {
        operation: "metrics_recorder_install".to_string(),
        cause: e.to_string(),
    })
}
