//! Prometheus metrics for mockctl.
//!
//! All metrics are aggregated in the [`Metrics`] struct.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::time::Duration;

/// Aggregated metrics for mockctl.
///
/// Metric descriptions are registered with the global registry on creation.
#[derive(Debug, Clone)]
pub struct Metrics {
    _private: (),
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self::register_descriptions();
        Self { _private: () }
    }

    fn register_descriptions() {
        // Action metrics
        describe_counter!(
            "mockctl_action_success_total",
            "Total successful action executions by action name"
        );
        describe_counter!(
            "mockctl_action_failure_total",
            "Total failed action executions by action name"
        );
        describe_histogram!(
            "mockctl_action_duration_seconds",
            "Duration of each action execution in seconds"
        );
        describe_counter!(
            "mockctl_gas_used_total",
            "Total gas used by executed actions"
        );

        // Deployment metrics
        describe_counter!(
            "mockctl_deployments_total",
            "Total number of mock deployments by contract"
        );

        // Watch metrics
        describe_counter!(
            "mockctl_events_total",
            "Total number of mock events observed by event name"
        );
        describe_counter!(
            "mockctl_unknown_logs_total",
            "Total number of logs that did not decode as a mock event"
        );
        describe_gauge!(
            "mockctl_last_scanned_block",
            "Last block scanned for mock events"
        );

        // Inbox metrics
        describe_gauge!(
            "mockctl_delayed_messages",
            "Number of delayed messages verified in the last scan"
        );
    }

    /// Record an executed action.
    pub fn record_action(&self, action: &str, success: bool, duration: Duration) {
        histogram!("mockctl_action_duration_seconds", "action" => action.to_string())
            .record(duration.as_secs_f64());

        if success {
            counter!("mockctl_action_success_total", "action" => action.to_string()).increment(1);
        } else {
            counter!("mockctl_action_failure_total", "action" => action.to_string()).increment(1);
        }
    }

    pub fn record_gas_used(&self, gas: u64) {
        counter!("mockctl_gas_used_total").increment(gas);
    }

    pub fn record_deployment(&self, contract: &str) {
        counter!("mockctl_deployments_total", "contract" => contract.to_string()).increment(1);
    }

    pub fn record_event(&self, event: &str) {
        counter!("mockctl_events_total", "event" => event.to_string()).increment(1);
    }

    pub fn record_unknown_log(&self) {
        counter!("mockctl_unknown_logs_total").increment(1);
    }

    pub fn set_last_scanned_block(&self, block: u64) {
        gauge!("mockctl_last_scanned_block").set(block as f64);
    }

    pub fn set_delayed_messages(&self, count: usize) {
        gauge!("mockctl_delayed_messages").set(count as f64);
    }
}

/// Install the Prometheus metrics exporter and start the HTTP server.
///
/// Returns an error if the server fails to bind to the specified port.
pub fn install_prometheus_exporter(port: u16) -> eyre::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::net::SocketAddr;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| eyre::eyre!("Failed to install Prometheus exporter: {}", e))?;

    Ok(())
}
