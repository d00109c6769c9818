//! Prometheus HTTP metrics: the request counter, the latency histogram and
//! the registry that owns them.

pub mod middleware;

pub use middleware::{MetricsBody, RequestMetrics};

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

const LABELS: [&str; 3] = ["method", "route", "status"];

/// Per-request instruments plus the registry they are exposed from.
///
/// Built once at startup and shared by the instrumentation middleware and
/// the `/metrics` handler. Tests build a fresh one each.
pub struct HttpMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration: HistogramVec,
}

impl HttpMetrics {
    /// Fresh registry with the HTTP instruments and, on Linux, process metrics.
    pub fn new() -> prometheus::Result<Self> {
        Self::with_registry(Registry::new())
    }

    pub fn with_registry(registry: Registry) -> prometheus::Result<Self> {
        let requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of requests"),
            &LABELS,
        )?;
        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "Duration of HTTP requests in seconds",
            ),
            &LABELS,
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(HttpMetrics {
            registry,
            requests_total,
            request_duration,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record one finished request.
    pub fn observe(&self, method: &str, route: &str, status: u16, seconds: f64) {
        let status = status.to_string();
        let labels = [method, route, status.as_str()];
        self.requests_total.with_label_values(&labels).inc();
        self.request_duration
            .with_label_values(&labels)
            .observe(seconds);
    }

    /// Current counter value for one label set.
    pub fn request_count(&self, method: &str, route: &str, status: u16) -> u64 {
        let status = status.to_string();
        self.requests_total
            .get_metric_with_label_values(&[method, route, status.as_str()])
            .map(|c| c.get())
            .unwrap_or(0)
    }

    /// `(sample_count, sample_sum)` of the latency histogram for one label set.
    pub fn duration_stats(&self, method: &str, route: &str, status: u16) -> (u64, f64) {
        let status = status.to_string();
        self.request_duration
            .get_metric_with_label_values(&[method, route, status.as_str()])
            .map(|h| (h.get_sample_count(), h.get_sample_sum()))
            .unwrap_or((0, 0.0))
    }
}

/// Media type of the text exposition format.
pub fn content_type() -> String {
    TextEncoder::new().format_type().to_string()
}

/// Serialize every family gathered from `registry` to the text format.
/// An empty registry yields an empty string.
pub fn encode(registry: &Registry) -> prometheus::Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&registry.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_updates_both_instruments() {
        let m = HttpMetrics::new().unwrap();
        m.observe("GET", "/hello", 200, 0.25);
        m.observe("GET", "/hello", 200, 0.5);
        m.observe("GET", "/hello", 404, 0.1);

        assert_eq!(m.request_count("GET", "/hello", 200), 2);
        assert_eq!(m.request_count("GET", "/hello", 404), 1);
        let (count, sum) = m.duration_stats("GET", "/hello", 200);
        assert_eq!(count, 2);
        assert!((sum - 0.75).abs() < 1e-9);
    }

    #[test]
    fn encode_empty_registry() {
        let body = encode(&Registry::new()).unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn exposition_carries_names_and_labels() {
        let m = HttpMetrics::new().unwrap();
        m.observe("POST", "/trip", 201, 0.01);
        let body = encode(m.registry()).unwrap();
        assert!(body.contains("# TYPE http_requests_total counter"));
        assert!(body.contains("# TYPE http_request_duration_seconds histogram"));
        assert!(body.contains(r#"http_requests_total{method="POST",route="/trip",status="201"} 1"#));
    }

    #[test]
    fn content_type_is_text_format() {
        assert!(content_type().starts_with("text/plain"));
    }
}
