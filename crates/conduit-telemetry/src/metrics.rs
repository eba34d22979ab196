//! Metric sink abstraction and the per-handler recorder

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use opentelemetry::KeyValue;
use opentelemetry::metrics::{Counter, Histogram, Meter};

/// A `key:value` tag attached to a metric sample
pub type Tag<'a> = (&'static str, &'a str);

/// Destination for counters and timings
///
/// Implementations swallow their own failures; recording never reaches
/// the caller as an error.
pub trait MetricsSink: Send + Sync {
    /// Increment the counter `name` by one
    fn incr(&self, name: &str, tags: &[Tag<'_>]);

    /// Record a duration sample for `name`
    fn timing(&self, name: &str, value: Duration, tags: &[Tag<'_>]);
}

/// Sink that drops every sample
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl MetricsSink for NoopSink {
    fn incr(&self, _name: &str, _tags: &[Tag<'_>]) {}

    fn timing(&self, _name: &str, _value: Duration, _tags: &[Tag<'_>]) {}
}

/// Sink backed by an OpenTelemetry meter
///
/// Instruments are created on first use and cached by metric name.
/// Timings are recorded in milliseconds.
pub struct OtelSink {
    meter: Meter,
    counters: DashMap<String, Counter<u64>>,
    histograms: DashMap<String, Histogram<f64>>,
}

impl OtelSink {
    /// Sink over the global meter provider
    pub fn global() -> Self {
        Self::new(opentelemetry::global::meter("conduit"))
    }

    pub fn new(meter: Meter) -> Self {
        Self {
            meter,
            counters: DashMap::new(),
            histograms: DashMap::new(),
        }
    }

    fn counter(&self, name: &str) -> Counter<u64> {
        if let Some(counter) = self.counters.get(name) {
            return counter.clone();
        }

        self.counters
            .entry(name.to_string())
            .or_insert_with(|| self.meter.u64_counter(name.to_string()).build())
            .clone()
    }

    fn histogram(&self, name: &str) -> Histogram<f64> {
        if let Some(histogram) = self.histograms.get(name) {
            return histogram.clone();
        }

        self.histograms
            .entry(name.to_string())
            .or_insert_with(|| self.meter.f64_histogram(name.to_string()).with_unit("ms").build())
            .clone()
    }
}

impl MetricsSink for OtelSink {
    fn incr(&self, name: &str, tags: &[Tag<'_>]) {
        self.counter(name).add(1, &attributes(tags));
    }

    fn timing(&self, name: &str, value: Duration, tags: &[Tag<'_>]) {
        self.histogram(name).record(value.as_secs_f64() * 1000.0, &attributes(tags));
    }
}

fn attributes(tags: &[Tag<'_>]) -> Vec<KeyValue> {
    tags.iter()
        .map(|(key, value)| KeyValue::new(*key, (*value).to_string()))
        .collect()
}

/// Emits the fixed family of handler metrics under a namespace
///
/// For a handler `h` in namespace `ns`:
/// - `ns.h.requests` once per invocation
/// - `ns.h.success` or `ns.h.<operation>_error` (tagged `error_type`) once per invocation
/// - `ns.h.latency` once per invocation, spanning the whole handler
#[derive(Clone)]
pub struct Recorder {
    namespace: Arc<str>,
    sink: Arc<dyn MetricsSink>,
}

impl Recorder {
    pub fn new(namespace: impl Into<Arc<str>>, sink: Arc<dyn MetricsSink>) -> Self {
        Self {
            namespace: namespace.into(),
            sink,
        }
    }

    /// Count a request and start its latency timer
    pub fn start(&self, handler: &'static str) -> RequestTimer {
        self.sink.incr(&self.metric(handler, "requests"), &[]);

        RequestTimer {
            recorder: self.clone(),
            handler,
            started: Instant::now(),
        }
    }

    fn metric(&self, handler: &str, suffix: &str) -> String {
        format!("{}.{handler}.{suffix}", self.namespace)
    }
}

/// In-flight handler measurement
///
/// Latency is recorded when the timer is dropped, so every exit path of a
/// handler is timed even if no outcome was reported.
pub struct RequestTimer {
    recorder: Recorder,
    handler: &'static str,
    started: Instant,
}

impl RequestTimer {
    pub fn success(self) {
        let name = self.recorder.metric(self.handler, "success");
        self.recorder.sink.incr(&name, &[]);
    }

    pub fn failure(self, operation: &str, category: &str) {
        let name = self.recorder.metric(self.handler, &format!("{operation}_error"));
        self.recorder.sink.incr(&name, &[("error_type", category)]);
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        let name = self.recorder.metric(self.handler, "latency");
        self.recorder.sink.timing(&name, self.started.elapsed(), &[]);
    }
}
