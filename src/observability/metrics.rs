use prometheus::{Encoder, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub fulfillments_total: IntCounterVec,
    pub orders_in_queue: IntGauge,
    pub fulfillment_latency_seconds: HistogramVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let fulfillments_total = IntCounterVec::new(
            Opts::new("fulfillments_total", "Total fulfillment attempts by outcome"),
            &["outcome"],
        )
        .expect("valid fulfillments_total metric");

        let orders_in_queue = IntGauge::new("orders_in_queue", "Current number of orders in queue")
            .expect("valid orders_in_queue metric");

        let fulfillment_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "fulfillment_latency_seconds",
                "Latency of fulfillment processing in seconds",
            ),
            &["outcome"],
        )
        .expect("valid fulfillment_latency_seconds metric");

        registry
            .register(Box::new(fulfillments_total.clone()))
            .expect("register fulfillments_total");
        registry
            .register(Box::new(orders_in_queue.clone()))
            .expect("register orders_in_queue");
        registry
            .register(Box::new(fulfillment_latency_seconds.clone()))
            .expect("register fulfillment_latency_seconds");

        Self {
            registry,
            fulfillments_total,
            orders_in_queue,
            fulfillment_latency_seconds,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
