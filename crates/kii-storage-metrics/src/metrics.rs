use kii_storage_core::{Operation, PrivateInfoStorage, StoreError};
use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

pub const OUTCOME_OK: &str = "ok";

/// Call and whitelist metrics for one store.
pub struct StoreMetrics {
    registry: Registry,
    pub calls_total: IntCounterVec,
    pub whitelist_size: IntGauge,
    pub whitelist_capacity: IntGauge,
}

impl StoreMetrics {
    pub fn new(registry: Registry) -> prometheus::Result<Self> {
        let calls_total = IntCounterVec::new(
            Opts::new(
                "kii_storage_calls_total",
                "Store calls by operation and outcome",
            ),
            &["operation", "outcome"],
        )?;
        let whitelist_size = IntGauge::new(
            "kii_storage_whitelist_size",
            "Addresses currently whitelisted, owner included",
        )?;
        let whitelist_capacity = IntGauge::new(
            "kii_storage_whitelist_capacity",
            "Maximum number of whitelisted addresses",
        )?;

        for operation in Operation::ALL {
            calls_total.with_label_values(&[operation.as_str(), OUTCOME_OK]);
        }

        registry.register(Box::new(calls_total.clone()))?;
        registry.register(Box::new(whitelist_size.clone()))?;
        registry.register(Box::new(whitelist_capacity.clone()))?;

        Ok(Self {
            registry,
            calls_total,
            whitelist_size,
            whitelist_capacity,
        })
    }

    pub fn observe<T>(&self, operation: Operation, result: &Result<T, StoreError>) {
        let outcome = match result {
            Ok(_) => OUTCOME_OK,
            Err(e) => e.code(),
        };
        self.calls_total
            .with_label_values(&[operation.as_str(), outcome])
            .inc();
    }

    pub fn observe_whitelist(&self, store: &PrivateInfoStorage) {
        self.whitelist_size.set(gauge_value(store.get_whitelist().len()));
        self.whitelist_capacity.set(gauge_value(store.capacity()));
    }

    pub fn calls(&self, operation: Operation, outcome: &str) -> u64 {
        self.calls_total
            .with_label_values(&[operation.as_str(), outcome])
            .get()
    }

    /// Text exposition of every registered metric.
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

// Capacities come from deploy configs and may exceed the gauge range.
fn gauge_value(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
