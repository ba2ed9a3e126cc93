pub mod instrumented;
pub mod metrics;

pub use instrumented::InstrumentedStore;
pub use metrics::StoreMetrics;
