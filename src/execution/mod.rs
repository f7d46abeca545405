//! Execution layer: the engine, the constant-memory region, and metrics.

pub mod constant_region;
pub mod engine;
pub mod metrics;

pub use constant_region::{ConstantBinding, ConstantRegion, CONSTANT_REGION_CAPACITY};
pub use engine::ConvolutionEngine;
pub use metrics::{format_micros, CsvSink, JsonLinesSink, MetricsSink, RunRecord};
