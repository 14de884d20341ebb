pub mod accumulator;
pub mod anomaly;
pub mod baseline;
pub mod pipeline;

pub use accumulator::{MeanAccumulator, MonthlyAccumulator};
pub use anomaly::{
    compute_stations_anomaly, global_anomalies, monthly_anomalies, present_months, AnomalyEngine,
    LatitudeBand, LatitudeFilter,
};
pub use baseline::BaselineEngine;
pub use pipeline::{Analysis, AnomalyPipeline, PipelineReport};
