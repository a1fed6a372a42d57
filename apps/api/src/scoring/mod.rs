pub mod aggregation;
pub mod cs_engine;
