pub mod metrics;
pub mod normalize;
pub mod predictor;
pub mod yahoo;
