pub mod engine;
pub mod gbm;
pub mod lognormal;
pub mod moments;
pub mod payoff;
pub mod reservoir;
pub mod rng;
pub mod summary;
