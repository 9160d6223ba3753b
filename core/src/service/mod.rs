pub mod aggregator;
pub mod decision;
pub mod resolver;
