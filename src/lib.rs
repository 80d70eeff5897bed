pub mod batch;
pub mod bits;
pub mod board;
pub mod config;
pub mod heuristic;
