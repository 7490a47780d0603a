pub mod execution_stats;
pub mod normalize;
pub mod raw;
