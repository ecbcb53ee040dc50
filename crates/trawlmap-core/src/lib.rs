pub mod coords;
pub mod error;
pub mod frames;
pub mod outputs;
pub mod pipeline;
pub mod query;
pub mod reshape;
pub mod types;
