pub mod assemble;
pub mod check;
pub mod config;
pub mod error;
pub mod fetch;
pub mod index;
pub mod logging;
pub mod normalize;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod scheduler;
pub mod types;
