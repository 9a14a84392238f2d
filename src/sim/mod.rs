pub mod config;
pub mod log;
pub mod mem_model;
pub mod report;
pub mod top;
