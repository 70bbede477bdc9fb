pub mod config;
pub mod excel;
pub mod report;
pub mod server;
pub mod utils;
