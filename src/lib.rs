// Library interface for imgkey-sitemap
// This allows integration tests to access the modules

pub mod catalog;
pub mod error;
pub mod metrics;
pub mod network;
pub mod options;
pub mod pipeline;
pub mod report;
pub mod sitemap;
pub mod storage;
pub mod utils;
pub mod xml;
