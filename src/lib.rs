pub mod bin_constants;
pub mod concurrency;
pub mod config;
pub mod data;
pub mod key;
mod lib_constants;
pub mod logging;
pub mod oracle;
pub mod pipeline;
pub mod routes;
pub mod seed;
pub mod storage;
pub mod usage;
pub mod util;
