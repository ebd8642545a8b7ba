pub mod checksum;
pub mod config;
pub mod download;
pub mod fetch;
pub mod logging;
pub mod manifest;
pub mod paths;
pub mod pool;
pub mod validate;
pub mod verify;
