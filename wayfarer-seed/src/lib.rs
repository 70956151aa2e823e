pub mod config;
pub mod destinations;
pub mod fetch;
pub mod generate;
pub mod manifest;
pub mod schema;
pub mod script;
pub mod sql;
pub mod stats;
pub mod verify;
