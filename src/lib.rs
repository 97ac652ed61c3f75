//! Client-side synchronization layer for a job-application tracker: a REST
//! client, a reducer-driven cache of server records, local preferences and a
//! polling loop that keeps the cache fresh.

pub mod api;
pub mod config;
pub mod db;
pub mod model;
pub mod normalize;
pub mod operations;
pub mod poller;
pub mod preferences;
pub mod store;
pub mod validation;
pub mod view;
