mod client;
mod config;

pub use client::QdrantBmiStore;
pub use config::QdrantConfig;
