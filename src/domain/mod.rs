pub mod config;
pub mod error;
pub mod instance;
pub mod load_balancer;
pub mod membership;
pub mod metadata;
