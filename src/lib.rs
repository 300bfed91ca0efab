pub mod client;
pub mod config;
pub mod credentials;
pub mod scheduler;
pub mod tick;
