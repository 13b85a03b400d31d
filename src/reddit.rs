//! Reddit API clients and services for communicating with Reddit over HTTPS.

pub mod auth;
pub mod client;
pub mod service;
pub mod thing;

pub use client::RedditClient;
pub use service::{RedditService, Resource, Service};
