mod client;

pub use client::ConsulClient;
