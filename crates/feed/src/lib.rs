//! Relays positions from a GPS device feed into the tracker.
//!
//! The feed is a TCP stream of newline separated, comma delimited packets
//! like `*HQ,865205030330012,V1,120000,54.3233,N,10.1228,E,040824,7#`.

pub mod config;
pub mod packet;
pub mod relay;

pub use config::FeedConfig;
