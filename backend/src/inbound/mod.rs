//! Inbound adapters translating external requests into domain port calls
//! while keeping framework details at the edge.
//!
//! The site is served over HTTP by [`http`].

pub mod http;
