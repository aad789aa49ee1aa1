//! `reqwest` implementation of the policy backend gateways.

mod client;

pub use client::HttpGateway;
