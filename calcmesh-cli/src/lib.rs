//! calcmesh command line client
//!
//! * [`api_client`]: talks to a running gateway
//! * [`render`]: JSON and table output for responses

pub mod api_client;
pub mod render;
