//! Snap effect controller: capture, background preparation, animation and tap handling.

pub(crate) mod capture;
pub(crate) mod config;
pub(crate) mod controller;
