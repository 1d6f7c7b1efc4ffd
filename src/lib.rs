//! Firmware-side pieces of the world clock that do not touch hardware.

pub mod api;
pub mod config;
pub mod threads;
pub mod ticker;
pub mod timings;
