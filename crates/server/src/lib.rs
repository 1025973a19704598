#[cfg(feature = "server")]
pub mod config;

#[cfg(feature = "server")]
pub mod db;

pub mod api;

#[cfg(feature = "server")]
pub mod rest;

#[cfg(feature = "server")]
pub mod openapi;

#[cfg(feature = "server")]
pub mod error_convert;

#[cfg(feature = "server")]
pub mod telemetry;

#[cfg(feature = "server")]
pub mod health;

// Blob access
#[cfg(feature = "server")]
pub mod signing;

#[cfg(feature = "server")]
pub mod storage;

#[cfg(feature = "server")]
pub mod repo;
