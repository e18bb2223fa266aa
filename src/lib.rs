pub mod config;
pub mod ephemeris;
pub mod geo;
pub mod scene;
pub mod telemetry;
pub mod web;
