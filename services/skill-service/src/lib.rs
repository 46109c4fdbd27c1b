//! Calico Skill Service Library Crate
//!
//! Configuration, logging and the MQTT bus client for the skill service. The
//! `skill_service` binary is a thin wrapper around this library.

pub mod bus;
pub mod check;
pub mod config;
pub mod logging;
