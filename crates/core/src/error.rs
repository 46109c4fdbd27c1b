//! Error types for the skill engine.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to hand a payload to the message broker.
#[derive(Debug, Error)]
pub enum BusError {
    #[error("Failed to publish to topic '{topic}': {message}")]
    Publish { topic: String, message: String },
    #[error("Failed to encode payload for topic '{topic}': {source}")]
    Encode {
        topic: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Misuse of a skill's session state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Intent message for '{intent}' carried no session ID")]
    MissingSessionId { intent: String },
    #[error("No active session for skill '{skill}'")]
    NoActiveSession { skill: String },
    #[error("Skill '{skill}' has no site ID to speak to")]
    NoActiveSite { skill: String },
    #[error("Skill '{skill}' has no answer intent and cannot continue a session")]
    NoAnswerIntent { skill: String },
}

/// Errors raised by skill constructors and handlers.
#[derive(Debug, Error)]
pub enum SkillError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Setting '{0}' is not set in the configuration file")]
    MissingSetting(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Violations of the one-intent-one-skill rule.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Skill '{skill}' declares an empty trigger intent")]
    EmptyTriggerIntent { skill: String },
    #[error("Intent '{intent}' is already handled by '{existing}'; refusing to register '{rejected}'")]
    IntentCollision {
        intent: String,
        existing: String,
        rejected: String,
    },
}

/// A single skill manifest that could not be turned into a registered skill.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("No skill named '{identifier}' is compiled into this service")]
    UnknownSkill { identifier: String },
    #[error("Skill '{identifier}' failed to initialise: {source}")]
    Construct {
        identifier: String,
        #[source]
        source: SkillError,
    },
    #[error("Skill '{identifier}' panicked during construction: {message}")]
    Panicked { identifier: String, message: String },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Why a handler invocation did not complete.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Skill(#[from] SkillError),
    #[error("Skill handler panicked: {0}")]
    Panicked(String),
}

/// Failure to read the shared settings document.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration file {0} not found")]
    NotFound(PathBuf),
    #[error("Could not read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not decode configuration file {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Configuration file {0} is not a JSON object")]
    NotAnObject(PathBuf),
}
