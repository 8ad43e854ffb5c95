//! Scheduler error types.

use shared::models::ResourceName;
use thiserror::Error;

use crate::framework::cycle_state::StateKey;

/// Errors from reading or populating the cycle state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateError {
    #[error("cycle state has no entry for {0}")]
    NotFound(StateKey),

    #[error("cycle state entry {0} holds a value of another type")]
    KeyType(StateKey),
}

/// Failures of a single `score` call. Translated into a `Status` before they
/// reach the runner.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error("node {0:?} does not exist in snapshot")]
    NodeNotFound(String),

    #[error("requests of pod {pod:?} overflow on {resource}")]
    PodRequests { pod: String, resource: ResourceName },

    #[error(transparent)]
    State(#[from] StateError),
}

/// Errors raised while building the framework or running a scoring cycle.
#[derive(Debug, Error)]
pub enum FrameworkError {
    #[error("plugin {0:?} is not registered")]
    UnknownPlugin(String),

    #[error("plugin {0:?} is already registered")]
    DuplicatePlugin(String),

    #[error("invalid args for plugin {plugin:?}: {reason}")]
    InvalidArgs { plugin: String, reason: String },

    #[error("invalid scheduler config: {0}")]
    InvalidConfig(String),

    #[error("plugin {plugin:?} failed to normalize scores: {message}")]
    Normalize { plugin: String, message: String },

    #[error("plugin {plugin:?} returned score {score} for node {node:?}, outside [{min}, {max}]")]
    ScoreOutOfRange {
        plugin: String,
        node: String,
        score: i64,
        min: i64,
        max: i64,
    },

    #[error("weighted total of node {0:?} overflows")]
    TotalOverflow(String),

    #[error("score task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type FrameworkResult<T> = Result<T, FrameworkError>;
