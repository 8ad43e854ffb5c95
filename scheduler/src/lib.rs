//! Scoring side of the cr8s scheduler.
//!
//! - `framework`: score plugin contract, cycle state, snapshot, registry and
//!   the runner that fans scoring out over candidate nodes
//! - `plugins`: in-tree score plugins
//! - `config`: which plugins run, their weights and args

pub mod config;
pub mod error;
pub mod framework;
pub mod plugins;

pub use config::{PluginConfig, SchedulerConfig};
pub use error::{FrameworkError, ScoreError, StateError};
pub use framework::{
    CycleState, Framework, Handle, NodeScore, NodeScoreList, Registry, ScoreExtensions,
    ScorePlugin, ScoreRange, ScoreResult, Snapshot, SnapshotLister, Status,
};
