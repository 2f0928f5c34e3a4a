//! Text-file backed HR management
//!
//! User accounts, projects, project assignments and a weighted
//! performance-scoring model, persisted as pipe-delimited text files.

pub mod domain;
pub use domain::{
    Assignment, Department, PerformanceLevel, Project, ProjectStats, Role, User, Weights,
};

/// Flat-file storage for users, projects and scoring configuration.
pub mod storage;
pub use storage::{ProjectStore, Record, SystemConfig, UserStore, WeightField};
