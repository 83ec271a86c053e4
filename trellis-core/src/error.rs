//! Error types and result aliases.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed manifest at {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    #[error("Config parse error in {context}: {error}")]
    Config {
        error: toml::de::Error,
        context: String,
    },

    #[error("Duplicate workspace name '{name}': declared at {first} and {second}")]
    DuplicateWorkspace {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Workspace '{name}' at {location} lies outside the packages root {packages_root}")]
    LocationOutsideRoot {
        name: String,
        location: PathBuf,
        packages_root: PathBuf,
    },

    #[error("Workspace '{name}' declares a dependency on itself")]
    SelfDependency { name: String },

    #[error(
        "Mismatched workspace dependency: {from} requires {to}@{declared} but {to} is at {actual}"
    )]
    MismatchedDependency {
        from: String,
        to: String,
        declared: String,
        actual: String,
    },

    #[error("Circular dependency detected involving: {}", .members.join(", "))]
    CircularDependency { members: Vec<String> },

    #[error("Unknown workspace '{name}'. Available workspaces: {available}")]
    UnknownWorkspace { name: String, available: String },

    #[error("Build job failed for {package}: {message}")]
    Job { package: String, message: String },

    #[error("Git error: {0}")]
    Git(String),
}

pub type Result<T> = std::result::Result<T, Error>;
