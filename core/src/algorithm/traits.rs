//! Core algorithm trait definitions for the flow network toolkit
//!
//! This module establishes the identifier types shared by the network and
//! its solvers, together with the small trait every solver implements so a
//! host program can describe and tune it by name.
//!
//! # Key Design Principles
//! - Vertices are numbered from 1, edges by their position in the sequence
//! - Parameters cross the host boundary as strings and are validated here
//! - Solvers own no network state between runs

use std::fmt::Debug;
use serde::{Serialize, Deserialize};

/// Vertex identifier, numbered `1..=vertex_count`
pub type VertexId = usize;

/// Edge identifier: the edge's current position in the edge sequence
pub type EdgeId = usize;

/// Capacity and flow magnitude
pub type Capacity = i64;

/// Algorithm parameter with string-typed value and type information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmParameter {
    pub name: String,
    pub value: String,
    pub value_type: ParameterType,
    pub description: String,
}

/// Parameter type enumeration for type-safe parameter handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterType {
    Boolean,
}

/// Errors raised while configuring an algorithm
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlgorithmError {
    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),
}

/// Main algorithm trait
///
/// # Invariants
/// - State isolation between runs
/// - Deterministic behavior for given inputs
pub trait Algorithm: Debug {
    /// Returns the algorithm's descriptive name
    fn name(&self) -> &'static str;

    /// Returns the algorithm's category (e.g., max_flow)
    fn category(&self) -> &'static str;

    /// Returns a short description with complexity information
    fn description(&self) -> String;

    /// Returns supported parameters with their current values
    fn parameters(&self) -> Vec<AlgorithmParameter>;

    /// Sets algorithm parameter with type validation
    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError>;

    /// Gets algorithm parameter value
    fn get_parameter(&self, name: &str) -> Option<String>;
}

/// Parses a boolean parameter value, accepting the usual spellings
pub(crate) fn parse_bool_parameter(name: &str, value: &str) -> Result<bool, AlgorithmError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(AlgorithmError::InvalidParameter {
            name: name.to_string(),
            reason: format!("expected a boolean, found '{}'", other),
        }),
    }
}
