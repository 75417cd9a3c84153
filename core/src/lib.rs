//! FLOWNET core: editable capacitated flow networks and maximum flow
//!
//! The crate is split the same way the problem is: [`data_structures`] owns
//! the mutable network and keeps flow bookkeeping consistent under edits,
//! while [`algorithm`] holds the solvers that consume it.
//!
//! ```
//! use flownet_core::{FlowNetwork, MaxFlowSolver};
//!
//! let mut network = FlowNetwork::new(4, 1, 4)?;
//! network.add_edge(1, 2, 3)?;
//! network.add_edge(1, 3, 2)?;
//! network.add_edge(2, 4, 2)?;
//! network.add_edge(3, 4, 3)?;
//!
//! let result = MaxFlowSolver::default().solve(&mut network);
//! assert_eq!(result.max_flow, 4);
//! assert_eq!(result.min_cut.capacity, 4);
//! # Ok::<(), flownet_core::NetworkError>(())
//! ```
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod data_structures;

pub use crate::algorithm::{
    max_flow, Algorithm, AlgorithmError, AlgorithmParameter, Capacity, EdgeId, FlowMetrics,
    MaxFlowResult, MaxFlowSolver, MinCut, ParameterType, SolverConfig, VertexId,
};
pub use crate::data_structures::{Edge, FlowNetwork, NetworkError, NetworkLimits};

/// Crate version, as published in Cargo metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
