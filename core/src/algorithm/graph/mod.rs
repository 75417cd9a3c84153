//! Graph algorithms over flow networks
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod max_flow;

pub use self::max_flow::{max_flow, FlowMetrics, MaxFlowResult, MaxFlowSolver, MinCut, SolverConfig};
