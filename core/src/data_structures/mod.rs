//! Network data structures
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod flow_network;

pub use self::flow_network::{Edge, FlowNetwork, NetworkError, NetworkLimits};
