//! Editable capacitated flow network
//!
//! This module implements the mutable edge-list representation consumed by
//! the max-flow solvers. Edges live in an ordered sequence whose positions are
//! their identifiers; removing an edge shifts every later identifier down by
//! one. The reverse direction of an edge is always located by explicit lookup
//! on the reversed endpoint pair, so arbitrary edits never corrupt residual
//! bookkeeping through positional assumptions.
//!
//! # Flow bookkeeping under edits
//! Structural edits that destroy flow (edge removal, capacity reduction) hand
//! the lost amount back through the reverse edge when one exists, which keeps
//! the net flow between the pair unchanged. When no reverse edge can absorb
//! it, conservation is left violated until the next solver run reconciles it.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt;
use log::{debug, info, warn};
use serde::{Serialize, Deserialize};

use crate::algorithm::traits::{Capacity, EdgeId, VertexId};

/// Directed edge with capacity and current flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Tail vertex
    from: VertexId,
    /// Head vertex
    to: VertexId,
    /// Edge capacity, never negative
    capacity: Capacity,
    /// Current flow, kept within `0..=capacity`
    flow: Capacity,
}

impl Edge {
    fn new(from: VertexId, to: VertexId, capacity: Capacity) -> Self {
        Self { from, to, capacity, flow: 0 }
    }

    #[inline]
    pub fn from(&self) -> VertexId {
        self.from
    }

    #[inline]
    pub fn to(&self) -> VertexId {
        self.to
    }

    #[inline]
    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    #[inline]
    pub fn flow(&self) -> Capacity {
        self.flow
    }

    /// Get residual capacity for forward direction
    #[inline]
    pub fn residual_capacity(&self) -> Capacity {
        self.capacity - self.flow
    }

    /// Get residual capacity for reverse direction (flow that can be cancelled)
    #[inline]
    pub fn reverse_residual_capacity(&self) -> Capacity {
        self.flow
    }

    #[inline]
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    fn touches(&self, vertex: VertexId) -> bool {
        self.from == vertex || self.to == vertex
    }
}

/// Upper bounds on network size
///
/// `None` means unbounded. Fixed ceilings such as 100 vertices and 500 edges
/// are expressed with [`NetworkLimits::new`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkLimits {
    /// Maximum vertex count
    pub max_vertices: Option<usize>,
    /// Maximum number of edges held at once
    pub max_edges: Option<usize>,
}

impl NetworkLimits {
    pub fn new(max_vertices: usize, max_edges: usize) -> Self {
        Self {
            max_vertices: Some(max_vertices),
            max_edges: Some(max_edges),
        }
    }

    fn admits_vertices(&self, count: usize) -> bool {
        self.max_vertices.map_or(true, |max| count <= max)
    }

    fn admits_edges(&self, count: usize) -> bool {
        self.max_edges.map_or(true, |max| count <= max)
    }
}

/// Flow network errors
///
/// Every error is recoverable: the operation that raised it left the network
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),
    #[error("Invalid edge index {index} (network has {edge_count} edges)")]
    InvalidIndex { index: EdgeId, edge_count: usize },
    #[error("Invalid capacity {0}")]
    InvalidCapacity(Capacity),
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),
}

/// Flow network with designated source and sink
///
/// Deserialized networks come back without size limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNetwork {
    /// Number of vertices, numbered `1..=vertex_count`
    vertex_count: usize,
    /// Source vertex
    source: VertexId,
    /// Sink vertex
    sink: VertexId,
    /// Edge sequence; position is the edge identifier
    edges: Vec<Edge>,
    /// Size ceilings enforced by edits
    #[serde(skip)]
    limits: NetworkLimits,
}

impl FlowNetwork {
    /// Create an empty network without size limits
    pub fn new(vertex_count: usize, source: VertexId, sink: VertexId) -> Result<Self, NetworkError> {
        Self::with_limits(vertex_count, source, sink, NetworkLimits::default())
    }

    /// Create an empty network enforcing the given limits
    pub fn with_limits(vertex_count: usize,
                       source: VertexId,
                       sink: VertexId,
                       limits: NetworkLimits) -> Result<Self, NetworkError> {
        validate_terminals(vertex_count, source, sink, &limits)?;
        info!("Initialized network: {} vertices, source {}, sink {}", vertex_count, source, sink);
        Ok(Self {
            vertex_count,
            source,
            sink,
            edges: Vec::new(),
            limits,
        })
    }

    /// Re-initialize in place, dropping every edge and all flow
    ///
    /// On error the network keeps its previous state.
    pub fn initialize(&mut self, vertex_count: usize, source: VertexId, sink: VertexId) -> Result<(), NetworkError> {
        validate_terminals(vertex_count, source, sink, &self.limits)?;
        self.vertex_count = vertex_count;
        self.source = source;
        self.sink = sink;
        self.edges.clear();
        info!("Re-initialized network: {} vertices, source {}, sink {}", vertex_count, source, sink);
        Ok(())
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    #[inline]
    pub fn source(&self) -> VertexId {
        self.source
    }

    #[inline]
    pub fn sink(&self) -> VertexId {
        self.sink
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn limits(&self) -> NetworkLimits {
        self.limits
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn contains_vertex(&self, vertex: VertexId) -> bool {
        (1..=self.vertex_count).contains(&vertex)
    }

    /// Append an edge carrying no flow
    ///
    /// Duplicate endpoint pairs are accepted here; callers that want to reject
    /// them check [`FlowNetwork::find_edge`] first. Self-loops are accepted
    /// and never carry flow.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId, capacity: Capacity) -> Result<EdgeId, NetworkError> {
        if !self.contains_vertex(from) || !self.contains_vertex(to) {
            return Err(NetworkError::InvalidTopology(format!(
                "edge {} -> {} has an endpoint outside 1..={}", from, to, self.vertex_count)));
        }
        if capacity < 0 {
            return Err(NetworkError::InvalidCapacity(capacity));
        }
        if !self.limits.admits_edges(self.edges.len() + 1) {
            return Err(NetworkError::LimitExceeded(format!(
                "network already holds {} edges", self.edges.len())));
        }

        let id = self.edges.len();
        self.edges.push(Edge::new(from, to, capacity));
        debug!("Added edge {}: {} -> {} [{}]", id, from, to, capacity);
        Ok(id)
    }

    /// Remove an edge, shifting later identifiers down by one
    ///
    /// The flow it carried is subtracted from the reverse edge, if any.
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<Edge, NetworkError> {
        self.check_index(id)?;
        Ok(self.detach(id))
    }

    /// Append a fresh vertex and return its number
    pub fn add_vertex(&mut self) -> Result<VertexId, NetworkError> {
        if !self.limits.admits_vertices(self.vertex_count + 1) {
            return Err(NetworkError::LimitExceeded(format!(
                "network already has {} vertices", self.vertex_count)));
        }
        self.vertex_count += 1;
        debug!("Added vertex {}", self.vertex_count);
        Ok(self.vertex_count)
    }

    /// Remove every edge incident to `vertex`
    ///
    /// The vertex number stays allocated so that other vertices keep their
    /// numbers. Terminals cannot be removed; move the source or sink first.
    pub fn remove_vertex(&mut self, vertex: VertexId) -> Result<Vec<Edge>, NetworkError> {
        if !self.contains_vertex(vertex) {
            return Err(NetworkError::InvalidTopology(format!(
                "vertex {} is outside 1..={}", vertex, self.vertex_count)));
        }
        if vertex == self.source {
            return Err(NetworkError::InvalidTopology(format!(
                "vertex {} is the source; change the source before removing it", vertex)));
        }
        if vertex == self.sink {
            return Err(NetworkError::InvalidTopology(format!(
                "vertex {} is the sink; change the sink before removing it", vertex)));
        }

        let mut removed = Vec::new();
        let mut id = 0;
        while id < self.edges.len() {
            if self.edges[id].touches(vertex) {
                removed.push(self.detach(id));
            } else {
                id += 1;
            }
        }
        debug!("Removed vertex {} with {} incident edges", vertex, removed.len());
        Ok(removed)
    }

    /// Change an edge's capacity
    ///
    /// Flow above the new capacity is clamped off and the excess is subtracted
    /// from the reverse edge, keeping the net flow between the pair intact.
    pub fn change_capacity(&mut self, id: EdgeId, capacity: Capacity) -> Result<(), NetworkError> {
        self.check_index(id)?;
        if capacity < 0 {
            return Err(NetworkError::InvalidCapacity(capacity));
        }

        let edge = &mut self.edges[id];
        edge.capacity = capacity;
        let excess = edge.flow - capacity;
        let (from, to) = (edge.from, edge.to);
        if excess > 0 {
            edge.flow = capacity;
            self.release_reverse_flow(from, to, excess);
        }
        debug!("Edge {} capacity is now {}", id, capacity);
        Ok(())
    }

    pub fn change_source(&mut self, vertex: VertexId) -> Result<(), NetworkError> {
        self.check_terminal(vertex, "source", self.sink)?;
        self.source = vertex;
        debug!("Source is now {}", vertex);
        Ok(())
    }

    pub fn change_sink(&mut self, vertex: VertexId) -> Result<(), NetworkError> {
        self.check_terminal(vertex, "sink", self.source)?;
        self.sink = vertex;
        debug!("Sink is now {}", vertex);
        Ok(())
    }

    /// First edge in sequence order going `from -> to`
    pub fn find_edge(&self, from: VertexId, to: VertexId) -> Option<EdgeId> {
        self.edges.iter().position(|e| e.from == from && e.to == to)
    }

    /// Inflow minus outflow at `vertex`, clamped to the `Capacity` range
    pub fn excess(&self, vertex: VertexId) -> Capacity {
        let mut excess: i128 = 0;
        for edge in &self.edges {
            if edge.to == vertex {
                excess += i128::from(edge.flow);
            }
            if edge.from == vertex {
                excess -= i128::from(edge.flow);
            }
        }
        clamp_capacity(excess)
    }

    /// Net flow leaving the source
    pub fn flow_value(&self) -> Capacity {
        self.excess(self.source).saturating_neg()
    }

    /// Whether the current flow respects capacities and conservation
    pub fn is_feasible(&self) -> bool {
        if self.edges.iter().any(|e| e.flow < 0 || e.flow > e.capacity) {
            return false;
        }
        let mut balance = vec![0i128; self.vertex_count + 1];
        for edge in &self.edges {
            balance[edge.to] += i128::from(edge.flow);
            balance[edge.from] -= i128::from(edge.flow);
        }
        (1..=self.vertex_count)
            .filter(|&v| v != self.source && v != self.sink)
            .all(|v| balance[v] == 0)
    }

    pub fn reset_flows(&mut self) {
        for edge in &mut self.edges {
            edge.flow = 0;
        }
    }

    /// Move `amount` units along an edge; negative amounts cancel flow
    pub(crate) fn shift_flow(&mut self, id: EdgeId, amount: Capacity) {
        let edge = &mut self.edges[id];
        edge.flow += amount;
        debug_assert!(edge.flow >= 0 && edge.flow <= edge.capacity,
                      "flow {} outside 0..={} on edge {}", edge.flow, edge.capacity, id);
    }

    fn check_index(&self, id: EdgeId) -> Result<(), NetworkError> {
        if id >= self.edges.len() {
            return Err(NetworkError::InvalidIndex { index: id, edge_count: self.edges.len() });
        }
        Ok(())
    }

    fn check_terminal(&self, vertex: VertexId, role: &str, other: VertexId) -> Result<(), NetworkError> {
        if !self.contains_vertex(vertex) {
            return Err(NetworkError::InvalidTopology(format!(
                "new {} {} is outside 1..={}", role, vertex, self.vertex_count)));
        }
        if vertex == other {
            return Err(NetworkError::InvalidTopology(format!(
                "new {} {} would coincide with the other terminal", role, vertex)));
        }
        Ok(())
    }

    fn detach(&mut self, id: EdgeId) -> Edge {
        let edge = self.edges.remove(id);
        if edge.flow > 0 {
            self.release_reverse_flow(edge.from, edge.to, edge.flow);
        }
        debug!("Removed edge {}: {} -> {} [{}/{}]", id, edge.from, edge.to, edge.flow, edge.capacity);
        edge
    }

    /// Subtract `amount` from the flow of the first `to -> from` edge
    fn release_reverse_flow(&mut self, from: VertexId, to: VertexId, amount: Capacity) {
        let Some(reverse) = self.find_edge(to, from) else {
            warn!("No reverse edge {} -> {} to absorb {} units; flow left unbalanced", to, from, amount);
            return;
        };
        let edge = &mut self.edges[reverse];
        let absorbed = amount.min(edge.flow);
        edge.flow -= absorbed;
        if absorbed < amount {
            warn!("Reverse edge {} -> {} absorbed {} of {} units; flow left unbalanced",
                  to, from, absorbed, amount);
        }
    }
}

/// Narrow an exact sum back to `Capacity`, saturating at the bounds
fn clamp_capacity(value: i128) -> Capacity {
    Capacity::try_from(value).unwrap_or(if value < 0 { Capacity::MIN } else { Capacity::MAX })
}

fn validate_terminals(vertex_count: usize,
                      source: VertexId,
                      sink: VertexId,
                      limits: &NetworkLimits) -> Result<(), NetworkError> {
    if vertex_count == 0 {
        return Err(NetworkError::InvalidTopology("network needs at least one vertex".to_string()));
    }
    if !limits.admits_vertices(vertex_count) {
        return Err(NetworkError::LimitExceeded(format!(
            "{} vertices exceed the configured maximum", vertex_count)));
    }
    let range = 1..=vertex_count;
    if !range.contains(&source) || !range.contains(&sink) {
        return Err(NetworkError::InvalidTopology(format!(
            "source {} and sink {} must lie in 1..={}", source, sink, vertex_count)));
    }
    if source == sink {
        return Err(NetworkError::InvalidTopology(format!(
            "source and sink are both {}", source)));
    }
    Ok(())
}

impl fmt::Display for FlowNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]: ({}) ===> ({})", self.vertex_count, self.source, self.sink)?;
        if !self.edges.is_empty() {
            writeln!(f, "------------------")?;
        }
        for (id, edge) in self.edges.iter().enumerate() {
            writeln!(f, "{}: {} ---> {} [{}/{}]", id, edge.from, edge.to, edge.flow, edge.capacity)?;
        }
        Ok(())
    }
}
