//! Maximum Flow Algorithm Implementation
//!
//! This module implements shortest augmenting path maximum flow (Dinic's
//! level-graph refinement of Edmonds-Karp) over an editable [`FlowNetwork`].
//! Each phase assigns BFS levels over the residual graph and then saturates a
//! blocking flow with a depth-first search restricted to level-increasing
//! arcs. The loop ends when the sink is no longer reachable.
//!
//! # Residual graph
//! Every edge `u -> v` contributes a forward arc `u -> v` with capacity
//! `capacity - flow` and a reverse arc `v -> u` with capacity `flow`. Pushing
//! along a reverse arc cancels flow on the edge it mirrors, so residual
//! tracking needs no positional pairing and survives any sequence of edits.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::VecDeque;
use std::time::Instant;
use log::{debug, info, warn};
use serde::{Serialize, Deserialize};

use crate::algorithm::traits::{
    parse_bool_parameter, Algorithm, AlgorithmError, AlgorithmParameter, Capacity, EdgeId,
    ParameterType, VertexId,
};
use crate::data_structures::flow_network::FlowNetwork;

/// Bound on the first arc of every augmenting path
const UNBOUNDED: Capacity = Capacity::MAX;

/// BFS level per vertex (index 0 unused); `None` marks unreached or dead vertices
type Levels = Vec<Option<usize>>;

/// Direction of a residual arc relative to its underlying edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Reverse,
}

/// Residual arc derived from a network edge
#[derive(Debug, Clone, Copy)]
struct ResidualArc {
    /// Underlying edge
    edge: EdgeId,
    /// Whether the arc follows or opposes the edge
    direction: Direction,
    /// Vertex the arc leads to
    head: VertexId,
}

impl ResidualArc {
    fn residual_capacity(&self, network: &FlowNetwork) -> Capacity {
        let edge = &network.edges()[self.edge];
        match self.direction {
            Direction::Forward => edge.residual_capacity(),
            Direction::Reverse => edge.reverse_residual_capacity(),
        }
    }

    fn push(&self, network: &mut FlowNetwork, amount: Capacity) {
        match self.direction {
            Direction::Forward => network.shift_flow(self.edge, amount),
            Direction::Reverse => network.shift_flow(self.edge, -amount),
        }
    }
}

/// Residual arcs grouped by tail vertex
///
/// Built once per run; the edge set does not change while the solver holds
/// the network.
#[derive(Debug)]
struct ResidualGraph {
    arcs: Vec<Vec<ResidualArc>>,
}

impl ResidualGraph {
    fn build(network: &FlowNetwork) -> Self {
        let mut arcs = vec![Vec::new(); network.vertex_count() + 1];
        for (id, edge) in network.edges().iter().enumerate() {
            // a self-loop can never lead to the next level
            if edge.is_self_loop() {
                continue;
            }
            arcs[edge.from()].push(ResidualArc { edge: id, direction: Direction::Forward, head: edge.to() });
            arcs[edge.to()].push(ResidualArc { edge: id, direction: Direction::Reverse, head: edge.from() });
        }
        Self { arcs }
    }

    /// Breadth-first level assignment from the source over positive residual arcs
    fn assign_levels(&self, network: &FlowNetwork) -> Levels {
        let mut levels: Levels = vec![None; self.arcs.len()];
        let source = network.source();
        levels[source] = Some(0);

        let mut queue = VecDeque::new();
        queue.push_back(source);
        while let Some(vertex) = queue.pop_front() {
            let next_level = levels[vertex].map(|level| level + 1);
            for arc in &self.arcs[vertex] {
                if levels[arc.head].is_none() && arc.residual_capacity(network) > 0 {
                    levels[arc.head] = next_level;
                    queue.push_back(arc.head);
                }
            }
        }
        levels
    }

    /// Saturate a blocking flow in the level graph, returning the amount pushed
    fn augment_blocking_flow(&self,
                             network: &mut FlowNetwork,
                             levels: &mut Levels,
                             metrics: &mut FlowMetrics) -> Capacity {
        let mut next_arc = vec![0usize; self.arcs.len()];
        let mut pushed: Capacity = 0;
        loop {
            let delta = self.augment_path(network, levels, &mut next_arc);
            if delta == 0 {
                return pushed;
            }
            metrics.augmenting_paths += 1;
            pushed = pushed.saturating_add(delta);
        }
    }

    /// Find one source-sink path along level-increasing arcs and push its bottleneck
    ///
    /// The path is kept on an explicit stack, so depth is bounded only by the
    /// vertex count held in memory. Vertices proven to be dead ends lose their
    /// level for the rest of the phase.
    fn augment_path(&self,
                    network: &mut FlowNetwork,
                    levels: &mut Levels,
                    next_arc: &mut [usize]) -> Capacity {
        let source = network.source();
        let sink = network.sink();
        let mut path: Vec<ResidualArc> = Vec::new();
        let mut vertex = source;

        loop {
            if vertex == sink {
                let mut bottleneck = UNBOUNDED;
                for arc in &path {
                    bottleneck = bottleneck.min(arc.residual_capacity(network));
                }
                for arc in &path {
                    arc.push(network, bottleneck);
                }
                return bottleneck;
            }

            match self.admissible_arc(network, levels, next_arc, vertex) {
                Some(arc) => {
                    path.push(arc);
                    vertex = arc.head;
                }
                None => {
                    levels[vertex] = None;
                    if path.pop().is_none() {
                        return 0;
                    }
                    vertex = path.last().map_or(source, |arc| arc.head);
                    next_arc[vertex] += 1;
                }
            }
        }
    }

    fn admissible_arc(&self,
                      network: &FlowNetwork,
                      levels: &Levels,
                      next_arc: &mut [usize],
                      vertex: VertexId) -> Option<ResidualArc> {
        let wanted = levels[vertex]? + 1;
        let arcs = &self.arcs[vertex];
        while next_arc[vertex] < arcs.len() {
            let arc = arcs[next_arc[vertex]];
            if levels[arc.head] == Some(wanted) && arc.residual_capacity(network) > 0 {
                return Some(arc);
            }
            next_arc[vertex] += 1;
        }
        None
    }
}

/// Solver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Continue from the network's current flow when it is feasible
    pub warm_start: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self { warm_start: true }
    }
}

/// Flow algorithm performance metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowMetrics {
    /// Number of BFS level assignments that reached the sink
    pub phases: usize,
    /// Number of augmenting paths pushed
    pub augmenting_paths: usize,
    /// Whether the run continued from an existing feasible flow
    pub warm_started: bool,
    /// Algorithm execution time
    pub execution_time_ms: f64,
}

/// Minimum source-sink cut induced by the final residual graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinCut {
    /// Vertices reachable from the source, ascending
    pub source_side: Vec<VertexId>,
    /// Edges leaving the source side
    pub edges: Vec<EdgeId>,
    /// Total capacity of the cut edges
    pub capacity: Capacity,
}

impl MinCut {
    fn from_levels(network: &FlowNetwork, levels: &Levels) -> Self {
        let reachable = |v: VertexId| levels[v].is_some();
        let source_side = (1..=network.vertex_count()).filter(|&v| reachable(v)).collect();
        let edges: Vec<EdgeId> = network.edges().iter()
            .enumerate()
            .filter(|(_, e)| reachable(e.from()) && !reachable(e.to()))
            .map(|(id, _)| id)
            .collect();
        let capacity = edges.iter()
            .fold(0, |sum: Capacity, &id| sum.saturating_add(network.edges()[id].capacity()));
        Self { source_side, edges, capacity }
    }
}

/// Maximum flow result with cut and metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxFlowResult {
    /// Maximum flow value
    pub max_flow: Capacity,
    /// Minimum cut certifying the value
    pub min_cut: MinCut,
    /// Algorithm performance metrics
    pub metrics: FlowMetrics,
}

/// Maximum flow solver
///
/// Holds configuration only; all search state lives inside a single run.
#[derive(Debug, Clone, Default)]
pub struct MaxFlowSolver {
    config: SolverConfig,
}

impl MaxFlowSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> SolverConfig {
        self.config
    }

    /// Compute the maximum flow value, leaving a maximum flow on the edges
    pub fn run(&self, network: &mut FlowNetwork) -> Capacity {
        let mut metrics = FlowMetrics::default();
        let (max_flow, _) = self.augment(network, &mut metrics);
        max_flow
    }

    /// Compute the maximum flow together with a minimum cut and metrics
    pub fn solve(&self, network: &mut FlowNetwork) -> MaxFlowResult {
        let start = Instant::now();
        let mut metrics = FlowMetrics::default();
        let (max_flow, levels) = self.augment(network, &mut metrics);
        let min_cut = MinCut::from_levels(network, &levels);
        metrics.execution_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        info!("Max flow {} in {} phases, {} augmenting paths ({:.3} ms)",
              max_flow, metrics.phases, metrics.augmenting_paths, metrics.execution_time_ms);
        MaxFlowResult { max_flow, min_cut, metrics }
    }

    /// Run phases until the sink is unreachable; returns the flow value and
    /// the final level assignment
    fn augment(&self, network: &mut FlowNetwork, metrics: &mut FlowMetrics) -> (Capacity, Levels) {
        let mut total = self.starting_value(network, metrics);
        let graph = ResidualGraph::build(network);

        loop {
            let mut levels = graph.assign_levels(network);
            if levels[network.sink()].is_none() {
                debug_assert_eq!(total, network.flow_value());
                return (total, levels);
            }
            metrics.phases += 1;
            let pushed = graph.augment_blocking_flow(network, &mut levels, metrics);
            debug!("Phase {}: pushed {}", metrics.phases, pushed);
            total = total.saturating_add(pushed);
        }
    }

    fn starting_value(&self, network: &mut FlowNetwork, metrics: &mut FlowMetrics) -> Capacity {
        if network.is_feasible() {
            if self.config.warm_start {
                metrics.warm_started = true;
                return network.flow_value();
            }
        } else {
            warn!("Discarding infeasible flow assignment left by edits");
        }
        network.reset_flows();
        0
    }
}

/// Compute the maximum flow with the default solver
pub fn max_flow(network: &mut FlowNetwork) -> Capacity {
    MaxFlowSolver::default().run(network)
}

impl Algorithm for MaxFlowSolver {
    fn name(&self) -> &'static str {
        "Dinic"
    }

    fn category(&self) -> &'static str {
        "max_flow"
    }

    fn description(&self) -> String {
        "Shortest augmenting path maximum flow: BFS level graphs with blocking-flow \
         augmentation, O(V^2 E) time, O(V + E) space per run."
            .to_string()
    }

    fn parameters(&self) -> Vec<AlgorithmParameter> {
        vec![AlgorithmParameter {
            name: "warm_start".to_string(),
            value: self.config.warm_start.to_string(),
            value_type: ParameterType::Boolean,
            description: "Continue from the current flow when it is feasible".to_string(),
        }]
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        match name {
            "warm_start" => {
                self.config.warm_start = parse_bool_parameter(name, value)?;
                Ok(())
            },
            _ => Err(AlgorithmError::UnknownParameter(name.to_string())),
        }
    }

    fn get_parameter(&self, name: &str) -> Option<String> {
        match name {
            "warm_start" => Some(self.config.warm_start.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_network(vertices: usize, source: VertexId, sink: VertexId, edges: &[(VertexId, VertexId, Capacity)]) -> FlowNetwork {
        let mut network = FlowNetwork::new(vertices, source, sink).unwrap();
        for &(from, to, capacity) in edges {
            network.add_edge(from, to, capacity).unwrap();
        }
        network
    }

    const DIAMOND: [(VertexId, VertexId, Capacity); 4] = [(1, 2, 3), (1, 3, 2), (2, 4, 2), (3, 4, 3)];

    const LAYERED: [(VertexId, VertexId, Capacity); 8] = [
        (1, 2, 10), (1, 3, 10), (2, 4, 4), (2, 5, 8),
        (3, 5, 9), (4, 6, 10), (5, 4, 6), (5, 6, 10),
    ];

    fn assert_valid_flow(network: &FlowNetwork) {
        for edge in network.edges() {
            assert!(edge.flow() >= 0 && edge.flow() <= edge.capacity(), "{:?}", edge);
        }
        for vertex in 1..=network.vertex_count() {
            if vertex != network.source() && vertex != network.sink() {
                assert_eq!(network.excess(vertex), 0, "conservation at {}", vertex);
            }
        }
    }

    #[test]
    fn test_diamond_scenario() {
        let mut network = build_network(4, 1, 4, &DIAMOND);
        assert_eq!(max_flow(&mut network), 4);
        assert_valid_flow(&network);
    }

    #[test]
    fn test_single_edge() {
        let mut network = build_network(2, 1, 2, &[(1, 2, 5)]);
        assert_eq!(max_flow(&mut network), 5);
        assert_eq!(network.edge(0).unwrap().flow(), 5);
    }

    #[test]
    fn test_no_path() {
        let mut network = build_network(4, 1, 4, &[(1, 2, 10), (3, 4, 5)]);
        assert_eq!(max_flow(&mut network), 0);
        assert!(network.edges().iter().all(|e| e.flow() == 0));
    }

    #[test]
    fn test_empty_network() {
        let mut network = build_network(3, 1, 3, &[]);
        assert_eq!(max_flow(&mut network), 0);
    }

    #[test]
    fn test_source_without_outgoing_edges() {
        let mut network = build_network(3, 1, 3, &[(2, 1, 4), (2, 3, 4)]);
        assert_eq!(max_flow(&mut network), 0);
    }

    #[test]
    fn test_zero_capacity_edges_carry_nothing() {
        let mut network = build_network(3, 1, 3, &[(1, 2, 0), (2, 3, 9), (1, 3, 1)]);
        assert_eq!(max_flow(&mut network), 1);
        assert_eq!(network.edge(0).unwrap().flow(), 0);
    }

    #[test]
    fn test_self_loops_are_flow_dead() {
        let mut network = build_network(3, 1, 3, &[(1, 1, 5), (1, 2, 4), (2, 2, 7), (2, 3, 3)]);
        assert_eq!(max_flow(&mut network), 3);
        assert_eq!(network.edge(0).unwrap().flow(), 0);
        assert_eq!(network.edge(2).unwrap().flow(), 0);
    }

    #[test]
    fn test_layered_network() {
        let mut network = build_network(6, 1, 6, &LAYERED);
        assert_eq!(max_flow(&mut network), 19);
        assert_valid_flow(&network);
    }

    #[test]
    fn test_insertion_order_invariance() {
        let mut orders: Vec<Vec<_>> = vec![LAYERED.to_vec()];
        let mut reversed = LAYERED.to_vec();
        reversed.reverse();
        orders.push(reversed);
        for shift in 1..LAYERED.len() {
            let mut rotated = LAYERED.to_vec();
            rotated.rotate_left(shift);
            orders.push(rotated);
        }

        for edges in orders {
            let mut network = build_network(6, 1, 6, &edges);
            assert_eq!(max_flow(&mut network), 19, "order {:?}", edges);
            assert_valid_flow(&network);
        }
    }

    #[test]
    fn test_parallel_and_antiparallel_edges() {
        let mut network = build_network(3, 1, 3, &[(1, 2, 2), (1, 2, 3), (2, 1, 4), (2, 3, 10)]);
        assert_eq!(max_flow(&mut network), 5);
        assert_valid_flow(&network);
    }

    #[test]
    fn test_min_cut_duality() {
        let mut network = build_network(4, 1, 4, &DIAMOND);
        let result = MaxFlowSolver::default().solve(&mut network);
        assert_eq!(result.max_flow, 4);
        assert_eq!(result.min_cut.capacity, result.max_flow);
        assert_eq!(result.min_cut.source_side, vec![1, 2]);
        assert_eq!(result.min_cut.edges, vec![1, 2]);

        let mut network = build_network(6, 1, 6, &LAYERED);
        let result = MaxFlowSolver::default().solve(&mut network);
        assert_eq!(result.min_cut.capacity, result.max_flow);
        assert!(result.min_cut.source_side.contains(&1));
        assert!(!result.min_cut.source_side.contains(&6));
    }

    #[test]
    fn test_repeated_runs_are_idempotent() {
        let mut network = build_network(6, 1, 6, &LAYERED);
        let solver = MaxFlowSolver::default();
        assert_eq!(solver.run(&mut network), 19);
        let flows: Vec<_> = network.edges().iter().map(|e| e.flow()).collect();

        let second = solver.solve(&mut network);
        assert_eq!(second.max_flow, 19);
        assert_eq!(second.metrics.augmenting_paths, 0);
        assert!(second.metrics.warm_started);
        assert_eq!(network.edges().iter().map(|e| e.flow()).collect::<Vec<_>>(), flows);
    }

    #[test]
    fn test_warm_start_cancels_flow() {
        let mut network = build_network(4, 1, 4, &[(1, 2, 1), (1, 3, 1), (2, 3, 1), (2, 4, 1), (3, 4, 1)]);
        // feasible but blocking: 1 -> 2 -> 3 -> 4
        network.shift_flow(0, 1);
        network.shift_flow(2, 1);
        network.shift_flow(4, 1);
        assert!(network.is_feasible());

        let result = MaxFlowSolver::default().solve(&mut network);
        assert_eq!(result.max_flow, 2);
        assert!(result.metrics.warm_started);
        assert_eq!(network.edge(2).unwrap().flow(), 0);
        assert_valid_flow(&network);
    }

    #[test]
    fn test_resolve_after_capacity_reduction() {
        let mut network = build_network(4, 1, 4, &DIAMOND);
        assert_eq!(max_flow(&mut network), 4);

        let id = network.find_edge(2, 4).unwrap();
        network.change_capacity(id, 1).unwrap();
        assert_eq!(network.edge(id).unwrap().flow(), 1);
        assert!(!network.is_feasible());

        let result = MaxFlowSolver::default().solve(&mut network);
        assert_eq!(result.max_flow, 3);
        assert!(!result.metrics.warm_started);
        assert_valid_flow(&network);
    }

    #[test]
    fn test_resolve_after_capacity_reduction_with_reverse_edge() {
        let mut network = build_network(3, 1, 3, &[(1, 2, 5), (2, 1, 5), (2, 3, 5)]);
        // 1 -> 2 carries 4 while 2 -> 1 carries 1: net 3 into vertex 2
        network.shift_flow(0, 4);
        network.shift_flow(1, 1);
        network.shift_flow(2, 3);
        assert!(network.is_feasible());

        network.change_capacity(0, 3).unwrap();
        assert_eq!(network.edge(0).unwrap().flow(), 3);
        assert_eq!(network.edge(1).unwrap().flow(), 0);
        assert!(network.is_feasible());

        let result = MaxFlowSolver::default().solve(&mut network);
        assert!(result.metrics.warm_started);
        assert_eq!(result.max_flow, 3);
    }

    #[test]
    fn test_resolve_after_vertex_removal() {
        let mut network = build_network(4, 1, 4, &DIAMOND);
        assert_eq!(max_flow(&mut network), 4);
        network.remove_vertex(3).unwrap();
        assert_eq!(max_flow(&mut network), 2);
        assert_valid_flow(&network);
    }

    #[test]
    fn test_swapped_terminals_cancel_existing_flow() {
        let mut network = build_network(4, 1, 4, &DIAMOND);
        assert_eq!(max_flow(&mut network), 4);

        network.change_source(2).unwrap();
        network.change_sink(1).unwrap();
        network.change_source(4).unwrap();
        assert_eq!(max_flow(&mut network), 0);
        assert!(network.edges().iter().all(|e| e.flow() == 0));
    }

    #[test]
    fn test_cold_start_parameter() {
        let mut solver = MaxFlowSolver::default();
        solver.set_parameter("warm_start", "false").unwrap();
        assert_eq!(solver.get_parameter("warm_start"), Some("false".to_string()));

        let mut network = build_network(4, 1, 4, &DIAMOND);
        assert_eq!(solver.run(&mut network), 4);
        let result = solver.solve(&mut network);
        assert_eq!(result.max_flow, 4);
        assert!(!result.metrics.warm_started);
        assert!(result.metrics.augmenting_paths > 0);
    }

    #[test]
    fn test_algorithm_metadata() {
        let mut solver = MaxFlowSolver::new(SolverConfig::default());
        assert_eq!(solver.name(), "Dinic");
        assert_eq!(solver.category(), "max_flow");
        let parameters = solver.parameters();
        assert_eq!(parameters.len(), 1);
        assert_eq!(parameters[0].name, "warm_start");
        assert_eq!(parameters[0].value_type, ParameterType::Boolean);
        assert!(matches!(solver.set_parameter("depth", "3"), Err(AlgorithmError::UnknownParameter(_))));
        assert!(matches!(solver.set_parameter("warm_start", "soon"), Err(AlgorithmError::InvalidParameter { .. })));
        assert_eq!(solver.get_parameter("depth"), None);
    }

    #[test]
    fn test_large_capacities() {
        let mut network = build_network(3, 1, 3, &[(1, 2, Capacity::MAX), (2, 3, Capacity::MAX)]);
        assert_eq!(max_flow(&mut network), Capacity::MAX);
    }
}
