//! Interactive session: reads commands, applies them to the network, reports
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::io::{BufRead, Write};
use log::{debug, info};

use flownet_core::{Algorithm, FlowNetwork, MaxFlowSolver};

use crate::command::{Command, TokenStream, HELP};
use crate::config::ShellConfig;
use crate::error::ShellError;

/// What the loop does after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

/// Command loop state: input tokens, output sink, and the network being edited
pub struct Session<R, W> {
    tokens: TokenStream<R>,
    output: W,
    network: FlowNetwork,
    solver: MaxFlowSolver,
    config: ShellConfig,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Ask for vertex count, source and sink, then build the session
    pub fn start(reader: R, mut output: W, config: ShellConfig) -> Result<Self, ShellError> {
        let mut tokens = TokenStream::new(reader);
        prompt(&mut output, config.prompt, "\n|V(G)| = ")?;
        let vertices = tokens.argument("vertex count")?;
        prompt(&mut output, config.prompt, "Source: ")?;
        let source = tokens.argument("source")?;
        prompt(&mut output, config.prompt, "Sink: ")?;
        let sink = tokens.argument("sink")?;
        if config.prompt {
            writeln!(output)?;
        }

        let network = FlowNetwork::with_limits(vertices, source, sink, config.limits)?;
        let solver = MaxFlowSolver::default();
        info!("Session started with solver {} ({})", solver.name(), solver.category());
        Ok(Self { tokens, output, network, solver, config })
    }

    pub fn network(&self) -> &FlowNetwork {
        &self.network
    }

    /// Process commands until `exit` or end of input
    pub fn run(&mut self) -> Result<(), ShellError> {
        loop {
            if !self.tokens.has_pending() {
                prompt(&mut self.output, self.config.prompt, "~/$  ")?;
            }
            let command = match Command::read(&mut self.tokens) {
                Ok(Some(command)) => command,
                Ok(None) => return Ok(()),
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    self.tokens.discard_line();
                    self.report(&err)?;
                    continue;
                }
            };

            match self.execute(command) {
                Ok(Outcome::Exit) => return Ok(()),
                Ok(Outcome::Continue) => {},
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => self.report(&err)?,
            }
        }
    }

    /// Apply one command to the network
    pub fn execute(&mut self, command: Command) -> Result<Outcome, ShellError> {
        debug!("Executing {:?}", command);
        let out = &mut self.output;
        let network = &mut self.network;

        match command {
            Command::Init { vertices, source, sink } => {
                network.initialize(vertices, source, sink)?;
                writeln!(out, "New network: [{}]: ({}) ===> ({})", vertices, source, sink)?;
            },
            Command::Clear => {
                let (vertices, source, sink) = (network.vertex_count(), network.source(), network.sink());
                network.initialize(vertices, source, sink)?;
                writeln!(out, "Cleared all edges")?;
            },
            Command::Edge { from, to, capacity } => {
                if let Some(id) = network.find_edge(from, to) {
                    return Err(ShellError::DuplicateEdge { from, to, id });
                }
                let id = network.add_edge(from, to, capacity)?;
                writeln!(out, "New edge: {}: {} ---> {} [{}]", id, from, to, capacity)?;
            },
            Command::RemoveEdge(id) => {
                let edge = network.remove_edge(id)?;
                writeln!(out, "Removed: {}: {} ---> {} [{}]", id, edge.from(), edge.to(), edge.capacity())?;
            },
            Command::AddVertex => {
                let vertex = network.add_vertex()?;
                writeln!(out, "New vertex: {}", vertex)?;
            },
            Command::RemoveVertex(vertex) => {
                let removed = network.remove_vertex(vertex)?;
                writeln!(out, "Removed: Node {} ({} edges)", vertex, removed.len())?;
            },
            Command::ChangeCapacity { edge, capacity } => {
                network.change_capacity(edge, capacity)?;
                writeln!(out, "Edge {} has now the capacity of {}", edge, capacity)?;
            },
            Command::Source(vertex) => {
                network.change_source(vertex)?;
                writeln!(out, "New source: {}", vertex)?;
            },
            Command::Sink(vertex) => {
                network.change_sink(vertex)?;
                writeln!(out, "New sink: {}", vertex)?;
            },
            Command::Check { from, to } => match network.find_edge(from, to) {
                Some(id) => {
                    let capacity = network.edges()[id].capacity();
                    writeln!(out, "Edge exists with index {}:", id)?;
                    writeln!(out, "{}: {} ---> {} [{}]", id, from, to, capacity)?;
                },
                None => writeln!(out, "Edge does not exist")?,
            },
            Command::Print => write!(out, "{}", network)?,
            Command::Json => {
                serde_json::to_writer_pretty(&mut *out, &*network)?;
                writeln!(out)?;
            },
            Command::Flow => {
                let result = self.solver.solve(network);
                let side: Vec<String> = result.min_cut.source_side.iter().map(|v| v.to_string()).collect();
                writeln!(out, "Max flow: {}", result.max_flow)?;
                writeln!(out, "Min cut: {{{}}} via edges {:?} (capacity {})",
                         side.join(", "), result.min_cut.edges, result.min_cut.capacity)?;
            },
            Command::Help => write!(out, "{}", HELP)?,
            Command::Exit => return Ok(Outcome::Exit),
        }
        Ok(Outcome::Continue)
    }

    fn report(&mut self, err: &ShellError) -> Result<(), ShellError> {
        debug!("Command failed: {:?}", err);
        writeln!(self.output, "Error: {}", err)?;
        Ok(())
    }
}

fn prompt<W: Write>(output: &mut W, enabled: bool, text: &str) -> Result<(), ShellError> {
    if enabled {
        write!(output, "{}", text)?;
        output.flush()?;
    }
    Ok(())
}

#[cfg(test)]
impl<R, W> Session<R, W> {
    fn into_output(self) -> W {
        self.output
    }
}
