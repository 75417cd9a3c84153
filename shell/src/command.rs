//! Command vocabulary and token-stream parsing
//!
//! Commands are whitespace-separated tokens; a command's arguments may follow
//! on the same line or on later lines.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::VecDeque;
use std::io::BufRead;
use std::str::FromStr;

use flownet_core::{Capacity, EdgeId, VertexId};

use crate::error::ShellError;

/// Whitespace-separated tokens read lazily, one line at a time
#[derive(Debug)]
pub struct TokenStream<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> TokenStream<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, pending: VecDeque::new() }
    }

    /// Next token, or `None` at end of input
    pub fn next_token(&mut self) -> Result<Option<String>, ShellError> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending.extend(line.split_whitespace().map(str::to_string));
        }
        Ok(self.pending.pop_front())
    }

    /// Drop whatever is left of the current line
    pub fn discard_line(&mut self) {
        self.pending.clear();
    }

    /// Whether tokens from the current line are still buffered
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Parse the next token as a numeric argument
    pub fn argument<T: FromStr>(&mut self, name: &'static str) -> Result<T, ShellError> {
        let token = self.next_token()?.ok_or(ShellError::MissingArgument(name))?;
        token.parse().map_err(|_| ShellError::InvalidArgument { name, value: token })
    }
}

/// A single shell command with its parsed arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Init { vertices: usize, source: VertexId, sink: VertexId },
    Clear,
    Edge { from: VertexId, to: VertexId, capacity: Capacity },
    RemoveEdge(EdgeId),
    AddVertex,
    RemoveVertex(VertexId),
    ChangeCapacity { edge: EdgeId, capacity: Capacity },
    Source(VertexId),
    Sink(VertexId),
    Check { from: VertexId, to: VertexId },
    Print,
    Json,
    Flow,
    Help,
    Exit,
}

impl Command {
    /// Read the next command and its arguments; `None` at end of input
    pub fn read<R: BufRead>(tokens: &mut TokenStream<R>) -> Result<Option<Self>, ShellError> {
        let Some(name) = tokens.next_token()? else {
            return Ok(None);
        };
        let command = match name.as_str() {
            "init" => Command::Init {
                vertices: tokens.argument("vertex count")?,
                source: tokens.argument("source")?,
                sink: tokens.argument("sink")?,
            },
            "clear" => Command::Clear,
            "edge" => Command::Edge {
                from: tokens.argument("from")?,
                to: tokens.argument("to")?,
                capacity: tokens.argument("capacity")?,
            },
            "rme" => Command::RemoveEdge(tokens.argument("edge index")?),
            "addv" => Command::AddVertex,
            "cut" | "rmv" => Command::RemoveVertex(tokens.argument("vertex")?),
            "cap" => Command::ChangeCapacity {
                edge: tokens.argument("edge index")?,
                capacity: tokens.argument("capacity")?,
            },
            "src" => Command::Source(tokens.argument("source")?),
            "sink" => Command::Sink(tokens.argument("sink")?),
            "check" => Command::Check {
                from: tokens.argument("from")?,
                to: tokens.argument("to")?,
            },
            "print" => Command::Print,
            "json" => Command::Json,
            "flow" => Command::Flow,
            "help" => Command::Help,
            "exit" | "quit" => Command::Exit,
            _ => return Err(ShellError::UnknownCommand(name)),
        };
        Ok(Some(command))
    }
}

pub const HELP: &str = "\
Commands:
----------------
\tinit [v] [s] [t] - start over with v vertices, source s and sink t
\tclear - remove every edge, keeping vertices, source and sink
\tedge [f] [t] [c] - add an edge from f to t of capacity c
\trme [i] - remove edge with an index i (later indices shift down)
\tcap [i] [c] - change capacity of edge i to c
\taddv - add a vertex
\tcut [n] - remove every edge touching vertex n (alias: rmv)
\tsrc [n] - change source to the vertex no. n
\tsink [n] - change sink to the vertex no. n
\tcheck [f] [t] - look up the edge from f to t

\tflow - compute the maximum flow and a minimum cut
\tprint - print the network
\t\tindex: from ---> to [flow/capacity]
\t\t[vertices]: (source) ===> (sink)
\tjson - print the network as JSON

\thelp - show this screen
\texit - leave application (alias: quit)
";
