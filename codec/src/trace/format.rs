//! Decode trace trees and their textual rendering.

use std::fmt::Write as _;

/// How a traced step ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraceResult {
    /// The step succeeded, with the `Debug` rendering of its value when one was reported.
    Decoded(Option<String>),
    /// The step failed with this error message.
    Failed(String),
}

/// One node of a decode trace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodeTrace {
    /// Labels attached to this step, outermost first.
    pub locations: Vec<String>,
    /// Input offset at which the step started.
    pub start: usize,
    /// Input offset at which the step ended.
    pub end: Option<usize>,
    /// `None` while the step is still running.
    pub result: Option<TraceResult>,
    pub children: Vec<DecodeTrace>,
}

impl DecodeTrace {
    pub(crate) fn new(location: &str, start: usize) -> Self {
        Self {
            locations: vec![location.to_string()],
            start,
            ..Default::default()
        }
    }

    /// The labels of this step joined together.
    pub fn label(&self) -> String {
        self.locations.join(": ")
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.result, Some(TraceResult::Failed(_)))
    }

    /// Returns the chain of nodes from this one down to the innermost failed step.
    ///
    /// Empty if this step did not fail.
    pub fn failure_chain(&self) -> Vec<&DecodeTrace> {
        let mut chain = Vec::new();
        let mut node = self;
        while node.is_failed() {
            chain.push(node);
            match node.children.last() {
                Some(child) => node = child,
                None => break,
            }
        }
        chain
    }

    /// Returns the labels along [DecodeTrace::failure_chain] joined by ` / `.
    pub fn failure_path(&self) -> Option<String> {
        let chain = self.failure_chain();
        if chain.is_empty() {
            return None;
        }
        let labels: Vec<String> = chain.iter().map(|node| node.label()).collect();
        Some(labels.join(" / "))
    }

    /// Renders every step of the tree, depth first.
    ///
    /// `input` must be the input the outermost step started on.
    pub fn render_steps(&self, input: &[u8], limit: usize) -> String {
        let mut out = String::new();
        self.render_tree(input, limit, &mut Vec::new(), &mut out);
        out
    }

    /// Renders only the steps from this one down to the innermost failure.
    pub fn render_failure(&self, input: &[u8], limit: usize) -> String {
        let mut out = String::new();
        let mut path = Vec::new();
        for node in self.failure_chain() {
            path.push(node.label());
            node.render_step(&path, input, limit, &mut out);
        }
        out
    }

    fn render_tree(&self, input: &[u8], limit: usize, path: &mut Vec<String>, out: &mut String) {
        path.push(self.label());
        self.render_step(path, input, limit, out);
        for child in &self.children {
            child.render_tree(input, limit, path, out);
        }
        path.pop();
    }

    fn render_step(&self, path: &[String], input: &[u8], limit: usize, out: &mut String) {
        if !out.is_empty() {
            out.push('\n');
        }
        let start = self.start.min(input.len());
        let used = self.end.map(|end| end.saturating_sub(self.start));
        let result = match &self.result {
            Some(TraceResult::Decoded(Some(value))) => format!("Ok({value})"),
            Some(TraceResult::Decoded(None)) => "Ok".to_string(),
            Some(TraceResult::Failed(err)) => format!("Err({err})"),
            None => "<unfinished>".to_string(),
        };
        let _ = writeln!(out, "{}", path.join(" / "));
        let _ = writeln!(
            out,
            "    Input: {}",
            pretty_input(&input[start..], used, limit)
        );
        let _ = writeln!(out, "    Children: {}", self.children.len());
        let _ = writeln!(out, "    Result: {result}");
    }
}

fn hex_join(bytes: &[u8], out: &mut String) {
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02x}");
    }
}

/// Renders decoder input as hex, bracketing the first `used` bytes.
///
/// At most `limit` bytes are printed; elided bytes are marked with `...`. A `used` count larger
/// than the input is flagged with `(!)`.
pub fn pretty_input(input: &[u8], used: Option<usize>, limit: usize) -> String {
    let len = input.len();
    if len == 0 && used.unwrap_or(0) == 0 {
        return "<empty>".to_string();
    }

    let mut body = String::new();
    match used {
        Some(used) => {
            let used_clamped = used.min(len);
            let shown = used_clamped.min(limit);
            body.push('[');
            hex_join(&input[..shown], &mut body);
            if shown < used_clamped {
                body.push_str("...");
            }
            body.push(']');

            let budget = limit - shown;
            let rest = &input[used_clamped..];
            if !rest.is_empty() {
                if budget == 0 {
                    body.push_str(" ...");
                } else {
                    let shown = rest.len().min(budget);
                    body.push(' ');
                    hex_join(&rest[..shown], &mut body);
                    if shown < rest.len() {
                        body.push_str("...");
                    }
                }
            }
        }
        None => {
            let shown = len.min(limit);
            hex_join(&input[..shown], &mut body);
            if shown < len {
                body.push_str("...");
            }
        }
    }

    let suffix = match used {
        None => format!("(len: {len})"),
        Some(used) if used == len => format!("(len = used = {len})"),
        Some(used) if used > len => format!("(len: {len}, used: (!) {used})"),
        Some(used) => format!("(len: {len}, used: {used})"),
    };
    format!("<{body} {suffix}>")
}
