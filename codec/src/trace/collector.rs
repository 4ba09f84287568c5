//! A [Tracker] that builds a [DecodeTrace] tree and logs failed decodes.

use super::{
    format::{DecodeTrace, TraceResult},
    Outcome, Tracker,
};
use std::{cell::RefCell, rc::Rc};
use tracing::{debug, warn};

/// Configuration for [Collector].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollectorConfig {
    /// Log failed decodes at `WARN`.
    pub log_errors: bool,
    /// Log successful decodes at `DEBUG`.
    pub log_successes: bool,
    /// Maximum number of input bytes printed per step.
    pub bytes_print_limit: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            log_errors: true,
            log_successes: false,
            bytes_print_limit: 20,
        }
    }
}

struct Frame {
    node: DecodeTrace,
    /// Opened by a refinement rather than a decode.
    refinement: bool,
    /// A decode has been folded into this refinement.
    claimed: bool,
}

#[derive(Default)]
struct State {
    cfg: CollectorConfig,
    input: Vec<u8>,
    stack: Vec<Frame>,
    last: Option<DecodeTrace>,
}

impl State {
    fn pop(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match self.stack.last_mut() {
            Some(parent) => parent.node.children.push(frame.node),
            None => self.last = Some(frame.node),
        }
    }
}

fn to_result(outcome: Outcome<'_>) -> TraceResult {
    match outcome {
        Outcome::Ok(value) => TraceResult::Decoded(value.map(|value| format!("{value:?}"))),
        Outcome::Err(err) => TraceResult::Failed(err.to_string()),
    }
}

/// Collects every decode on its thread into a [DecodeTrace].
///
/// Cloning yields a handle to the same collector, so a copy can be kept for inspection while
/// another is mounted.
#[derive(Clone, Default)]
pub struct Collector {
    state: Rc<RefCell<State>>,
}

impl Collector {
    pub fn new(cfg: CollectorConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                cfg,
                ..Default::default()
            })),
        }
    }

    /// The trace of the most recent outermost decode.
    pub fn last_trace(&self) -> Option<DecodeTrace> {
        self.state.borrow().last.clone()
    }

    /// The input of the most recent outermost decode.
    pub fn last_input(&self) -> Vec<u8> {
        self.state.borrow().input.clone()
    }

    /// Renders every step of the most recent outermost decode.
    pub fn render_last(&self) -> Option<String> {
        let state = self.state.borrow();
        let last = state.last.as_ref()?;
        Some(last.render_steps(&state.input, state.cfg.bytes_print_limit))
    }
}

impl Tracker for Collector {
    fn begin(&mut self, input: &[u8]) {
        let mut state = self.state.borrow_mut();
        state.input = input.to_vec();
        state.stack.clear();
        state.last = None;
    }

    fn decode_start(&mut self, location: &str, offset: usize) {
        let mut state = self.state.borrow_mut();
        if let Some(top) = state.stack.last_mut() {
            if top.refinement && !top.claimed {
                top.claimed = true;
                top.node.locations.push(location.to_string());
                top.node.start = offset;
                return;
            }
        }
        state.stack.push(Frame {
            node: DecodeTrace::new(location, offset),
            refinement: false,
            claimed: true,
        });
    }

    fn decode_end(&mut self, offset: usize, outcome: Outcome<'_>) {
        let mut state = self.state.borrow_mut();
        let Some(top) = state.stack.last_mut() else {
            return;
        };
        top.node.end = Some(offset);
        top.node.result = Some(to_result(outcome));
        if !top.refinement {
            state.pop();
        }
    }

    fn refine_start(&mut self, location: &str) {
        let mut state = self.state.borrow_mut();
        let start = state.stack.last().map_or(0, |top| top.node.start);
        state.stack.push(Frame {
            node: DecodeTrace::new(location, start),
            refinement: true,
            claimed: false,
        });
    }

    fn refine_end(&mut self, outcome: Outcome<'_>) {
        let mut state = self.state.borrow_mut();
        let Some(top) = state.stack.last_mut() else {
            return;
        };
        if top.node.result.is_none() || matches!(outcome, Outcome::Err(_)) {
            top.node.result = Some(to_result(outcome));
        }
        state.pop();
    }

    fn finish(&mut self) -> Option<String> {
        let state = self.state.borrow();
        let last = state.last.as_ref()?;
        let limit = state.cfg.bytes_print_limit;
        match last.failure_path() {
            Some(path) => {
                if state.cfg.log_errors {
                    let report = last.render_failure(&state.input, limit);
                    warn!(%path, "decode failed\n{report}");
                }
                Some(path)
            }
            None => {
                if state.cfg.log_successes {
                    let steps = last.render_steps(&state.input, limit);
                    debug!(location = %last.label(), "decode succeeded\n{steps}");
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        trace::{decode, decode_inspect, refine, Index, Mount},
        DecodeExt, Error, ReadExt,
    };

    #[test]
    fn test_static_vec_failure() {
        let collector = Collector::default();
        let _guard = Mount::new(collector.clone());

        let err = Vec::<u16>::decode(&[0x0c, 0x01, 0x00, 0x02, 0x00][..]).unwrap_err();
        match &err {
            Error::Traced { path, source } => {
                assert_eq!(path, "Vec<u16> / [2]");
                assert!(matches!(**source, Error::InsufficientBytes { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let trace = collector.last_trace().unwrap();
        assert_eq!(trace.children.len(), 3);
        assert_eq!(trace.children[1].start, 3);
        assert_eq!(trace.children[1].end, Some(5));
        assert!(trace.children[2].is_failed());
        assert_eq!(collector.last_input(), vec![0x0c, 0x01, 0x00, 0x02, 0x00]);
    }

    #[test]
    fn test_refinement_merges_with_decode() {
        let collector = Collector::default();
        let _guard = Mount::new(collector.clone());

        let mut buf = &[0x05, 0x02][..];
        let err = decode("Point", &mut buf, |buf| {
            let x = refine("x", || decode_inspect("u8", buf, |buf| u8::read(buf)))?;
            let y = refine("y", || decode_inspect("bool", buf, |buf| bool::read(buf)))?;
            Ok((x, y))
        })
        .unwrap_err();
        assert!(
            matches!(err, Error::Traced { ref path, .. } if path == "Point / y: bool"),
            "{err}"
        );

        let trace = collector.last_trace().unwrap();
        assert_eq!(trace.children[0].locations, vec!["x", "u8"]);
        assert_eq!(
            trace.children[0].result,
            Some(TraceResult::Decoded(Some("5".into())))
        );
        assert_eq!(trace.children[1].start, 1);
    }

    #[test]
    fn test_success_is_not_wrapped() {
        let collector = Collector::new(CollectorConfig {
            log_successes: true,
            ..Default::default()
        });
        let _guard = Mount::new(collector.clone());

        let mut buf = &[0x01, 0x00, 0x02][..];
        let value = decode("pair", &mut buf, |buf| {
            let a = decode(Index(0), buf, |buf| u16::read(buf))?;
            let b = decode(Index(1), buf, |buf| u8::read(buf))?;
            Ok((a, b))
        })
        .unwrap();
        assert_eq!(value, (1, 2));

        let rendered = collector.render_last().unwrap();
        assert!(rendered.starts_with("pair\n    Input: <[01 00 02] (len = used = 3)>"));
        assert!(rendered.contains("pair / [1]\n    Input: <[02] (len = used = 1)>"));
    }

    #[test]
    fn test_new_decode_resets_trace() {
        let collector = Collector::default();
        let _guard = Mount::new(collector.clone());
        assert!(u8::decode(&[0u8; 0][..]).is_err());
        assert!(collector.last_trace().unwrap().is_failed());
        u8::decode(&[1][..]).unwrap();
        assert!(!collector.last_trace().unwrap().is_failed());
    }
}
