//! Decode tracing.
//!
//! # Overview
//!
//! Decoders report their progress through two hooks:
//!
//! - [decode] wraps a decode call that reads from a buffer, opening a span that records where it
//!   started, where it ended and what it produced.
//! - [refine] attaches a finer label (a field name, an element index, a variant tag) to the
//!   decode it wraps, without opening a span of its own.
//!
//! A [Tracker] receives these events. When none is mounted on the current thread the hooks
//! call straight through, at the cost of reading one thread-local flag.
//!
//! When the outermost traced decode fails, the tracker may return a location path for the
//! failure, and the error is returned wrapped in [Error::Traced].
//!
//! # Synchronization
//!
//! Trackers are mounted per thread. Decodes running on other threads are neither observed nor
//! affected.
//!
//! # Example
//!
//! ```
//! use scale_codec::{trace::{Collector, Mount}, DecodeExt, Error};
//!
//! let collector = Collector::default();
//! let _guard = Mount::new(collector.clone());
//!
//! // Declares three elements but only carries two.
//! let err = Vec::<u16>::decode(&[0x0c, 0x01, 0x00, 0x02, 0x00][..]).unwrap_err();
//! assert!(matches!(err, Error::Traced { ref path, .. } if path == "Vec<u16> / [2]"));
//! ```

use crate::{util::short_type_name, Error};
use bytes::Buf;
use std::{
    cell::{Cell, RefCell},
    fmt::{self, Debug, Display},
    marker::PhantomData,
};

mod collector;
mod format;

pub use collector::{Collector, CollectorConfig};
pub use format::{pretty_input, DecodeTrace, TraceResult};

/// Outcome of a traced step, passed to a [Tracker] as the step ends.
#[derive(Clone, Copy, Debug)]
pub enum Outcome<'a> {
    /// The step succeeded. The value is present when the decoder chose to expose it.
    Ok(Option<&'a dyn Debug>),
    /// The step failed.
    Err(&'a Error),
}

/// Receives decode events on the thread it is mounted on.
///
/// Offsets are relative to the start of the outermost traced decode.
pub trait Tracker {
    /// Called before the outermost traced decode starts, with the bytes it will read from.
    fn begin(&mut self, _input: &[u8]) {}

    /// A decode span opens at `offset`.
    fn decode_start(&mut self, location: &str, offset: usize);

    /// The innermost open decode span closes at `offset`.
    fn decode_end(&mut self, offset: usize, outcome: Outcome<'_>);

    /// A refinement label opens.
    fn refine_start(&mut self, location: &str);

    /// The innermost open refinement closes.
    fn refine_end(&mut self, outcome: Outcome<'_>);

    /// Called after the outermost traced decode ends. Returns the location path of the failure,
    /// if there was one and the tracker can describe it.
    fn finish(&mut self) -> Option<String> {
        None
    }
}

struct Mounted {
    tracker: Box<dyn Tracker>,
    depth: usize,
    base: usize,
}

thread_local! {
    static ACTIVE: Cell<bool> = const { Cell::new(false) };
    static MOUNTED: RefCell<Option<Mounted>> = const { RefCell::new(None) };
}

/// Returns true if a tracker is mounted on this thread.
#[inline]
pub fn is_active() -> bool {
    ACTIVE.with(Cell::get)
}

fn swap(tracker: Option<Box<dyn Tracker>>, checked: bool) -> Option<Box<dyn Tracker>> {
    MOUNTED.with(|mounted| {
        let mut mounted = mounted.borrow_mut();
        if let Some(current) = mounted.as_ref() {
            if checked {
                assert_eq!(current.depth, 0, "cannot swap tracker during a decode");
            }
        }
        ACTIVE.with(|active| active.set(tracker.is_some()));
        let next = tracker.map(|tracker| Mounted {
            tracker,
            depth: 0,
            base: 0,
        });
        std::mem::replace(&mut *mounted, next).map(|previous| previous.tracker)
    })
}

/// Mounts `tracker` on this thread, returning the previously mounted tracker.
///
/// # Panics
///
/// Panics if called from within a traced decode.
pub fn mount(tracker: impl Tracker + 'static) -> Option<Box<dyn Tracker>> {
    swap(Some(Box::new(tracker)), true)
}

/// Unmounts the tracker on this thread, returning it.
///
/// # Panics
///
/// Panics if called from within a traced decode.
pub fn unmount() -> Option<Box<dyn Tracker>> {
    swap(None, true)
}

/// Mounts a tracker for as long as the guard lives, then restores the previous one.
#[must_use = "the tracker is unmounted when the guard is dropped"]
pub struct Mount {
    previous: Option<Box<dyn Tracker>>,
}

impl Mount {
    pub fn new(tracker: impl Tracker + 'static) -> Self {
        Self {
            previous: mount(tracker),
        }
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        // May run while unwinding out of a decode.
        swap(self.previous.take(), false);
    }
}

/// Labels a decode span with the name of `T`, without module paths.
pub struct TypeName<T: ?Sized>(PhantomData<*const T>);

impl<T: ?Sized> TypeName<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: ?Sized> Default for TypeName<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Display for TypeName<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&short_type_name(std::any::type_name::<T>()))
    }
}

/// Labels an element of a sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Index(pub usize);

impl Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

fn inspect_none<T>(_: &T) -> Option<&dyn Debug> {
    None
}

fn inspect_debug<T: Debug>(value: &T) -> Option<&dyn Debug> {
    Some(value)
}

/// Runs `f` inside a decode span labelled `location`.
pub fn decode<B: Buf, T>(
    location: impl Display,
    buf: &mut B,
    f: impl FnOnce(&mut B) -> Result<T, Error>,
) -> Result<T, Error> {
    traced(location, buf, f, inspect_none)
}

/// Like [decode], and also reports the decoded value to the tracker.
pub fn decode_inspect<B: Buf, T: Debug>(
    location: impl Display,
    buf: &mut B,
    f: impl FnOnce(&mut B) -> Result<T, Error>,
) -> Result<T, Error> {
    traced(location, buf, f, inspect_debug)
}

/// An open decode span. Dropping it closes the span, even when the decode panics.
struct Span;

impl Drop for Span {
    fn drop(&mut self) {
        MOUNTED.with(|mounted| {
            if let Ok(mut mounted) = mounted.try_borrow_mut() {
                if let Some(mounted) = mounted.as_mut() {
                    mounted.depth = mounted.depth.saturating_sub(1);
                }
            }
        });
    }
}

fn traced<B: Buf, T>(
    location: impl Display,
    buf: &mut B,
    f: impl FnOnce(&mut B) -> Result<T, Error>,
    inspect: fn(&T) -> Option<&dyn Debug>,
) -> Result<T, Error> {
    if !is_active() {
        return f(buf);
    }

    // Open the span.
    let root = MOUNTED.with(|mounted| {
        let mut mounted = mounted.borrow_mut();
        let mounted = mounted.as_mut()?;
        if mounted.depth == 0 {
            mounted.base = buf.remaining();
            mounted.tracker.begin(buf.chunk());
        }
        let offset = mounted.base.saturating_sub(buf.remaining());
        mounted.tracker.decode_start(&location.to_string(), offset);
        mounted.depth += 1;
        Some(mounted.depth == 1)
    });
    let Some(root) = root else {
        return f(buf);
    };

    let span = Span;
    let result = f(buf);
    drop(span);

    // Close the span.
    let remaining = buf.remaining();
    let path = MOUNTED.with(|mounted| {
        let mut mounted = mounted.borrow_mut();
        let mounted = mounted.as_mut()?;
        let offset = mounted.base.saturating_sub(remaining);
        let outcome = match &result {
            Ok(value) => Outcome::Ok(inspect(value)),
            Err(err) => Outcome::Err(err),
        };
        mounted.tracker.decode_end(offset, outcome);
        if root {
            mounted.tracker.finish()
        } else {
            None
        }
    });

    match (result, path) {
        (Err(source), Some(path)) if !matches!(source, Error::Traced { .. }) => {
            Err(Error::Traced {
                path,
                source: Box::new(source),
            })
        }
        (result, _) => result,
    }
}

/// Runs `f` with an extra label on the decode it performs.
///
/// Outside of a traced decode this simply calls `f`.
pub fn refine<T>(
    location: impl Display,
    f: impl FnOnce() -> Result<T, Error>,
) -> Result<T, Error> {
    if !is_active() {
        return f();
    }
    let opened = MOUNTED.with(|mounted| match mounted.borrow_mut().as_mut() {
        Some(mounted) if mounted.depth > 0 => {
            mounted.tracker.refine_start(&location.to_string());
            true
        }
        _ => false,
    });
    if !opened {
        return f();
    }

    let result = f();
    MOUNTED.with(|mounted| {
        if let Some(mounted) = mounted.borrow_mut().as_mut() {
            let outcome = match &result {
                Ok(_) => Outcome::Ok(None),
                Err(err) => Outcome::Err(err),
            };
            mounted.tracker.refine_end(outcome);
        }
    });
    result
}
