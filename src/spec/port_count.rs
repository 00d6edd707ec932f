//! Port-count specifier parsing using winnow.
//!
//! A port-count specifier gives acceptable input and output port ranges,
//! separated by a slash:
//!
//! | spec | meaning |
//! |---|---|
//! | `"1/1"` | exactly one input and one output |
//! | `"1-2/0"` | one or two inputs, no outputs |
//! | `"1/-6"` | one input, up to six outputs |
//! | `"2-/-"` | at least two inputs, any number of outputs |
//! | `"3"` | exactly three inputs and outputs (no slash: both ranges) |
//! | `"1-/="` | at least one input and the same number of outputs |
//!
//! The empty string is not a specifier; it selects the legacy
//! `notify_ninputs`/`notify_noutputs` negotiation and is handled before
//! parsing.

use crate::error::{Error, Result};
use winnow::ascii::digit1;
use winnow::combinator::opt;
use winnow::error::ContextError;
use winnow::Parser;

type WResult<T> = std::result::Result<T, ContextError>;

/// A parsed port-count specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortCountSpec {
    /// Minimum number of input ports.
    pub in_lo: usize,
    /// Maximum number of input ports.
    pub in_hi: usize,
    /// Minimum number of output ports.
    pub out_lo: usize,
    /// Maximum number of output ports.
    pub out_hi: usize,
    /// Force the output count equal to the input count (`"/="`).
    pub equal: bool,
}

impl PortCountSpec {
    /// Parse a non-empty port-count specifier.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut input = spec;
        port_count(&mut input).map_err(|_| Error::Parse(format!("bad port count {spec:?}")))
    }

    /// Constrain a requested `(ninputs, noutputs)` pair to this specifier.
    ///
    /// Each count is clamped into its range; with `equal`, the output
    /// count is forced to the clamped input count.
    pub fn constrain(&self, ninputs: usize, noutputs: usize) -> (usize, usize) {
        let ninputs = clamp(ninputs, self.in_lo, self.in_hi);
        let noutputs = if self.equal {
            ninputs
        } else {
            clamp(noutputs, self.out_lo, self.out_hi)
        };
        (ninputs, noutputs)
    }
}

/// Clamp without the `lo <= hi` requirement of `Ord::clamp`; a spec like
/// `"6-2"` is nonsense but must not panic.
fn clamp(n: usize, lo: usize, hi: usize) -> usize {
    if n < lo {
        lo
    } else if n > hi {
        hi
    } else {
        n
    }
}

fn port_count(input: &mut &str) -> WResult<PortCountSpec> {
    let (in_lo, in_hi) = range(input)?;
    if input.is_empty() {
        // no slash: the single range applies to both directions
        return Ok(PortCountSpec {
            in_lo,
            in_hi,
            out_lo: in_lo,
            out_hi: in_hi,
            equal: false,
        });
    }
    let _ = '/'.parse_next(input)?;
    if opt('=').parse_next(input)?.is_some() {
        if !input.is_empty() {
            return Err(ContextError::new());
        }
        return Ok(PortCountSpec {
            in_lo,
            in_hi,
            out_lo: 0,
            out_hi: usize::MAX,
            equal: true,
        });
    }
    let (out_lo, out_hi) = range(input)?;
    if !input.is_empty() {
        return Err(ContextError::new());
    }
    Ok(PortCountSpec {
        in_lo,
        in_hi,
        out_lo,
        out_hi,
        equal: false,
    })
}

/// Parse one range: `N`, `N-`, `N-M`, `-M`, `-`, or nothing (meaning `0`).
fn range(input: &mut &str) -> WResult<(usize, usize)> {
    if input.is_empty() {
        return Ok((0, 0));
    }
    let lo = if input.starts_with('-') {
        0
    } else {
        number(input)?
    };
    if opt('-').parse_next(input)?.is_some() {
        let hi = opt(number).parse_next(input)?;
        Ok((lo, hi.unwrap_or(usize::MAX)))
    } else {
        Ok((lo, lo))
    }
}

fn number(input: &mut &str) -> WResult<usize> {
    let digits: &str = digit1.parse_next(input)?;
    digits.parse().map_err(|_| ContextError::new())
}
