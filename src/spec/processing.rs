//! Processing-specifier parsing.
//!
//! A processing specifier declares each port's transfer discipline with one
//! character per port, inputs before a slash and outputs after it:
//! `h`/`H` push, `l`/`L` pull, `a`/`A` agnostic. The last character of a
//! section is replicated for any further ports, extra characters are
//! ignored, and a missing slash makes the single section apply to both
//! directions.

use crate::report::ErrorHandler;

/// The transfer discipline of a single port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PortKind {
    /// Polymorphic; resolved to push or pull when the graph is finalized.
    #[default]
    Agnostic,
    /// Upstream-driven transfer; the sender initiates.
    Push,
    /// Downstream-driven transfer; the puller initiates.
    Pull,
}

/// Outcome of reading one processing code character.
enum Code {
    Kind(PortKind),
    /// End of the section (`/` or end of string); the cursor stays put.
    End,
    /// An unknown character, reported and skipped.
    Bad,
}

fn next_code(bytes: &[u8], pos: &mut usize, errh: &dyn ErrorHandler) -> Code {
    match bytes.get(*pos) {
        Some(b'h' | b'H') => {
            *pos += 1;
            Code::Kind(PortKind::Push)
        }
        Some(b'l' | b'L') => {
            *pos += 1;
            Code::Kind(PortKind::Pull)
        }
        Some(b'a' | b'A') => {
            *pos += 1;
            Code::Kind(PortKind::Agnostic)
        }
        Some(b'/') | None => Code::End,
        Some(&c) => {
            errh.error(&format!("bad processing code character {:?}", c as char));
            *pos += 1;
            Code::Bad
        }
    }
}

/// Resolve a processing specifier into per-port kinds.
///
/// Returns one kind per input port and one per output port. Once a section
/// ends (or hits an unknown character, which is reported), the last valid
/// kind is latched and replicated for the remaining ports; an empty
/// specifier yields all-agnostic.
pub fn processing_vector(
    spec: &str,
    ninputs: usize,
    noutputs: usize,
    errh: &dyn ErrorHandler,
) -> (Vec<PortKind>, Vec<PortKind>) {
    let bytes = spec.as_bytes();
    let mut pos = 0;
    let mut val = PortKind::Agnostic;

    let mut inputs = Vec::with_capacity(ninputs);
    let mut halted = false;
    for _ in 0..ninputs {
        if !halted {
            match next_code(bytes, &mut pos, errh) {
                Code::Kind(k) => val = k,
                Code::End | Code::Bad => halted = true,
            }
        }
        inputs.push(val);
    }

    // seek the output section; without a slash the whole spec is reused
    while bytes.get(pos).is_some_and(|&c| c != b'/') {
        pos += 1;
    }
    if pos >= bytes.len() {
        pos = 0;
    } else {
        pos += 1;
    }

    let mut outputs = Vec::with_capacity(noutputs);
    let mut halted = false;
    for _ in 0..noutputs {
        if !halted {
            match next_code(bytes, &mut pos, errh) {
                Code::Kind(k) => val = k,
                Code::End | Code::Bad => halted = true,
            }
        }
        outputs.push(val);
    }

    (inputs, outputs)
}
