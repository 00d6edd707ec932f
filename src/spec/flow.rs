//! Flow-code parsing and reachability analysis.
//!
//! A flow code describes how packets travel *inside* an element: which
//! input ports can reach which output ports. It consists of an input
//! port-code sequence and an output port-code sequence separated by `/`.
//!
//! A port code is a case-sensitive ASCII letter, the character `#`, or a
//! bracketed set such as `[abz]` or its complement `[^bc]`. Two port codes
//! match iff their letter sets intersect, or both contain `#` at the same
//! numeric port index; `#` never matches a letter. The last code of each
//! sequence is replicated for any further ports, and extra codes are
//! ignored.
//!
//! Examples: `"x/x"` (any input reaches any output, the default),
//! `"xy/x"` (only input 0 reaches the outputs), `"x/y"` (decoupled),
//! `"#/#"` (input *K* reaches output *K* only), `"#/[^#]"` (input *K*
//! reaches every output except *K*).

use crate::report::ErrorHandler;

/// The canonical complete flow code: any input reaches any output.
pub const COMPLETE_FLOW: &str = "x/x";

/// A 256-bit port-code mask.
///
/// Letters occupy their byte values; the `#` of port *p* occupies bit
/// `p + 128`, so hashes only match at equal port indices. `[^...]`
/// complements the full 256-bit space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CodeMask {
    bits: [u64; 4],
}

impl CodeMask {
    fn none() -> Self {
        Self { bits: [0; 4] }
    }

    fn set(&mut self, bit: usize) {
        if bit < 256 {
            self.bits[bit / 64] |= 1 << (bit % 64);
        }
    }

    fn negate(&mut self) {
        for word in &mut self.bits {
            *word = !*word;
        }
    }

    fn intersects(&self, other: &Self) -> bool {
        self.bits
            .iter()
            .zip(&other.bits)
            .any(|(a, b)| a & b != 0)
    }
}

/// Advance past one port code without interpreting it.
fn skip_code(bytes: &[u8], pos: &mut usize) {
    match bytes.get(*pos) {
        Some(b'/') | None => {}
        Some(b'[') => {
            *pos += 1;
            while !matches!(bytes.get(*pos), Some(b']') | None) {
                *pos += 1;
            }
            if bytes.get(*pos).is_some() {
                *pos += 1;
            }
        }
        Some(_) => *pos += 1,
    }
}

/// Read the port code at `pos` into a mask for the given port index.
///
/// At the end of a sequence the cursor backs up to the last code, which is
/// re-read for every further port (the replication rule). Invalid
/// characters are reported but do not abort the traversal; a missing `]`
/// is reported and parsing stops at the end of the string.
fn next_code(bytes: &[u8], pos: &mut usize, port: usize, errh: &dyn ErrorHandler) -> CodeMask {
    // back up to the last code when the sequence is exhausted
    if matches!(bytes.get(*pos), Some(b'/') | None) {
        if *pos == 0 {
            return CodeMask::none();
        }
        if bytes[*pos - 1] == b']' {
            *pos -= 2;
            while *pos > 0 && bytes[*pos] != b'[' {
                *pos -= 1;
            }
        } else {
            *pos -= 1;
        }
    }

    let mut code = CodeMask::none();
    match bytes.get(*pos) {
        Some(b'[') => {
            let mut negated = false;
            if bytes.get(*pos + 1) == Some(&b'^') {
                negated = true;
                *pos += 1;
            }
            *pos += 1;
            while let Some(&c) = bytes.get(*pos) {
                if c == b']' {
                    break;
                }
                if c.is_ascii_alphabetic() {
                    code.set(c as usize);
                } else if c == b'#' {
                    code.set(port + 128);
                } else {
                    errh.error(&format!(
                        "flow code: invalid character {:?}",
                        c as char
                    ));
                }
                *pos += 1;
            }
            if negated {
                code.negate();
            }
            if bytes.get(*pos).is_none() {
                errh.error("flow code: missing ']'");
                return code;
            }
            *pos += 1;
        }
        Some(&c) if c.is_ascii_alphabetic() => {
            code.set(c as usize);
            *pos += 1;
        }
        Some(b'#') => {
            code.set(port + 128);
            *pos += 1;
        }
        Some(&c) => {
            errh.error(&format!("flow code: invalid character {:?}", c as char));
            *pos += 1;
        }
        None => {}
    }
    code
}

/// Analyze internal packet flow with respect to one port.
///
/// Returns one entry per complementary port: entry *j* is true iff packets
/// can travel between `port` on the queried side and port *j* on the other
/// side, according to `code`. An out-of-range `port` yields all-false; an
/// empty or [`COMPLETE_FLOW`] code yields all-true; a code with a missing
/// or bad `/` is reported and yields all-false.
///
/// The result is symmetric: `port_flow(code, false, i, ..)[j]` equals
/// `port_flow(code, true, j, ..)[i]`.
pub fn port_flow(
    code: &str,
    is_output: bool,
    port: usize,
    nports: usize,
    nother: usize,
    errh: &dyn ErrorHandler,
) -> Vec<bool> {
    if port >= nports {
        return vec![false; nother];
    }
    if code.is_empty() || code == COMPLETE_FLOW {
        return vec![true; nother];
    }

    let bytes = code.as_bytes();
    let in_sec;
    let out_sec;
    match code.find('/') {
        Some(i) if i + 1 < bytes.len() && bytes[i + 1] != b'/' => {
            in_sec = &bytes[..i];
            out_sec = &bytes[i + 1..];
        }
        _ => {
            errh.error("flow code: missing or bad '/'");
            return vec![false; nother];
        }
    }

    let (from_sec, to_sec) = if is_output {
        (out_sec, in_sec)
    } else {
        (in_sec, out_sec)
    };

    let mut pos = 0;
    for _ in 0..port {
        skip_code(from_sec, &mut pos);
    }
    let from_code = next_code(from_sec, &mut pos, port, errh);

    let mut travels = vec![false; nother];
    let mut to_pos = 0;
    for (j, reachable) in travels.iter_mut().enumerate() {
        let to_code = next_code(to_sec, &mut to_pos, j, errh);
        *reachable = from_code.intersects(&to_code);
    }
    travels
}
