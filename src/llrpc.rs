//! Low-level RPC command conventions.
//!
//! LLRPCs are a numbered side channel parallel to the named handlers:
//! a caller passes a command number and a data value to an element's
//! [`llrpc`](crate::element::Element::llrpc) hook and gets a result back,
//! with no string formatting in between. Unknown commands return
//! [`Error::UnknownCommand`](crate::error::Error::UnknownCommand) so
//! callers can fall back.

use crate::element::Element;
use crate::error::Result;
use std::any::Any;

/// An LLRPC command number.
pub type Command = u32;

/// Command-number bit marking commands that read element state.
pub const DIRECTION_READ: Command = 1 << 30;

/// Command-number bit marking commands that write element state.
pub const DIRECTION_WRITE: Command = 1 << 31;

/// Whether `command` reads element state.
pub const fn is_read(command: Command) -> bool {
    command & DIRECTION_READ != 0
}

/// Whether `command` writes element state.
pub const fn is_write(command: Command) -> bool {
    command & DIRECTION_WRITE != 0
}

/// Execute an element's LLRPC from within the same process.
///
/// Elements never call each other's [`llrpc`](Element::llrpc) hooks
/// directly; restricted environments may need setup around the call. In
/// this runtime the address space is shared, so this is a straight
/// passthrough.
pub fn local_llrpc(element: &mut dyn Element, command: Command, data: &mut dyn Any) -> Result<()> {
    element.llrpc(command, data)
}
