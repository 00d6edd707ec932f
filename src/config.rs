//! Configuration-string splitting using winnow.
//!
//! An element's configuration string is a comma-separated argument list:
//!
//! ```text
//! 10.0.0.1, LIMIT 500, /* burst */ 8
//! ```
//!
//! # Syntax
//!
//! - Arguments are separated by top-level commas
//! - `/* ... */` and `// ...` comments count as whitespace
//! - Commas inside `"..."`, `'...'`, `(...)`, `[...]`, and `{...}` do not
//!   split
//! - Leading and trailing whitespace is trimmed; empty arguments are dropped

use winnow::combinator::opt;
use winnow::error::ContextError;
use winnow::token::{any, take_till, take_until, take_while};
use winnow::Parser;

type WResult<T> = std::result::Result<T, ContextError>;

/// Split a configuration string into arguments at top-level commas.
///
/// Comments are removed and each argument is trimmed. Arguments that are
/// empty after trimming are dropped, so `"a,,b"` yields two arguments.
///
/// # Example
///
/// ```rust
/// let args = crossbar::config::split_args("A, 42 /* answer */, C");
/// assert_eq!(args, vec!["A", "42", "C"]);
/// ```
pub fn split_args(s: &str) -> Vec<String> {
    let mut input = s;
    let mut args = Vec::new();
    loop {
        let Ok(arg) = argument(&mut input) else {
            break;
        };
        let arg = arg.trim().to_string();
        if !arg.is_empty() {
            args.push(arg);
        }
        let comma: WResult<char> = ','.parse_next(&mut input);
        if input.is_empty() || comma.is_err() {
            break;
        }
    }
    args
}

/// Join arguments back into a display configuration string.
///
/// A single argument is returned as-is; multiple arguments are joined with
/// `", "`. Splitting the result again yields the same argument vector.
pub fn join_args(args: &[String]) -> String {
    match args {
        [] => String::new(),
        [one] => one.clone(),
        many => many.join(", "),
    }
}

/// Remove comments from an argument and trim surrounding whitespace.
pub fn uncomment(s: &str) -> String {
    let mut input = s;
    let mut out = String::new();
    while !input.is_empty() {
        if let Some(rest) = input.strip_prefix(',') {
            out.push(',');
            input = rest;
            continue;
        }
        match piece(&mut input) {
            Ok(p) => out.push_str(&p),
            Err(_) => break,
        }
    }
    out.trim().to_string()
}

/// Extract the value of a keyword argument.
///
/// Returns `Some(value)` when `arg` is `keyword` followed by whitespace and
/// a value (or by nothing, for a bare keyword). Keywords are matched
/// case-sensitively.
pub fn keyword_value(arg: &str, keyword: &str) -> Option<String> {
    let rest = arg.strip_prefix(keyword)?;
    if rest.is_empty() {
        return Some(String::new());
    }
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return None;
    }
    Some(rest.trim().to_string())
}

/// Parse one argument: everything up to a top-level comma or end of input.
fn argument(input: &mut &str) -> WResult<String> {
    let mut out = String::new();
    while !input.is_empty() && !input.starts_with(',') {
        out.push_str(&piece(input)?);
    }
    Ok(out)
}

/// Parse one lexical piece: a comment (replaced by a space), a quoted
/// string, a bracketed group, or a run of plain characters.
fn piece(input: &mut &str) -> WResult<String> {
    if input.starts_with("/*") {
        return block_comment(input);
    }
    if input.starts_with("//") {
        return line_comment(input);
    }
    if input.starts_with('"') || input.starts_with('\'') {
        return quoted(input);
    }
    if input.starts_with(['(', '[', '{']) {
        return group(input);
    }
    plain(input)
}

/// Parse a `/* ... */` comment; an unterminated comment swallows the rest
/// of the input. Comments read back as a single space.
fn block_comment(input: &mut &str) -> WResult<String> {
    let _ = "/*".parse_next(input)?;
    let body: WResult<&str> = take_until(0.., "*/").parse_next(input);
    if body.is_ok() {
        let _ = "*/".parse_next(input)?;
    } else {
        let _: &str = take_while(0.., |_: char| true).parse_next(input)?;
    }
    Ok(" ".to_string())
}

/// Parse a `// ...` comment running to the end of the line.
fn line_comment(input: &mut &str) -> WResult<String> {
    let _ = "//".parse_next(input)?;
    let _: &str = take_till(0.., '\n').parse_next(input)?;
    Ok(" ".to_string())
}

/// Parse a quoted string, quotes preserved. An unterminated quote runs to
/// the end of the input.
fn quoted(input: &mut &str) -> WResult<String> {
    let quote: char = any.parse_next(input)?;
    let body: &str = take_till(0.., quote).parse_next(input)?;
    let _ = opt(quote).parse_next(input)?;
    let mut out = String::with_capacity(body.len() + 2);
    out.push(quote);
    out.push_str(body);
    out.push(quote);
    Ok(out)
}

/// Parse a bracketed group; commas inside do not split arguments. An
/// unterminated group runs to the end of the input.
fn group(input: &mut &str) -> WResult<String> {
    let open: char = any.parse_next(input)?;
    let mut close = match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    };
    let mut out = String::new();
    out.push(open);
    loop {
        if input.is_empty() {
            return Ok(out);
        }
        if input.starts_with(close) {
            let _ = close.parse_next(input)?;
            out.push(close);
            return Ok(out);
        }
        if input.starts_with(',') {
            let _ = ','.parse_next(input)?;
            out.push(',');
            continue;
        }
        out.push_str(&piece(input)?);
    }
}

/// Parse a run of characters with no lexical significance, or a single
/// character that did not start a comment, quote, or group.
fn plain(input: &mut &str) -> WResult<String> {
    let run: &str =
        take_till(0.., [',', '"', '\'', '(', '[', '{', '/']).parse_next(input)?;
    if !run.is_empty() {
        return Ok(run.to_string());
    }
    any.map(|c: char| c.to_string()).parse_next(input)
}
