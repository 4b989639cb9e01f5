//! Caller attribution
//!
//! Every entry names the component (module path) and operation (function) that
//! issued the logging call. The default resolver walks the stack with the
//! `backtrace` crate, finds its own frame and reads the frame that sits a
//! fixed number of frames above it.
//!
//! # Required call depth
//!
//! Counting from the resolver, the logger's call chain is:
//!
//! | depth | frame |
//! |-------|-------|
//! | 0 | `CallerResolver::resolve` |
//! | 1 | `Logger::emit` |
//! | 2 | `Logger::log` / `Logger::log_http` |
//! | 3 | the external caller |
//!
//! which is [`CALLER_DEPTH`]. Each internal frame is `#[inline(never)]`.
//! Adding a wrapper function between a public entry point and `emit` shifts
//! attribution by one frame; convenience wrappers are therefore macros.

use std::fmt;

/// Sentinel reported when attribution is unavailable
pub const UNKNOWN: &str = "unknown";

/// Frames between the resolver and the external caller
pub const CALLER_DEPTH: usize = 3;

/// Component and operation a log call originated from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub component: String,
    pub operation: String,
}

impl Caller {
    pub fn new(component: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            operation: operation.into(),
        }
    }

    /// The `("unknown", "unknown")` attribution
    pub fn unknown() -> Self {
        Self::new(UNKNOWN, UNKNOWN)
    }

    pub fn is_unknown(&self) -> bool {
        self.component == UNKNOWN && self.operation == UNKNOWN
    }

    /// Split a fully-qualified symbol at its last `::`.
    ///
    /// Decorations are dropped first: a leading `0x… - ` address, the
    /// compiler hash (`::h0123456789abcdef`), crate disambiguators
    /// (`std[e28293b1aa0f68bd]`) and trailing generic arguments. A name
    /// without any separator has an unknown component.
    ///
    /// ```
    /// use ndjson_logger::Caller;
    ///
    /// let caller = Caller::from_symbol("my_app::http::handlers::get_user");
    /// assert_eq!(caller.component, "my_app::http::handlers");
    /// assert_eq!(caller.operation, "get_user");
    /// ```
    pub fn from_symbol(symbol: &str) -> Self {
        let symbol = clean_symbol(symbol);
        if symbol.is_empty() {
            return Self::unknown();
        }

        match symbol.rfind("::") {
            Some(idx) if idx > 0 && idx + 2 < symbol.len() => {
                Self::new(&symbol[..idx], &symbol[idx + 2..])
            }
            _ => Self::new(UNKNOWN, symbol),
        }
    }
}

impl Default for Caller {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.component, self.operation)
    }
}

/// Capability that maps a stack depth to a [`Caller`].
///
/// Implementations must never panic; unavailable information degrades to
/// [`Caller::unknown`].
pub trait CallerResolver: Send + Sync {
    fn resolve(&self, skip: usize) -> Caller;
}

/// Resolver that always reports `unknown`/`unknown`
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopResolver;

impl CallerResolver for NoopResolver {
    fn resolve(&self, _skip: usize) -> Caller {
        Caller::unknown()
    }
}

/// Resolver backed by the `backtrace` crate
///
/// Symbol resolution happens on every call, which is by far the most
/// expensive step of an emission. Loggers that do not need attribution can
/// use [`NoopResolver`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktraceResolver;

impl CallerResolver for BacktraceResolver {
    #[inline(never)]
    fn resolve(&self, skip: usize) -> Caller {
        let mut frames: Vec<Vec<String>> = Vec::new();
        let mut anchor = None;

        backtrace::trace(|frame| {
            let mut symbols = Vec::new();
            backtrace::resolve_frame(frame, |symbol| {
                if let Some(name) = symbol.name() {
                    symbols.push(format!("{:#}", name));
                }
            });

            if anchor.is_none() && symbols.iter().any(|s| is_resolver_frame(s)) {
                anchor = Some(frames.len());
            }
            frames.push(symbols);

            // stop once the requested frame is collected
            anchor.map_or(true, |idx: usize| frames.len() <= idx.saturating_add(skip))
        });

        caller_from_frames(&frames, skip)
    }
}

/// Pick the frame `skip` levels above the resolver's own frame.
///
/// Each frame lists its symbols innermost first; more than one symbol means
/// functions were inlined into that frame, and the innermost one is the code
/// that made the call.
pub(crate) fn caller_from_frames<S: AsRef<str>>(frames: &[Vec<S>], skip: usize) -> Caller {
    let anchor = frames
        .iter()
        .position(|symbols| symbols.iter().any(|s| is_resolver_frame(s.as_ref())));

    anchor
        .and_then(|idx| idx.checked_add(skip))
        .and_then(|idx| frames.get(idx))
        .and_then(|symbols| symbols.first())
        .map(|symbol| Caller::from_symbol(symbol.as_ref()))
        .unwrap_or_else(Caller::unknown)
}

fn is_resolver_frame(symbol: &str) -> bool {
    let symbol = clean_symbol(symbol);
    symbol.contains("BacktraceResolver as ") && symbol.ends_with("CallerResolver>::resolve")
}

fn clean_symbol(raw: &str) -> String {
    let mut symbol = raw.trim();
    if let Some((address, rest)) = symbol.split_once(" - ") {
        if address.starts_with("0x") {
            symbol = rest.trim();
        }
    }
    let symbol = strip_crate_tags(strip_hash(symbol));
    strip_generic_args(&symbol).to_string()
}

fn strip_hash(symbol: &str) -> &str {
    match symbol.rfind("::h") {
        Some(idx) => {
            let hash = &symbol[idx + 3..];
            if hash.len() == 16 && hash.bytes().all(|b| b.is_ascii_hexdigit()) {
                &symbol[..idx]
            } else {
                symbol
            }
        }
        None => symbol,
    }
}

/// Drop `[0123abcd]` crate disambiguators
fn strip_crate_tags(symbol: &str) -> String {
    let mut out = String::with_capacity(symbol.len());
    let mut rest = symbol;

    while let Some(start) = rest.find('[') {
        let tail = &rest[start + 1..];
        match tail.find(']') {
            Some(end) if end > 0 && tail[..end].bytes().all(|b| b.is_ascii_hexdigit()) => {
                out.push_str(&rest[..start]);
                rest = &tail[end + 1..];
            }
            _ => {
                out.push_str(&rest[..=start]);
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Drop a trailing `::<…>` turbofish
fn strip_generic_args(symbol: &str) -> &str {
    if !symbol.ends_with('>') {
        return symbol;
    }

    let bytes = symbol.as_bytes();
    let mut depth = 0usize;
    for idx in (0..bytes.len()).rev() {
        match bytes[idx] {
            // `->` in fn pointer types is not a bracket
            b'>' if idx == 0 || bytes[idx - 1] != b'-' => depth += 1,
            b'<' => {
                if depth <= 1 {
                    return symbol[..idx].strip_suffix("::").unwrap_or(symbol);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    symbol
}
