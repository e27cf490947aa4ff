//! Call-site resolution by stack walking

use backtrace::Symbol;

/// Source location and function name of a frame on the current call stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerLocation {
    pub file: Option<String>,
    pub line: Option<u32>,
    pub function: String,
}

impl CallerLocation {
    /// Resolve the frame `skip` levels above the caller of this function.
    ///
    /// `capture(0)` describes the function that called `capture`, `capture(1)` its caller,
    /// and so on. Inlined frames count as frames of their own when debug info reports
    /// them. Returns `None` when the stack is shallower than requested or symbols are
    /// unavailable.
    #[inline(never)]
    pub fn capture(skip: usize) -> Option<CallerLocation> {
        let mut anchored = false;
        let mut remaining = skip;
        let mut found = None;

        backtrace::trace(|frame| {
            backtrace::resolve_frame(frame, |symbol| {
                if found.is_some() {
                    return;
                }
                let Some(function) = symbol_function(symbol) else {
                    return;
                };
                if !anchored {
                    anchored = is_anchor(symbol, &function);
                    return;
                }
                if remaining > 0 {
                    remaining -= 1;
                    return;
                }
                found = Some(CallerLocation {
                    file: symbol.filename().map(|path| path.display().to_string()),
                    line: symbol.lineno(),
                    function,
                });
            });
            found.is_none()
        });

        found
    }
}

/// Demangled names of `CallerLocation::capture` under legacy and v0 mangling
const ANCHOR_NAMES: [&str; 2] = ["CallerLocation::capture", "CallerLocation>::capture"];

fn is_anchor(symbol: &Symbol, function: &str) -> bool {
    let capture_addr = CallerLocation::capture as usize;
    symbol.addr().map(|addr| addr as usize) == Some(capture_addr) || is_anchor_name(function)
}

fn is_anchor_name(function: &str) -> bool {
    ANCHOR_NAMES.iter().any(|anchor| function.ends_with(anchor))
}

fn symbol_function(symbol: &Symbol) -> Option<String> {
    let name = format!("{:#}", symbol.name()?);
    Some(strip_hash(&name).to_string())
}

/// Drop a trailing `::h<16 hex digits>` left by legacy symbol mangling
fn strip_hash(name: &str) -> &str {
    match name.rsplit_once("::h") {
        Some((head, hash)) if hash.len() == 16 && hash.chars().all(|c| c.is_ascii_hexdigit()) => {
            head
        }
        _ => name,
    }
}
