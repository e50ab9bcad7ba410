//! Fault reporting side channel.
//!
//! A [`Diagnostics`] channel holds an ordered list of fault handlers. A fresh channel contains only the default
//! handler, which prints the message to standard output. The first custom handler installed replaces the default one;
//! every later one is appended, and emitted messages fan out to all handlers in registration order.
//!
//! Besides channels passed around explicitly, there is one process-wide channel, manipulated through
//! [`install_fault_handler`] and [`reset_fault_handlers`]. It is shared mutable state: installing or resetting
//! handlers while an import is running on another thread is the caller's responsibility to serialize.

use std::{
    fmt::{self, Display},
    sync::{Arc, LazyLock, Mutex, PoisonError},
};

use crate::GrowVec;

pub type FaultHandler = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Clone)]
enum Handler {
    Default,
    Custom(FaultHandler),
}

impl Handler {
    fn call(&self, message: &str) {
        match self {
            Handler::Default => default_fault_handler(message),
            Handler::Custom(handler) => handler(message),
        }
    }
}

pub fn default_fault_handler(message: &str) {
    println!("abc-mini error: {message}");
}

/// Where a fault was emitted from; see the `debug-info` feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: &'static str,
    pub function: &'static str,
    pub line: u32,
}

fn quote_if_necessary(text: &str) -> String {
    if text.contains([' ', '\t', '\r', '\n']) { format!("\"{text}\"") } else { text.to_owned() }
}

impl Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", quote_if_necessary(self.file), quote_if_necessary(self.function), self.line)
    }
}

#[derive(Clone)]
pub struct Diagnostics {
    handlers: GrowVec<Handler>,
}

impl Diagnostics {
    pub fn new() -> Self {
        let mut handlers = GrowVec::new();
        handlers.push(Handler::Default);
        Diagnostics { handlers }
    }

    pub fn install(&mut self, handler: impl Fn(&str) + Send + Sync + 'static) {
        self.install_shared(Arc::new(handler))
    }

    pub fn install_shared(&mut self, handler: FaultHandler) {
        if self.has_only_default() {
            self.handlers[0] = Handler::Custom(handler);
        } else {
            self.handlers.push(Handler::Custom(handler));
        }
    }

    pub fn reset(&mut self) {
        *self = Diagnostics::new();
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn has_only_default(&self) -> bool {
        self.handlers.len() == 1 && matches!(self.handlers[0], Handler::Default)
    }

    /// Passes `message` to every handler, in registration order.
    pub fn emit(&self, message: &str) {
        tracing::debug!(target: "abc_mini::fault", "{message}");
        for handler in &self.handlers {
            handler.call(message);
        }
    }

    /// Like [`Diagnostics::emit`], prefixing the message with `location` when built with the `debug-info` feature.
    pub fn emit_at(&self, location: SourceLocation, message: impl Display) {
        if cfg!(feature = "debug-info") {
            self.emit(&format!("{location}: {message}"));
        } else {
            self.emit(&message.to_string());
        }
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics").field("handlers", &self.handlers.len()).finish()
    }
}

/// Formats and emits a fault through a [`Diagnostics`] channel, recording the call site.
#[macro_export]
macro_rules! emit_fault {
    ($diagnostics:expr, $($arg:tt)+) => {
        $diagnostics.emit_at(
            $crate::SourceLocation { file: file!(), function: module_path!(), line: line!() },
            format_args!($($arg)+),
        )
    };
}

static GLOBAL: LazyLock<Mutex<Diagnostics>> = LazyLock::new(|| Mutex::new(Diagnostics::new()));

pub fn install_fault_handler(handler: impl Fn(&str) + Send + Sync + 'static) {
    GLOBAL.lock().unwrap_or_else(PoisonError::into_inner).install(handler)
}

pub fn reset_fault_handlers() {
    GLOBAL.lock().unwrap_or_else(PoisonError::into_inner).reset()
}

/// Returns a snapshot of the process-wide channel.
///
/// The lock is released before the snapshot is used, so handlers may themselves install further handlers without
/// deadlocking; such changes only affect later snapshots.
pub fn global() -> Diagnostics {
    GLOBAL.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

#[cfg(test)]
mod test {
    use std::sync::{Arc, Mutex};

    use super::{Diagnostics, SourceLocation};

    fn recorder(log: &Arc<Mutex<Vec<String>>>, tag: &'static str) -> impl Fn(&str) + Send + Sync + 'static {
        let log = log.clone();
        move |message| log.lock().unwrap().push(format!("{tag}:{message}"))
    }

    #[test]
    fn test_first_install_replaces_default() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.has_only_default());
        diagnostics.install(recorder(&log, "h1"));
        assert_eq!(diagnostics.handler_count(), 1);
        assert!(!diagnostics.has_only_default());
        diagnostics.emit("x");
        assert_eq!(*log.lock().unwrap(), vec!["h1:x".to_owned()]);
    }

    #[test]
    fn test_fan_out_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut diagnostics = Diagnostics::new();
        diagnostics.install(recorder(&log, "h1"));
        diagnostics.install(recorder(&log, "h2"));
        assert_eq!(diagnostics.handler_count(), 2);
        diagnostics.emit("x");
        assert_eq!(*log.lock().unwrap(), vec!["h1:x".to_owned(), "h2:x".to_owned()]);
    }

    #[test]
    fn test_reset() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut diagnostics = Diagnostics::new();
        diagnostics.install(recorder(&log, "h1"));
        diagnostics.install(recorder(&log, "h2"));
        diagnostics.reset();
        assert!(diagnostics.has_only_default());
        diagnostics.reset();
        assert!(diagnostics.has_only_default());
        assert_eq!(diagnostics.handler_count(), 1);
        diagnostics.emit("only the default handler sees this");
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_emit_fault_macro() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut diagnostics = Diagnostics::new();
        diagnostics.install(recorder(&log, "h"));
        crate::emit_fault!(diagnostics, "network {:?} failed", "top");
        let log = log.lock().unwrap();
        assert_eq!(log.len(), 1);
        assert!(log[0].starts_with("h:"));
        assert!(log[0].ends_with("network \"top\" failed"));
    }

    #[test]
    fn test_source_location_display() {
        let location = SourceLocation { file: "blif/src/link.rs", function: "abc_mini_blif::link", line: 36 };
        assert_eq!(location.to_string(), "blif/src/link.rs:abc_mini_blif::link:36");
        let location = SourceLocation { file: "my designs/top.rs", function: "read\tall", line: 7 };
        assert_eq!(location.to_string(), "\"my designs/top.rs\":\"read\tall\":7");
    }

    #[test]
    fn test_emit_at() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut diagnostics = Diagnostics::new();
        diagnostics.install(recorder(&log, "h"));
        let location = SourceLocation { file: "a b.rs", function: "f", line: 3 };
        diagnostics.emit_at(location, format_args!("bad {}", 1));
        let expected = if cfg!(feature = "debug-info") { "h:\"a b.rs\":f:3: bad 1" } else { "h:bad 1" };
        assert_eq!(*log.lock().unwrap(), vec![expected.to_owned()]);
    }

    #[cfg(feature = "debug-info")]
    #[test]
    fn test_emit_fault_macro_prefix() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut diagnostics = Diagnostics::new();
        diagnostics.install(recorder(&log, "h"));
        let line = line!() + 1;
        crate::emit_fault!(diagnostics, "oops");
        let expected = format!("h:{}:{}:{line}: oops", file!(), module_path!());
        assert_eq!(*log.lock().unwrap(), vec![expected]);
    }
}
