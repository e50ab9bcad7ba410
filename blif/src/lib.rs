//! Reader for hierarchical BLIF netlists.
//!
//! Importing runs in stages. The text is first split into logical lines and tokenized. Next, every `.model` header
//! is scanned to create a skeleton module with its ports, so that `.subckt` lines can refer to models defined later
//! in the file. Then the bodies are parsed and each module is lowered into a [`Network`]. Finally the networks are
//! checked, the `EXDC` network is attached to its owner, the root network is chosen and its hierarchy is checked
//! for cycles.
//!
//! Any failure is reported through a [`Diagnostics`] channel and ends the import.

use abc_mini_netlist::{Diagnostics, Network, emit_fault};

mod preparse;
mod line;
mod module;
mod manager;
mod lower;
mod link;

use manager::Manager;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ParseError {
    #[error("line {line}: {message}")]
    Line { line: usize, message: String },
    #[error("{0}")]
    Input(String),
}

impl ParseError {
    pub(crate) fn at(line: usize, message: impl Into<String>) -> Self {
        ParseError::Line { line, message: message.into() }
    }
}

/// An import failure. The message is the one emitted through the diagnostics channel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ImportError {
    message: String,
}

impl ImportError {
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AbcResult {
    Ok = 0,
    Error = 1,
}

#[derive(Debug, Clone, Default)]
pub struct Importer<'a> {
    filename: Option<String>,
    diagnostics: Option<&'a Diagnostics>,
}

impl<'a> Importer<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name of the file the text was read from. It names the design and becomes the root's spec path.
    pub fn filename(self, filename: impl Into<String>) -> Self {
        Self { filename: Some(filename.into()), ..self }
    }

    /// Reports faults to `diagnostics` instead of the process-wide channel.
    pub fn diagnostics(self, diagnostics: &'a Diagnostics) -> Self {
        Self { diagnostics: Some(diagnostics), ..self }
    }

    pub fn import(&self, text: &str) -> Result<Network, ImportError> {
        let global;
        let diagnostics = match self.diagnostics {
            Some(diagnostics) => diagnostics,
            None => {
                global = abc_mini_netlist::global();
                &global
            }
        };
        let mut manager = Manager::new(self.filename.as_deref());
        let design = match manager.read(text) {
            Ok(design) => design,
            Err(err) => {
                tracing::debug!(stage = ?manager.stage(), "import failed");
                manager.set_error(&err);
                let message = manager.error().unwrap_or_default().to_owned();
                emit_fault!(diagnostics, "{message}");
                return Err(ImportError { message });
            }
        };
        let ltl_properties = manager.take_ltl_properties();
        drop(manager);
        link::link(design, ltl_properties, self.filename.as_deref(), diagnostics)
    }
}

/// Imports `text` using the process-wide diagnostics channel.
pub fn import(text: &str) -> Result<Network, ImportError> {
    Importer::new().import(text)
}

/// Imports `text` into `network`, which must be empty. `network` is only filled in when the result is
/// [`AbcResult::Ok`].
///
/// Panics if `text` is `None` or `network` is already populated.
pub fn read_blif(text: Option<&str>, network: &mut Option<Network>) -> AbcResult {
    let Some(text) = text else {
        panic!("read_blif requires input text");
    };
    assert!(network.is_none(), "read_blif requires an empty output network");
    match import(text) {
        Ok(root) => {
            *network = Some(root);
            AbcResult::Ok
        }
        Err(_) => AbcResult::Error,
    }
}
