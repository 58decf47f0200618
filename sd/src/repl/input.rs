//! Line input for the REPL

use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

/// Source of user input lines
pub trait LineSource {
    /// Show `prompt` and read one line
    ///
    /// Returns `None` when the user closed the input (Ctrl-D) or interrupted it (Ctrl-C).
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Terminal input with line editing and history
pub struct RustylineSource {
    editor: DefaultEditor,
}

impl RustylineSource {
    pub fn new() -> Result<Self> {
        debug!("RustylineSource::new: called");
        let editor = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;
        Ok(Self { editor })
    }
}

impl LineSource for RustylineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.trim());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) => {
                debug!("RustylineSource::read_line: interrupted");
                Ok(None)
            }
            Err(ReadlineError::Eof) => {
                debug!("RustylineSource::read_line: eof");
                Ok(None)
            }
            Err(err) => Err(eyre::eyre!("Readline error: {}", err)),
        }
    }
}
