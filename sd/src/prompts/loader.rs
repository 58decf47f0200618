//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use super::embedded;

/// Template name of the assistant's system prompt
pub const SCHEDULER_TEMPLATE: &str = "scheduler";

/// Errors raised while loading or rendering a prompt
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Prompt template not found: {0}")]
    NotFound(String),

    #[error("Failed to read prompt {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render template {name}: {message}")]
    Render { name: String, message: String },
}

/// Context for rendering the scheduler prompt
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    /// Name of the slot lookup tool
    pub tool_name: String,
    /// Days with a schedule, in weekday order
    pub days: Vec<String>,
    /// Day used in the prompt's example answer
    pub example_day: String,
}

impl PromptContext {
    pub fn new(tool_name: impl Into<String>, days: Vec<String>) -> Self {
        let tool_name = tool_name.into();
        debug!(%tool_name, day_count = days.len(), "PromptContext::new: called");
        let example_day = days.first().cloned().unwrap_or_else(|| "monday".to_string());
        Self {
            tool_name,
            days,
            example_day,
        }
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (e.g., `.slotdesk/prompts/`)
    user_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a prompt loader rooted at `root`
    ///
    /// Overrides are looked up in `{root}/.slotdesk/prompts/`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        debug!(?root, "PromptLoader::new: called");
        let user_dir = root.join(".slotdesk/prompts");

        let user_dir_exists = user_dir.exists();
        debug!(?user_dir, %user_dir_exists, "PromptLoader::new: checking override directory");

        Self {
            hbs: Self::engine(),
            user_dir: if user_dir_exists { Some(user_dir) } else { None },
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            user_dir: None,
        }
    }

    /// Prompts are plain text, not HTML
    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `.slotdesk/prompts/{name}.pmt`
    /// 2. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String, PromptError> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found in user override");
                return std::fs::read_to_string(&path).map_err(|source| PromptError::Read { path, source });
            }
            debug!(?path, "PromptLoader::load_template: not found in user override");
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!(%name, "PromptLoader::load_template: found in embedded");
            return Ok(content.to_string());
        }

        debug!(%name, "PromptLoader::load_template: not found anywhere");
        Err(PromptError::NotFound(name.to_string()))
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &PromptContext) -> Result<String, PromptError> {
        debug!(%template_name, tool_name = %context.tool_name, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;
        info!("Rendering template '{}'", template_name);

        self.hbs
            .render_template(&template, context)
            .map_err(|e| PromptError::Render {
                name: template_name.to_string(),
                message: e.to_string(),
            })
    }

    /// Render the assistant's system prompt
    pub fn scheduler_prompt(&self, context: &PromptContext) -> Result<String, PromptError> {
        self.render(SCHEDULER_TEMPLATE, context)
    }
}
