//! Server validation errors as human-readable lines.
//!
//! The save endpoint returns `{ "<field path>": ["message", ...] }`. Each
//! message becomes one line, annotated with the outermost and nearest
//! ancestor that survive dropping the last two path segments:
//!
//! | Ancestors left | Line                        |
//! |----------------|-----------------------------|
//! | 2 or more      | `message (topmost, nearest)` |
//! | 1              | `message (nearest)`          |
//! | 0              | `message`                    |

use std::fmt;

use einvoice_model::FieldPath;
use indexmap::IndexMap;
use serde::Serialize;

/// Flat, path-keyed error map in server order.
pub type ValidationErrors = IndexMap<String, Vec<String>>;

/// One rendered error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayLine {
    pub path: FieldPath,
    pub message: String,
    /// Parenthetical ancestor context, without the parentheses.
    pub context: Option<String>,
}

impl fmt::Display for DisplayLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(f, "{} ({context})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Turns server errors into display lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationPresenter;

impl ValidationPresenter {
    pub fn present(errors: &ValidationErrors) -> Vec<DisplayLine> {
        let mut lines = Vec::new();
        for (raw_path, messages) in errors {
            let path = FieldPath::new(raw_path.as_str());
            let context = ancestor_context(&path);
            for message in messages {
                lines.push(DisplayLine {
                    path: path.clone(),
                    message: message.clone(),
                    context: context.clone(),
                });
            }
        }
        tracing::debug!(
            paths = errors.len(),
            lines = lines.len(),
            "Presented validation errors"
        );
        lines
    }

    /// Parse a server error body and present it.
    pub fn present_json(body: &str) -> serde_json::Result<Vec<DisplayLine>> {
        let errors: ValidationErrors = serde_json::from_str(body)?;
        Ok(Self::present(&errors))
    }
}

fn ancestor_context(path: &FieldPath) -> Option<String> {
    match path.display_ancestors().as_slice() {
        [] => None,
        [nearest] => Some((*nearest).to_string()),
        [topmost, .., nearest] => Some(format!("{topmost}, {nearest}")),
    }
}
