//! Text behaviors with `${field}` placeholders
//!
//! Placeholders are resolved against the record the behavior is invoked
//! on, never against the bag that declared it. A placeholder naming a
//! behavior field invokes that behavior with no arguments.

use std::cell::Cell;
use std::sync::OnceLock;

use record_compose::{Behavior, Record, RecordError, Value};
use regex_lite::Regex;

/// Errors raised while parsing a template.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TemplateError {
    #[error("unterminated placeholder at byte {0}")]
    Unterminated(usize),

    #[error("empty placeholder at byte {0}")]
    EmptyPlaceholder(usize),

    #[error("invalid field name in placeholder: `{0}`")]
    InvalidPlaceholder(String),
}

/// Deepest chain of template behaviors rendered through placeholders.
pub const MAX_RENDER_DEPTH: usize = 64;

thread_local! {
    static RENDER_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Counts one nested behavior call for the current thread.
struct DepthGuard;

impl DepthGuard {
    fn enter(field: &str) -> Result<Self, RecordError> {
        RENDER_DEPTH.with(|depth| {
            if depth.get() >= MAX_RENDER_DEPTH {
                return Err(RecordError::RecursionLimit {
                    field: field.to_string(),
                    limit: MAX_RENDER_DEPTH,
                });
            }
            depth.set(depth.get() + 1);
            Ok(DepthGuard)
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        RENDER_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Field(String),
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]*)\}").expect("placeholder pattern"))
}

fn field_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("field name pattern"))
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in placeholder_re().captures_iter(source) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            push_literal(&mut segments, source, last, whole.start())?;

            let name = name.as_str().trim();
            if name.is_empty() {
                return Err(TemplateError::EmptyPlaceholder(whole.start()));
            }
            if !field_name_re().is_match(name) {
                return Err(TemplateError::InvalidPlaceholder(name.to_string()));
            }
            segments.push(Segment::Field(name.to_string()));
            last = whole.end();
        }
        push_literal(&mut segments, source, last, source.len())?;

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Field names referenced by placeholders, in order of appearance.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Field(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Render against `this`.
    ///
    /// Behavior fields that reach back into each other fail with
    /// [`RecordError::RecursionLimit`] once the chain passes
    /// [`MAX_RENDER_DEPTH`].
    pub fn render(&self, this: &Record) -> Result<String, RecordError> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(name) => {
                    let value = match this.require(name)? {
                        Value::Behavior(behavior) => {
                            let _guard = DepthGuard::enter(name)?;
                            behavior.call(this, &[])?
                        }
                        other => other.clone(),
                    };
                    out.push_str(&value.to_string());
                }
            }
        }
        Ok(out)
    }

    /// Wrap as a behavior. Call arguments are ignored.
    pub fn into_behavior(self) -> Behavior {
        Behavior::from_fn(move |this| self.render(this).map(Value::Text))
    }
}

fn push_literal(
    segments: &mut Vec<Segment>,
    source: &str,
    start: usize,
    end: usize,
) -> Result<(), TemplateError> {
    let text = &source[start..end];
    if let Some(pos) = text.find("${") {
        return Err(TemplateError::Unterminated(start + pos));
    }
    if !text.is_empty() {
        segments.push(Segment::Literal(text.to_string()));
    }
    Ok(())
}
