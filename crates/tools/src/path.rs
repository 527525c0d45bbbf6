//! Query paths for the command line
//!
//! A path is `/`-separated steps applied left to right:
//!
//! | step     | combinator                |
//! |----------|---------------------------|
//! | `*`      | `children()`              |
//! | `**`     | `descendants_inclusive()` |
//! | `@name`  | `attribute(name)`         |
//! | `text()` | `text()`                  |
//! | `name`   | `filter_by_name(name)`    |
//!
//! Projections (`@name`, `text()`) leave nodes behind, so they may only be
//! the last step.

use query::{NodeSet, ValueSet};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Children,
    Descendants,
    Name(String),
    Attribute(String),
    Text,
}

impl Step {
    fn is_projection(&self) -> bool {
        matches!(self, Step::Attribute(_) | Step::Text)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("Empty step at position {0}")]
    EmptyStep(usize),

    #[error("Projection `{0}` must be the last step")]
    ProjectionNotLast(String),

    #[error("Attribute step needs a name")]
    MissingAttributeName,
}

pub fn parse_path(path: &str) -> Result<Vec<Step>, PathError> {
    let path = path.trim().trim_start_matches('/');
    if path.is_empty() {
        return Ok(Vec::new());
    }

    let mut steps: Vec<Step> = Vec::new();
    let mut previous = "";
    for (position, raw) in path.split('/').enumerate() {
        if steps.last().is_some_and(Step::is_projection) {
            return Err(PathError::ProjectionNotLast(previous.to_string()));
        }
        previous = raw.trim();
        let step = match previous {
            "" => return Err(PathError::EmptyStep(position)),
            "*" => Step::Children,
            "**" => Step::Descendants,
            "text()" => Step::Text,
            "@" => return Err(PathError::MissingAttributeName),
            other => match other.strip_prefix('@') {
                Some(name) => Step::Attribute(name.to_string()),
                None => Step::Name(other.to_string()),
            },
        };
        steps.push(step);
    }
    Ok(steps)
}

/// What a path evaluates to: still nodes, or projected values
pub enum Selection {
    Nodes(NodeSet),
    Values(ValueSet),
}

/// Build the combinator chain for `steps`. Nothing is evaluated here.
pub fn apply(set: NodeSet, steps: &[Step]) -> Selection {
    let mut current = set;
    for step in steps {
        current = match step {
            Step::Children => current.children(),
            Step::Descendants => current.descendants_inclusive(),
            Step::Name(name) => current.filter_by_name(name.as_str()),
            Step::Attribute(name) => return Selection::Values(current.attribute(name.as_str())),
            Step::Text => return Selection::Values(current.text()),
        };
    }
    Selection::Nodes(current)
}
