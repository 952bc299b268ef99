//! Role capability contract and request/response values
//!
//! Provides the [`Role`] trait for swappable capability implementations,
//! plus the [`Request`] and [`Response`] values that cross the contract.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One delegated operation with named arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    operation: String,
    args: Map<String, Value>,
}

impl Request {
    /// Create a request for an operation with no arguments
    #[inline]
    #[must_use]
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            args: Map::new(),
        }
    }

    /// Attach a named argument
    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    /// Operation name
    #[inline]
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Look up a named argument
    #[inline]
    #[must_use]
    pub fn arg(&self, key: &str) -> Option<&Value> {
        self.args.get(key)
    }

    /// Look up a named argument as an unsigned integer
    #[must_use]
    pub fn arg_u64(&self, key: &str) -> Option<u64> {
        self.arg(key).and_then(Value::as_u64)
    }
}

/// Outcome of a performed operation
///
/// Narration is returned to the caller rather than printed; the caller
/// decides which sink, if any, receives it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    summary: String,
    details: Vec<String>,
    data: Map<String, Value>,
}

impl Response {
    /// Create a response with a one-line summary
    #[inline]
    #[must_use]
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            details: Vec::new(),
            data: Map::new(),
        }
    }

    /// Append a narration line
    #[must_use]
    pub fn with_detail(mut self, line: impl Into<String>) -> Self {
        self.details.push(line.into());
        self
    }

    /// Insert a structured payload entry
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// One-line outcome
    #[inline]
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Narration lines beyond the summary, in order
    #[inline]
    #[must_use]
    pub fn details(&self) -> &[String] {
        &self.details
    }

    /// Structured payload
    #[inline]
    #[must_use]
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// All printable lines: summary first, then details
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.summary.as_str()).chain(self.details.iter().map(String::as_str))
    }

    /// Fold `other` into this response
    ///
    /// `other`'s summary and details become trailing details; `other`'s
    /// payload entries win on key collision.
    #[must_use]
    pub fn merge(mut self, other: Response) -> Self {
        self.details.push(other.summary);
        self.details.extend(other.details);
        for (key, value) in other.data {
            self.data.insert(key, value);
        }
        self
    }
}

/// A swappable implementation of a named capability
///
/// Implementations are self-contained: no variant may reach into another
/// variant's state. Roles are immutable once constructed; anything mutable
/// lives with the caller and travels through [`Request`] arguments.
pub trait Role: fmt::Debug + Send + Sync {
    /// Stable identifying key for this role
    fn key(&self) -> &str;

    /// Perform one operation
    ///
    /// # Errors
    /// [`RoleError::Unsupported`] when the operation is outside this role's
    /// capability set.
    fn perform(&self, request: &Request) -> Result<Response, RoleError>;
}

/// Role execution errors
#[derive(Debug, thiserror::Error)]
pub enum RoleError {
    /// Operation outside the role's capability set
    #[error("operation not supported: {operation}")]
    Unsupported {
        /// The rejected operation name
        operation: String,
    },

    /// Arguments missing or malformed
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Operation attempted but failed
    #[error("operation failed: {0}")]
    Failed(String),
}

impl RoleError {
    /// Create an unsupported-operation error
    #[inline]
    #[must_use]
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder() {
        let request = Request::new("dispense").with_arg("stock", 3_u64);

        assert_eq!(request.operation(), "dispense");
        assert_eq!(request.arg_u64("stock"), Some(3));
        assert!(request.arg("missing").is_none());
    }

    #[test]
    fn response_lines_summary_first() {
        let response = Response::new("done")
            .with_detail("step one")
            .with_detail("step two");

        let lines: Vec<&str> = response.lines().collect();
        assert_eq!(lines, vec!["done", "step one", "step two"]);
    }

    #[test]
    fn response_merge_appends_and_overwrites() {
        let first = Response::new("turned knob").with_data("next", "has_candy");
        let second = Response::new("candy dropped")
            .with_detail("one left")
            .with_data("next", "no_coin");

        let merged = first.merge(second);
        let lines: Vec<&str> = merged.lines().collect();
        assert_eq!(lines, vec!["turned knob", "candy dropped", "one left"]);
        assert_eq!(merged.data().get("next").and_then(|v| v.as_str()), Some("no_coin"));
    }

    #[test]
    fn role_error_display() {
        let err = RoleError::unsupported("fly");
        assert!(err.to_string().contains("fly"));
    }
}
