//! Cache keys.
//!
//! A key is an ordered list of segments: the resource name first, then the
//! parameters that select one instance of it. Invalidation matches whole
//! segments, so `members/42` covers `members/42/{"page":1}` but not
//! `members/421`.

use std::fmt;

use serde::Serialize;

/// Ordered, segment-wise comparable cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    segments: Vec<String>,
}

impl QueryKey {
    /// Key for a resource family with no parameters yet.
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            segments: vec![resource.into()],
        }
    }

    /// Append one parameter segment.
    pub fn with(mut self, segment: impl fmt::Display) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    /// Append a structured parameter, encoded as compact JSON.
    ///
    /// Field order follows the type's declaration order, so equal parameter
    /// values always produce the same segment.
    pub fn with_params<T: Serialize + ?Sized>(self, params: &T) -> Self {
        let encoded = serde_json::to_string(params).unwrap_or_default();
        self.with(encoded)
    }

    pub fn resource(&self) -> &str {
        self.segments.first().map(String::as_str).unwrap_or_default()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segment-wise prefix test.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}
