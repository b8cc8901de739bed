//! Research request: the three inputs forwarded to the external script.
//!
//! Breadth and depth are opaque parameters whose meaning is defined by the
//! script; this layer only guarantees they are within the documented bounds
//! before they reach the script's stdin.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Inclusive bounds for the breadth parameter
pub const BREADTH_MIN: u8 = 1;
pub const BREADTH_MAX: u8 = 10;

/// Inclusive bounds for the depth parameter
pub const DEPTH_MIN: u8 = 1;
pub const DEPTH_MAX: u8 = 5;

/// A validated research request
///
/// Immutable once constructed; discarded after the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchRequest {
    /// Research topic (free text, single line)
    pub topic: String,

    /// Research breadth (1-10, recommended 2-10)
    pub breadth: u8,

    /// Research depth (1-5)
    pub depth: u8,
}

impl ResearchRequest {
    /// Default topic shown by the input surface
    pub const DEFAULT_TOPIC: &'static str = "Education in India";

    /// Create a validated request
    ///
    /// Rejects out-of-range breadth/depth and topics containing newline
    /// characters, which would corrupt the three-line stdin framing.
    /// An empty topic is allowed but logged as a warning.
    pub fn new(topic: impl Into<String>, breadth: u8, depth: u8) -> Result<Self, RequestError> {
        let topic = topic.into();

        if topic.contains('\n') || topic.contains('\r') {
            return Err(RequestError::TopicContainsNewline);
        }
        if !(BREADTH_MIN..=BREADTH_MAX).contains(&breadth) {
            return Err(RequestError::BreadthOutOfRange { got: breadth });
        }
        if !(DEPTH_MIN..=DEPTH_MAX).contains(&depth) {
            return Err(RequestError::DepthOutOfRange { got: depth });
        }
        if topic.trim().is_empty() {
            warn!("research topic is empty; the script may produce nothing useful");
        }

        Ok(Self {
            topic,
            breadth,
            depth,
        })
    }

    /// Serialize to the script's stdin protocol: exactly three lines,
    /// topic then breadth then depth, each newline-terminated.
    pub fn stdin_payload(&self) -> String {
        format!("{}\n{}\n{}\n", self.topic, self.breadth, self.depth)
    }
}

impl Default for ResearchRequest {
    fn default() -> Self {
        Self {
            topic: Self::DEFAULT_TOPIC.to_string(),
            breadth: 4,
            depth: 2,
        }
    }
}

/// Request validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("topic must not contain newline characters")]
    TopicContainsNewline,

    #[error("breadth must be between {BREADTH_MIN} and {BREADTH_MAX}, got {got}")]
    BreadthOutOfRange { got: u8 },

    #[error("depth must be between {DEPTH_MIN} and {DEPTH_MAX}, got {got}")]
    DepthOutOfRange { got: u8 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_framing() {
        let request = ResearchRequest::new("Education in India", 4, 2).unwrap();
        assert_eq!(request.stdin_payload(), "Education in India\n4\n2\n");
    }

    #[test]
    fn test_payload_framing_across_bounds() {
        for breadth in BREADTH_MIN..=BREADTH_MAX {
            for depth in DEPTH_MIN..=DEPTH_MAX {
                let request = ResearchRequest::new("t", breadth, depth).unwrap();
                assert_eq!(
                    request.stdin_payload(),
                    format!("t\n{}\n{}\n", breadth, depth)
                );
            }
        }
    }

    #[test]
    fn test_breadth_bounds() {
        assert!(matches!(
            ResearchRequest::new("t", 0, 2),
            Err(RequestError::BreadthOutOfRange { got: 0 })
        ));
        assert!(matches!(
            ResearchRequest::new("t", 11, 2),
            Err(RequestError::BreadthOutOfRange { got: 11 })
        ));
        assert!(ResearchRequest::new("t", 1, 2).is_ok());
        assert!(ResearchRequest::new("t", 10, 2).is_ok());
    }

    #[test]
    fn test_depth_bounds() {
        assert!(matches!(
            ResearchRequest::new("t", 4, 0),
            Err(RequestError::DepthOutOfRange { got: 0 })
        ));
        assert!(matches!(
            ResearchRequest::new("t", 4, 6),
            Err(RequestError::DepthOutOfRange { got: 6 })
        ));
        assert!(ResearchRequest::new("t", 4, 1).is_ok());
        assert!(ResearchRequest::new("t", 4, 5).is_ok());
    }

    #[test]
    fn test_newline_topic_rejected() {
        assert_eq!(
            ResearchRequest::new("line one\nline two", 4, 2),
            Err(RequestError::TopicContainsNewline)
        );
        assert_eq!(
            ResearchRequest::new("carriage\rreturn", 4, 2),
            Err(RequestError::TopicContainsNewline)
        );
    }

    #[test]
    fn test_empty_topic_allowed() {
        let request = ResearchRequest::new("", 4, 2).unwrap();
        assert_eq!(request.stdin_payload(), "\n4\n2\n");
    }

    #[test]
    fn test_defaults() {
        let request = ResearchRequest::default();
        assert_eq!(request.topic, "Education in India");
        assert_eq!(request.breadth, 4);
        assert_eq!(request.depth, 2);
    }
}
