//! Error types and handling for the MCP server.
//!
//! This module defines a unified error type for everything outside a single
//! tool call: registry start-up and transports. Failures inside a call
//! never reach it; the dispatcher turns them into protocol errors.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the tools domain, e.g. a duplicate registration.
    #[error("Tool error: {0}")]
    Tool(#[from] crate::domains::tools::ToolError),

    /// Error raised by a transport.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transport::TransportError;
    use crate::domains::tools::ToolError;

    #[test]
    fn test_transport_error_converts() {
        let err: Error = TransportError::init("stdio closed").into();
        assert!(err.to_string().starts_with("Transport error: "));
    }

    #[test]
    fn test_tool_error_converts() {
        let err: Error = ToolError::AlreadyRegistered("word_count".into()).into();
        assert_eq!(err.to_string(), "Tool error: Tool already registered: word_count");
    }
}
