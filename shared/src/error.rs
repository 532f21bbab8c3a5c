use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("select both a start and an end point before routing")]
    PreconditionNotMet,
    #[error("route service unreachable: {0}")]
    Transport(String),
    #[error("route service answered with status {0}")]
    Status(u16),
    #[error("malformed route response: {0}")]
    MalformedResponse(String),
    #[error("failed to encode route query: {0}")]
    Encode(String),
}

impl QueryError {
    /// Errors the user sees as the "invalid request" banner.
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            QueryError::Transport(_) | QueryError::Status(_) | QueryError::MalformedResponse(_)
        )
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::MalformedResponse(err.to_string())
    }
}
