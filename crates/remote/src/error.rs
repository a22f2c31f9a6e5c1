/// Errors surfaced by the remote collaborator clients.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The catalog has no tour under the requested id.
    #[error("Tour not found: {0}")]
    NotFound(String),

    /// The request could not be sent or timed out.
    #[error("Request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body could not be decoded.
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RemoteError::Decode(err.to_string())
        } else {
            RemoteError::Request(err.to_string())
        }
    }
}
