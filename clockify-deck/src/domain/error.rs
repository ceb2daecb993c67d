use thiserror::Error;

/// Failure taxonomy of the engine.
///
/// These never cross the public component boundary as `Err` values — public
/// operations return values, empty results or tri-states, and the error is
/// logged where it occurs. The enum exists so internal layers (the outbound
/// port, the connection check) have one typed vocabulary.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Malformed server URL or API key; no remote call was attempted.
    #[error("invalid configuration: {0}")]
    ConfigurationInvalid(String),
    /// The identity check failed after connecting.
    #[error("authentication failed")]
    AuthenticationFailed,
    /// A configured name had zero or several matches.
    #[error("unable to resolve {0}")]
    ResolutionFailed(String),
    /// Network or service error, caught at the call boundary.
    #[error("transport failure: {0}")]
    TransportFailure(String),
    /// The remote store changed underneath us (e.g. stopping a vanished
    /// entry). Non-fatal.
    #[error("remote inconsistency: {0}")]
    RemoteInconsistency(String),
}
