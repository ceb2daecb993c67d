/// Result of a toggle key press, as observed by the host shell.
///
/// There is no transient starting/stopping state: the transition is one
/// remote round trip sequence from the caller's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// A matching running entry was found and stopped.
    Stopped,
    /// No matching entry was running; a new one was created.
    Started,
    /// Configuration or resolution blocked the transition; nothing was
    /// mutated remotely.
    Rejected,
}
