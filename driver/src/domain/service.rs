//! Service-manager commands and the output markers used to judge them.
//!
//! Service managers report no structured status through the remote channel,
//! so success is inferred from substrings of their output. The markers are
//! coupled to the exact phrasing of one service manager and are not portable.

/// Substring the init script prints when the service failed to come up.
pub const START_FAILURE_MARKER: &str = "BAD.";

/// Suffix that marks a failed stop.
///
/// Init scripts usually print `done` on success, so this reads inverted. It is
/// kept exactly as the acceptance suite has always evaluated it until the
/// intended meaning is confirmed.
pub const STOP_FAILURE_SUFFIX: &str = "done";

pub const DEFAULT_SERVICE_NAME: &str = "neo4j-service";

/// Predicates that turn raw service-manager output into an outcome.
pub trait ServiceMarkers {
    /// `true` if start output signals that the service did not start.
    fn is_start_failure(&self, output: &str) -> bool;
    /// `true` if stop output signals that the service stopped.
    fn is_stop_success(&self, output: &str) -> bool;
}

/// A SysV init script under `/etc/init.d`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitScript {
    name: String,
}

impl InitScript {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn path(&self) -> String {
        format!("/etc/init.d/{}", self.name)
    }

    #[must_use]
    pub fn start_command(&self) -> String {
        format!("sudo {} start", self.path())
    }

    #[must_use]
    pub fn stop_command(&self) -> String {
        format!("sudo {} stop", self.path())
    }
}

impl Default for InitScript {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_NAME)
    }
}

impl ServiceMarkers for InitScript {
    fn is_start_failure(&self, output: &str) -> bool {
        output.contains(START_FAILURE_MARKER)
    }

    // Evaluated on the raw captured output, trailing whitespace included.
    fn is_stop_success(&self, output: &str) -> bool {
        !output.ends_with(STOP_FAILURE_SUFFIX)
    }
}
