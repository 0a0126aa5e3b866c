//! Operator identity for audit fields.
//!
//! The name is resolved in this order: the configured override, the name the
//! host application reports, the `USER` / `USERNAME` environment variables,
//! and finally `"Unknown User"`. The host step runs on the host context, so
//! only it lives behind the `HostUsername` trait; the rest is plain data that
//! handlers can read from any thread.

use std::env;

const UNKNOWN_USER: &str = "Unknown User";

/// The name of the operator signed in to the host application.
///
/// Runs on the host context, like `ElementPicker`.
pub trait HostUsername {
    /// `None` when the host has no signed-in operator to report.
    fn host_username(&mut self) -> Option<String>;
}

/// Host source for documents opened outside an interactive application.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHostUsername;

impl HostUsername for NoHostUsername {
    fn host_username(&mut self) -> Option<String> {
        None
    }
}

/// Supplies the parts of the operator name that do not need the host.
pub trait UsernameProvider: Send + Sync {
    /// Override that takes precedence over the host-reported name.
    fn configured(&self) -> Option<String>;

    /// Name used when neither the override nor the host supplies one.
    fn fallback(&self) -> String;

    /// Combines the override, the name the host reported and the fallback.
    fn resolve(&self, reported: Option<String>) -> String {
        self.configured()
            .or_else(|| reported.filter(|name| !name.trim().is_empty()))
            .unwrap_or_else(|| self.fallback())
    }
}

/// Override from configuration, with the OS user as fallback.
#[derive(Debug, Clone, Default)]
pub struct SystemUsername {
    configured: Option<String>,
}

impl SystemUsername {
    pub fn new(configured: Option<String>) -> Self {
        Self {
            configured: configured.filter(|name| !name.trim().is_empty()),
        }
    }
}

impl UsernameProvider for SystemUsername {
    fn configured(&self) -> Option<String> {
        self.configured.clone()
    }

    fn fallback(&self) -> String {
        ["USER", "USERNAME"]
            .iter()
            .filter_map(|key| env::var(key).ok())
            .find(|name| !name.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_USER.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_name_wins_over_host() {
        let users = SystemUsername::new(Some("inspector".into()));
        assert_eq!(users.resolve(Some("host-user".into())), "inspector");
    }

    #[test]
    fn host_name_wins_over_os_user() {
        let users = SystemUsername::new(None);
        assert_eq!(users.resolve(Some("host-user".into())), "host-user");
    }

    #[test]
    fn blank_names_fall_through() {
        let users = SystemUsername::new(Some("   ".into()));
        assert_eq!(users.configured(), None);
        assert_eq!(users.resolve(Some(" ".into())), users.fallback());
        assert!(!users.fallback().trim().is_empty());
    }

    #[test]
    fn default_host_source_reports_nothing() {
        assert_eq!(NoHostUsername.host_username(), None);
    }
}
