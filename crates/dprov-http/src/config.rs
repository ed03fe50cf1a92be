use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for [`ReqwestTransport`](crate::ReqwestTransport).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Whole-request timeout in seconds. `0` disables it.
    pub timeout_secs: u64,
    /// Connection establishment timeout in seconds. `0` disables it.
    pub connect_timeout_secs: u64,
    /// `User-Agent` sent when the request does not set one.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: concat!("dprov/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl TransportConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        (self.connect_timeout_secs > 0).then(|| Duration::from_secs(self.connect_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = TransportConfig::default();
        assert_eq!(c.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(c.connect_timeout(), Some(Duration::from_secs(10)));
        assert!(c.user_agent.starts_with("dprov/"));
    }

    #[test]
    fn zero_disables_timeouts() {
        let c = TransportConfig {
            timeout_secs: 0,
            connect_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(c.timeout(), None);
        assert_eq!(c.connect_timeout(), None);
    }
}
