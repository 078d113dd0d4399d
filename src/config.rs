//! Session configuration module

use std::path::PathBuf;

use clap::Parser;
use jiff::tz::TimeZone;

/// Till session configuration
#[derive(Debug, Parser)]
#[command(name = "tillpoint", about = "Point-of-sale session", long_about = None)]
pub struct SessionConfig {
    /// Base URL of the transaction backend, without a trailing slash
    #[arg(long, env = "POS_BACKEND_URL", default_value = "http://localhost:8080")]
    pub backend_url: String,

    /// Path of the JSON session store file; in-memory when unset
    #[arg(long, env = "POS_STORE_PATH")]
    pub store_path: Option<PathBuf>,

    /// IANA time zone the till operates in
    #[arg(long, env = "POS_TIME_ZONE", default_value = "Asia/Jakarta")]
    pub time_zone: String,
}

impl SessionConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    /// Resolve the configured time zone name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a known IANA time zone.
    pub fn resolve_time_zone(&self) -> Result<TimeZone, jiff::Error> {
        TimeZone::get(&self.time_zone)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_apply_without_arguments() -> TestResult {
        let config = SessionConfig::try_parse_from(["tillpoint"])?;

        assert_eq!(config.backend_url, "http://localhost:8080");
        assert_eq!(config.store_path, None);
        assert_eq!(config.time_zone, "Asia/Jakarta");
        config.resolve_time_zone()?;

        Ok(())
    }

    #[test]
    fn flags_override_defaults() -> TestResult {
        let config = SessionConfig::try_parse_from([
            "tillpoint",
            "--backend-url",
            "http://10.0.0.5:9000",
            "--store-path",
            "/tmp/session.json",
            "--time-zone",
            "Asia/Makassar",
        ])?;

        assert_eq!(config.backend_url, "http://10.0.0.5:9000");
        assert_eq!(config.store_path, Some(PathBuf::from("/tmp/session.json")));
        config.resolve_time_zone()?;

        Ok(())
    }

    #[test]
    fn unknown_time_zone_fails_resolution() -> TestResult {
        let config =
            SessionConfig::try_parse_from(["tillpoint", "--time-zone", "Asia/Nowhere"])?;

        assert!(config.resolve_time_zone().is_err());

        Ok(())
    }
}
