pub mod app;
pub mod conversation;
pub mod domain;
pub mod gateway;
pub mod scene;
pub mod session;

pub mod config {
    use anyhow::Context;
    use std::time::Duration;

    pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/chat";
    pub const DEFAULT_GREETING: &str = "Hello! I'm your investment advisory assistant. \
Tell me about your goals: how much you'd like to invest, for how long, and how you feel about risk.";

    #[derive(Debug, Clone, Default)]
    pub struct Settings {
        pub api_url: Option<String>,
        pub timeout: Option<Duration>,
        pub greeting: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let timeout =
                parse_timeout_secs(std::env::var("ADVISOR_TIMEOUT_SECS").ok().as_deref())?;

            Ok(Self {
                api_url: non_empty_var("ADVISOR_API_URL"),
                timeout,
                greeting: non_empty_var("ADVISOR_GREETING"),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
            })
        }

        pub fn api_url(&self) -> &str {
            self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
        }

        pub fn greeting(&self) -> &str {
            self.greeting.as_deref().unwrap_or(DEFAULT_GREETING)
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|s| !s.trim().is_empty())
    }

    /// Unset or blank means no timeout; anything else must be a positive whole number.
    pub fn parse_timeout_secs(raw: Option<&str>) -> anyhow::Result<Option<Duration>> {
        let Some(s) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        let secs = s
            .parse::<u64>()
            .with_context(|| format!("ADVISOR_TIMEOUT_SECS is not a number: {s}"))?;
        anyhow::ensure!(secs > 0, "ADVISOR_TIMEOUT_SECS must be greater than 0");
        Ok(Some(Duration::from_secs(secs)))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn unset_timeout_means_none() {
            assert_eq!(parse_timeout_secs(None).unwrap(), None);
            assert_eq!(parse_timeout_secs(Some("  ")).unwrap(), None);
        }

        #[test]
        fn parses_timeout_seconds() {
            assert_eq!(
                parse_timeout_secs(Some(" 15 ")).unwrap(),
                Some(Duration::from_secs(15))
            );
        }

        #[test]
        fn rejects_non_numeric_timeout() {
            let err = parse_timeout_secs(Some("soon")).unwrap_err();
            assert!(format!("{err:#}").contains("ADVISOR_TIMEOUT_SECS"));
        }

        #[test]
        fn rejects_zero_timeout() {
            assert!(parse_timeout_secs(Some("0")).is_err());
        }

        #[test]
        fn default_endpoint_is_api_chat() {
            assert_eq!(Settings::default().api_url(), "http://localhost:8000/api/chat");
        }
    }
}
