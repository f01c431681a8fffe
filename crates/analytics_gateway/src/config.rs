/// Environment name that enables tracking. Every other value makes the
/// gateway a no-op.
pub const PROD_ENVIRONMENT: &str = "prod";

pub const ENVIRONMENT_ENV_VAR: &str = "NEXT_PUBLIC_CB_ENVIRONMENT";
pub const API_KEY_ENV_VAR: &str = "MANICODE_POSTHOG_API_KEY";
pub const HOST_ENV_VAR: &str = "MANICODE_POSTHOG_HOST";
pub const DEFAULT_HOST_URL: &str = "https://us.i.posthog.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsConfig {
    pub api_key: String,
    pub host_url: String,
    pub env_name: String,
}

impl AnalyticsConfig {
    /// Resolves the config from process environment variables. `None` when no
    /// API key is set, which downstream treats as analytics-off.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let api_key = non_blank(lookup(API_KEY_ENV_VAR))?;
        let host_url =
            non_blank(lookup(HOST_ENV_VAR)).unwrap_or_else(|| DEFAULT_HOST_URL.to_string());
        let env_name = non_blank(lookup(ENVIRONMENT_ENV_VAR)).unwrap_or_else(|| "dev".to_string());

        Some(Self {
            api_key,
            host_url,
            env_name,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn missing_api_key_yields_none() {
        assert_eq!(AnalyticsConfig::from_lookup(lookup_from(&[])), None);
        assert_eq!(
            AnalyticsConfig::from_lookup(lookup_from(&[(API_KEY_ENV_VAR, "   ")])),
            None
        );
    }

    #[test]
    fn api_key_alone_fills_in_defaults() {
        let config = AnalyticsConfig::from_lookup(lookup_from(&[(API_KEY_ENV_VAR, "phc_key")]))
            .expect("config should resolve");

        assert_eq!(config.api_key, "phc_key");
        assert_eq!(config.host_url, DEFAULT_HOST_URL);
        assert_eq!(config.env_name, "dev");
    }

    #[test]
    fn explicit_host_and_environment_are_honored() {
        let config = AnalyticsConfig::from_lookup(lookup_from(&[
            (API_KEY_ENV_VAR, "phc_key"),
            (HOST_ENV_VAR, "https://eu.i.posthog.com"),
            (ENVIRONMENT_ENV_VAR, "prod"),
        ]))
        .expect("config should resolve");

        assert_eq!(config.host_url, "https://eu.i.posthog.com");
        assert_eq!(config.env_name, "prod");
    }
}
