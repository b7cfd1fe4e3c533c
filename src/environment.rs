use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Environment variable that overrides the configured API base URL.
pub const API_URL_ENV: &str = "POSTURE_API_URL";

/// Where the compliance API lives.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Environment {
    /// Collection server on this machine.
    #[default]
    Local,
    /// Any other deployment, by base URL.
    Custom(String),
}

impl Environment {
    /// Returns the API base URL, without a trailing slash.
    pub fn api_url(&self) -> String {
        match self {
            Environment::Local => "http://localhost:8000".to_string(),
            Environment::Custom(url) => url.trim_end_matches('/').to_string(),
        }
    }

    /// Pick the first usable source: command-line flag, then the
    /// `POSTURE_API_URL` variable, then the config file. Unusable values are
    /// skipped with a warning.
    pub fn resolve(flag: Option<&str>, env_value: Option<&str>, config: Option<&str>) -> Self {
        for (source, value) in [("--api-url", flag), (API_URL_ENV, env_value), ("config", config)] {
            let Some(value) = value else { continue };
            if value.trim().is_empty() {
                continue;
            }
            match value.parse() {
                Ok(env) => return env,
                Err(e) => log::warn!("Ignoring API URL from {}: {}", source, e),
            }
        }
        Environment::Local
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("local") {
            return Ok(Environment::Local);
        }
        if s.starts_with("http://") || s.starts_with("https://") {
            let url = s.trim_end_matches('/');
            if url == Environment::Local.api_url() {
                return Ok(Environment::Local);
            }
            return Ok(Environment::Custom(url.to_string()));
        }
        Err(format!("'{}' is not an http(s) URL", s))
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => write!(f, "Local"),
            Environment::Custom(_) => write!(f, "Custom"),
        }
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Environment::{}, URL: {}", self, self.api_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_urls() {
        assert_eq!("local".parse::<Environment>(), Ok(Environment::Local));
        assert_eq!(
            "http://localhost:8000/".parse::<Environment>(),
            Ok(Environment::Local)
        );
        assert_eq!(
            "https://compliance.example.com/api/".parse::<Environment>(),
            Ok(Environment::Custom(
                "https://compliance.example.com/api".to_string()
            ))
        );
        assert!("compliance.example.com".parse::<Environment>().is_err());
    }

    #[test]
    fn flag_wins_over_env_and_config() {
        let env = Environment::resolve(
            Some("http://flag:1"),
            Some("http://env:2"),
            Some("http://config:3"),
        );
        assert_eq!(env.api_url(), "http://flag:1");
    }

    #[test]
    fn invalid_sources_fall_through() {
        let env = Environment::resolve(Some("nope"), Some(""), Some("http://config:3"));
        assert_eq!(env.api_url(), "http://config:3");
        assert_eq!(Environment::resolve(None, None, None), Environment::Local);
    }
}
