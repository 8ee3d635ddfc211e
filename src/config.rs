use anyhow::Context;
use reqwest::Url;

/// Origins the frontend is served from; baked in rather than configurable.
pub const ALLOWED_ORIGINS: [&str; 3] = [
    "https://holidaytaxidispatchsystem.netlify.app",
    "http://localhost:5173",
    "http://127.0.0.1:5173",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub end_point: Url,
    pub bind_address: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let api_key = required(&lookup, "API_KEY")?;
        let end_point = required(&lookup, "END_POINT")?;
        let end_point: Url = end_point
            .parse()
            .with_context(|| format!("END_POINT is not a valid URL: {end_point}"))?;
        if end_point.cannot_be_a_base() {
            anyhow::bail!("END_POINT must be an absolute http(s) URL");
        }

        let bind_address = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {raw}"))?,
            None => 5000,
        };

        Ok(Config {
            api_key,
            end_point,
            bind_address,
            port,
        })
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<String> {
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .with_context(|| format!("{key} must be set in the environment"))
}
