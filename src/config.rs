use anyhow::Context;
use std::str::FromStr;
use tracing::Level;

#[derive(Debug)]
pub struct Config {
    database_url: String,
    log_level: Level,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = load_env("DATABASE_URL")?;
        let log_level = load_env_or("LOG_LEVEL", Level::INFO)?;
        Ok(Self {
            database_url,
            log_level,
        })
    }

    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    #[must_use]
    pub const fn log_level(&self) -> Level {
        self.log_level
    }
}

fn load_env<T>(key: &str) -> anyhow::Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    let val =
        std::env::var(key).with_context(|| format!("Failed to load environment variable {key}"))?;
    parse_env(key, &val)
}

fn load_env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(val) => parse_env(key, &val),
        Err(std::env::VarError::NotPresent) => Ok(default),
        Err(err) => {
            Err(err).with_context(|| format!("Failed to load environment variable {key}"))
        }
    }
}

fn parse_env<T>(key: &str, val: &str) -> anyhow::Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    val.parse::<T>()
        .with_context(|| format!("Failed to parse environment variable {key}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_env_accepts_log_levels() {
        let level: Level = parse_env("LOG_LEVEL", "debug").unwrap();
        assert_eq!(level, Level::DEBUG);
    }

    #[test]
    fn parse_env_names_the_variable_on_failure() {
        let err = parse_env::<Level>("LOG_LEVEL", "loud").unwrap_err();
        assert_eq!(err.to_string(), "Failed to parse environment variable LOG_LEVEL");
    }

    #[test]
    fn missing_optional_variable_falls_back_to_default() {
        let level = load_env_or("LIBRARY_CATALOG_UNSET_LEVEL", Level::WARN).unwrap();
        assert_eq!(level, Level::WARN);
    }
}
