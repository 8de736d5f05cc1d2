use std::net::SocketAddr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub database_url: String,
    pub jwt_secret: String,
    pub auth_username: String,
    /// Argon2 PHC string. Login is disabled while unset.
    pub auth_password_hash: Option<String>,
    pub cors_allow: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:8080".into());
        let listen_addr: SocketAddr = raw_addr.parse().map_err(|_| ConfigError::Invalid {
            name: "LISTEN_ADDR",
            value: raw_addr.clone(),
        })?;
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://expense-tracker.db".into());
        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| "change-me".into());
        let auth_username = lookup("AUTH_USERNAME").unwrap_or_else(|| "admin".into());
        let auth_password_hash =
            lookup("AUTH_PASSWORD_HASH").filter(|hash| !hash.trim().is_empty());
        let cors_allow = lookup("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            listen_addr,
            database_url,
            jwt_secret,
            auth_username,
            auth_password_hash,
            cors_allow,
        })
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == "change-me"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.database_url, "sqlite://expense-tracker.db");
        assert_eq!(config.cors_allow, vec!["*".to_string()]);
        assert!(config.auth_password_hash.is_none());
        assert!(config.uses_default_secret());
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let config = config_from(&[(
            "CORS_ALLOW_ORIGINS",
            "http://localhost:3000, https://money.example.com,,",
        )])
        .unwrap();
        assert_eq!(
            config.cors_allow,
            vec![
                "http://localhost:3000".to_string(),
                "https://money.example.com".to_string()
            ]
        );
    }

    #[test]
    fn bad_listen_addr_is_an_error() {
        let error = config_from(&[("LISTEN_ADDR", "not-an-addr")]).unwrap_err();
        assert_eq!(error.to_string(), "invalid LISTEN_ADDR: not-an-addr");
    }
}
