use anyhow::{Context, Result};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    pub secret_key: String,
    pub api_keys: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    ///
    /// `DATABASE_URL` wins when present; otherwise the URL is assembled from
    /// the `POSTGRES_*` variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match lookup("PORT") {
            Some(port) => port.parse().context("PORT must be a number")?,
            None => DEFAULT_PORT,
        };

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(max) => max
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a number")?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => database_url_from_parts(&lookup)?,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database_url,
            max_connections,
            secret_key: lookup("SECRET_KEY").context("Cannot load SECRET_KEY env variable")?,
            api_keys: lookup("API_KEYS").unwrap_or_default(),
        })
    }

    /// Database location without credentials, for logs
    pub fn database_location(&self) -> &str {
        self.database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    }
}

fn database_url_from_parts(lookup: &impl Fn(&str) -> Option<String>) -> Result<String> {
    let host = lookup("POSTGRES_HOST").context("Cannot load POSTGRES_HOST env variable")?;
    let port = lookup("POSTGRES_PORT").unwrap_or_else(|| "5432".to_string());
    let user = lookup("POSTGRES_USER").context("Cannot load POSTGRES_USER env variable")?;
    let password =
        lookup("POSTGRES_PASSWORD").context("Cannot load POSTGRES_PASSWORD env variable")?;
    let dbname = lookup("POSTGRES_DBNAME").context("Cannot load POSTGRES_DBNAME env variable")?;

    Ok(format!(
        "postgres://{user}:{password}@{host}:{port}/{dbname}"
    ))
}
