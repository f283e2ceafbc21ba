use std::env;

/// Typed environment configuration, read once at startup. Reports which
/// variable is missing or malformed rather than panicking.
pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub request_timeout_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL is not set".to_string())?;
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| "SERVER_PORT is not a valid port number".to_string())?;
        let request_timeout_ms = env::var("REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "2000".to_string())
            .parse()
            .map_err(|_| "REQUEST_TIMEOUT_MS is not a valid integer".to_string())?;

        Ok(Config { database_url, server_port, request_timeout_ms })
    }
}
