use super::RequestsLoggingLevel;

#[derive(Clone)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    /// Lifetime of dismissal nonces in seconds.
    pub nonce_lifetime_secs: i64,
    /// If set, nonces survive restarts; otherwise a random secret is
    /// generated at startup.
    pub nonce_secret: Option<String>,
    /// Path to an admin frontend directory to be statically served.
    pub frontend_dir_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 3001,
            nonce_lifetime_secs: 86400,
            nonce_secret: None,
            frontend_dir_path: None,
        }
    }
}
