use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub request_password: String,
    pub environment: String,
    pub sentry_dsn: Option<String>,
    pub provider_base_url: String,
    pub provider_api_key: String,
    pub provider_webhook_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            request_password: std::env::var("REQUEST_PASSWORD")
                .map_err(|_| anyhow::anyhow!("REQUEST_PASSWORD environment variable required"))
                .and_then(|password| {
                    if password.trim().is_empty() {
                        anyhow::bail!("REQUEST_PASSWORD cannot be empty");
                    }
                    Ok(password)
                })?,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string()),
            sentry_dsn: std::env::var("SENTRY_DSN")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            provider_base_url: std::env::var("PROVIDER_BASE_URL")
                .map_err(|_| anyhow::anyhow!("PROVIDER_BASE_URL environment variable required"))
                .and_then(|url| {
                    if url.trim().is_empty() {
                        anyhow::bail!("PROVIDER_BASE_URL cannot be empty");
                    }
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("PROVIDER_BASE_URL must start with http:// or https://");
                    }
                    Ok(url)
                })?,
            provider_api_key: std::env::var("PROVIDER_API_KEY")
                .map_err(|_| anyhow::anyhow!("PROVIDER_API_KEY environment variable required"))
                .and_then(|key| {
                    if key.trim().is_empty() {
                        anyhow::bail!("PROVIDER_API_KEY cannot be empty");
                    }
                    Ok(key)
                })?,
            provider_webhook_secret: std::env::var("PROVIDER_WEBHOOK_SECRET")
                .ok()
                .filter(|s| !s.trim().is_empty()),
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Environment: {}", config.environment);
        tracing::debug!("Provider Base URL: {}", config.provider_base_url);
        tracing::debug!("Server Port: {}", config.port);
        if config.sentry_dsn.is_some() {
            tracing::info!("Error reporting DSN configured");
        }

        Ok(config)
    }
}
