use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    /// Allowed CORS origin; permissive when unset.
    pub frontend_url: Option<String>,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let frontend_url = std::env::var("FRONTEND_URL").ok();
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "coursehub".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "coursehub-users".into()),
            // Sessions are valid for two days unless overridden.
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 2),
        };
        Ok(Self {
            database_url,
            frontend_url,
            jwt,
        })
    }
}
