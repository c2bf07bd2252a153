use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    /// Fallback daily target when the profile is too incomplete to compute one.
    pub default_target_kcal: f64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "caltrack".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "caltrack-users".into()),
        };
        let default_target_kcal = std::env::var("DEFAULT_TARGET_KCAL")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(2000.0);
        Ok(Self {
            database_url,
            jwt,
            default_target_kcal,
        })
    }
}
