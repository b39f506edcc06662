use anyhow::{Context, Result};

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub cloudinary: CloudinaryConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: std::env::var("DATABASE_HOST").context("DATABASE_HOST must be set")?,
            port: std::env::var("DATABASE_PORT")
                .context("DATABASE_PORT must be set")?
                .parse::<u16>()
                .context("DATABASE_PORT must be a port number")?,
            username: std::env::var("DATABASE_USERNAME").context("DATABASE_USERNAME must be set")?,
            password: std::env::var("DATABASE_PASSWORD").context("DATABASE_PASSWORD must be set")?,
            database: std::env::var("DATABASE_NAME").context("DATABASE_NAME must be set")?,
        };
        let redis = RedisConfig {
            host: std::env::var("REDIS_HOST").context("REDIS_HOST must be set")?,
            port: std::env::var("REDIS_PORT")
                .context("REDIS_PORT must be set")?
                .parse::<u16>()
                .context("REDIS_PORT must be a port number")?,
        };
        let auth = AuthConfig {
            ttl: std::env::var("AUTH_TOKEN_TTL")
                .unwrap_or_else(|_| "86400".into())
                .parse::<u64>()
                .context("AUTH_TOKEN_TTL must be seconds")?,
            guest_ttl_hours: std::env::var("GUEST_ACCOUNT_TTL_HOURS")
                .unwrap_or_else(|_| "24".into())
                .parse::<i64>()
                .context("GUEST_ACCOUNT_TTL_HOURS must be hours")?,
        };
        let cloudinary = CloudinaryConfig {
            cloud_name: std::env::var("CLOUDINARY_CLOUD_NAME")
                .context("CLOUDINARY_CLOUD_NAME must be set")?,
            upload_preset: std::env::var("CLOUDINARY_UPLOAD_PRESET")
                .context("CLOUDINARY_UPLOAD_PRESET must be set")?,
        };
        Ok(Self {
            database,
            redis,
            auth,
            cloudinary,
        })
    }
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

pub struct RedisConfig {
    pub host: String,
    pub port: u16,
}

pub struct AuthConfig {
    /// Access token lifetime in seconds.
    pub ttl: u64,
    /// Guest account lifetime in hours.
    pub guest_ttl_hours: i64,
}

pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub upload_preset: String,
}
