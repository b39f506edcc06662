use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::media::CloudinaryImageStore;
use adapter::realtime::RealtimeHub;
use adapter::redis::RedisClient;
use adapter::repository::auth::AuthRepositoryImpl;
use adapter::repository::event::EventRepositoryImpl;
use adapter::repository::health::HealthCheckRepositoryImpl;
use adapter::repository::user::UserRepositoryImpl;
use kernel::media::ImageStore;
use kernel::realtime::EventBroadcaster;
use kernel::repository::auth::AuthRepository;
use kernel::repository::event::EventRepository;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::user::UserRepository;
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    event_repository: Arc<dyn EventRepository>,
    user_repository: Arc<dyn UserRepository>,
    auth_repository: Arc<dyn AuthRepository>,
    broadcaster: Arc<dyn EventBroadcaster>,
    image_store: Arc<dyn ImageStore>,
    guest_ttl_hours: i64,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool, redis_client: Arc<RedisClient>, app_config: AppConfig) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let event_repository = Arc::new(EventRepositoryImpl::new(pool.clone()));
        let user_repository = Arc::new(UserRepositoryImpl::new(pool.clone()));
        let auth_repository = Arc::new(AuthRepositoryImpl::new(
            pool.clone(),
            redis_client.clone(),
            app_config.auth.ttl,
        ));
        let broadcaster = Arc::new(RealtimeHub::new());
        let image_store = Arc::new(CloudinaryImageStore::new(&app_config.cloudinary));
        Self {
            health_check_repository,
            event_repository,
            user_repository,
            auth_repository,
            broadcaster,
            image_store,
            guest_ttl_hours: app_config.auth.guest_ttl_hours,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn event_repository(&self) -> Arc<dyn EventRepository> {
        self.event_repository.clone()
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn auth_repository(&self) -> Arc<dyn AuthRepository> {
        self.auth_repository.clone()
    }

    pub fn broadcaster(&self) -> Arc<dyn EventBroadcaster> {
        self.broadcaster.clone()
    }

    pub fn image_store(&self) -> Arc<dyn ImageStore> {
        self.image_store.clone()
    }

    pub fn guest_ttl_hours(&self) -> i64 {
        self.guest_ttl_hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapter::database::connect_database_with;
    use shared::config::{AuthConfig, CloudinaryConfig, DatabaseConfig, RedisConfig};

    #[tokio::test]
    async fn the_registry_carries_the_configured_guest_ttl() {
        let config = AppConfig {
            database: DatabaseConfig {
                host: "localhost".into(),
                port: 5432,
                username: "app".into(),
                password: "passwd".into(),
                database: "app".into(),
            },
            redis: RedisConfig {
                host: "localhost".into(),
                port: 6379,
            },
            auth: AuthConfig {
                ttl: 86400,
                guest_ttl_hours: 48,
            },
            cloudinary: CloudinaryConfig {
                cloud_name: "demo".into(),
                upload_preset: "events".into(),
            },
        };
        let pool = connect_database_with(&config.database);
        let kv = Arc::new(RedisClient::new(&config.redis).unwrap());

        let registry = AppRegistry::new(pool, kv, config);

        assert_eq!(registry.guest_ttl_hours(), 48);
    }
}
