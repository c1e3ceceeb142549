use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisResult};

/// Connection to the redis instance shared with the auth microservice.
#[derive(Clone)]
pub struct RedisConnection(ConnectionManager);

impl RedisConnection {
    pub async fn new(url: &str) -> RedisResult<Self> {
        Ok(Self(ConnectionManager::new(Client::open(url)?).await?))
    }

    /// Whether the session of the given refresh token has been logged out.
    pub async fn is_session_revoked(&mut self, refresh_token: &str) -> RedisResult<bool> {
        self.0
            .exists(format!("session_logout:{refresh_token}"))
            .await
    }
}

impl std::fmt::Debug for RedisConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisConnection").finish_non_exhaustive()
    }
}
