use async_trait::async_trait;

use crate::store::{KeyValueStore, StoreError};

pub struct RedisStore {
    client: redis::Client,
}

impl RedisStore {
    pub fn new(client: redis::Client) -> RedisStore {
        RedisStore { client }
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    #[tracing::instrument(name = "List keys in Redis", skip(self))]
    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut redis_conn = self.client.get_tokio_connection().await?;

        let keys = redis::cmd("KEYS")
            .arg(format!("{}*", prefix))
            .query_async::<_, Vec<String>>(&mut redis_conn)
            .await?;

        Ok(keys)
    }

    #[tracing::instrument(name = "Get a value from Redis", skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut redis_conn = self.client.get_tokio_connection().await?;

        let value = redis::cmd("GET")
            .arg(key)
            .query_async::<_, Option<String>>(&mut redis_conn)
            .await?;

        Ok(value)
    }

    #[tracing::instrument(name = "Store a value in Redis", skip(self, value))]
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut redis_conn = self.client.get_tokio_connection().await?;

        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .query_async::<_, ()>(&mut redis_conn)
            .await?;

        Ok(())
    }
}
