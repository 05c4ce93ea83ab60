use redis::{AsyncCommands, Client};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::Config;

/// Thin Redis wrapper. Every operation degrades silently: a cache outage
/// must never take a request down with it.
#[derive(Clone)]
pub struct CacheService {
    client: Client,
}

impl CacheService {
    pub fn new(config: &Config) -> Self {
        let client = Client::open(config.redis_url.clone()).expect("Invalid Redis URL");
        Self { client }
    }

    pub async fn check_connection(&self) -> Result<(), String> {
        let mut con = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| e.to_string())?;

        let _: () = con
            .set("inkpress_health_check", "ok")
            .await
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub async fn set<V: Serialize>(&self, key: &str, value: V, expire_secs: u64) -> Result<(), String> {
        let mut con = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| e.to_string())?;

        let json = serde_json::to_string(&value).map_err(|e| e.to_string())?;

        let _: () = con.set_ex(key, json, expire_secs).await.map_err(|e| e.to_string())?;
        Ok(())
    }

    pub async fn get<V: DeserializeOwned>(&self, key: &str) -> Option<V> {
        let mut con = self.client.get_multiplexed_async_connection().await.ok()?;

        let result: Option<String> = con.get(key).await.ok();

        match result {
            Some(json) => serde_json::from_str(&json).ok(),
            None => None,
        }
    }

    pub async fn delete(&self, key: &str) {
        if let Ok(mut con) = self.client.get_multiplexed_async_connection().await {
            let _: Result<(), _> = con.del(key).await;
        }
    }
}
