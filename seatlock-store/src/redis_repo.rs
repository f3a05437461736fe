use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use seatlock_core::{CoreError, CoreResult, LeaseStore};
use std::time::Duration;
use tracing::{debug, info};

const SCAN_BATCH: usize = 200;

// Deletes only while the value is unchanged, so a release cannot remove a
// hold someone else acquired after ours lapsed.
const COMPARE_AND_DELETE: &str = r#"
    if redis.call("GET", KEYS[1]) == ARGV[1] then
        return redis.call("DEL", KEYS[1])
    else
        return 0
    end
"#;

#[derive(Clone)]
pub struct RedisLeaseStore {
    conn: MultiplexedConnection,
}

impl RedisLeaseStore {
    pub async fn connect(connection_string: &str) -> CoreResult<Self> {
        let client = redis::Client::open(connection_string).map_err(unavailable)?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(unavailable)?;
        info!("Connected to lease store");
        Ok(Self { conn })
    }
}

fn unavailable(e: redis::RedisError) -> CoreError {
    CoreError::StoreUnavailable(e.to_string())
}

fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

/// Escapes glob metacharacters so the prefix matches literally.
fn scan_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('*');
    pattern
}

#[async_trait]
impl LeaseStore for RedisLeaseStore {
    async fn try_create(&self, key: &str, value: &str, ttl: Duration) -> CoreResult<bool> {
        let mut conn = self.conn.clone();

        // SET NX: Only set if key does not exist
        let result: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(ttl_seconds(ttl))
            .query_async(&mut conn)
            .await
            .map_err(unavailable)?;

        Ok(result.is_some())
    }

    async fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await.map_err(unavailable)?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> CoreResult<()> {
        let mut conn = self.conn.clone();
        match ttl {
            Some(ttl) => conn
                .set_ex::<_, _, ()>(key, value, ttl_seconds(ttl))
                .await
                .map_err(unavailable),
            None => conn.set::<_, _, ()>(key, value).await.map_err(unavailable),
        }
    }

    async fn delete(&self, key: &str) -> CoreResult<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await.map_err(unavailable)
    }

    async fn delete_many(&self, keys: &[String]) -> CoreResult<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(keys).await.map_err(unavailable)
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> CoreResult<bool> {
        let mut conn = self.conn.clone();
        let script = redis::Script::new(COMPARE_AND_DELETE);
        let removed: i64 = script
            .key(key)
            .arg(expected)
            .invoke_async(&mut conn)
            .await
            .map_err(unavailable)?;
        Ok(removed == 1)
    }

    async fn batch_get(&self, keys: &[String]) -> CoreResult<Vec<Option<String>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.conn.clone();
        let mut pipe = redis::pipe();
        for key in keys {
            pipe.get(key);
        }
        let values: Vec<Option<String>> = pipe.query_async(&mut conn).await.map_err(unavailable)?;
        Ok(values)
    }

    async fn keys_by_prefix(&self, prefix: &str) -> CoreResult<Vec<String>> {
        let mut conn = self.conn.clone();
        let pattern = scan_pattern(prefix);
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(unavailable)?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        // SCAN may report a key more than once
        keys.sort();
        keys.dedup();
        debug!("Prefix scan {} matched {} keys", prefix, keys.len());
        Ok(keys)
    }

    async fn ping(&self) -> CoreResult<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await.map_err(unavailable)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_pattern_escapes_globs() {
        assert_eq!(scan_pattern("geo:unlock:"), "geo:unlock:*");
        assert_eq!(scan_pattern("a*b?[c]"), "a\\*b\\?\\[c\\]*");
    }

    #[test]
    fn test_ttl_floor() {
        assert_eq!(ttl_seconds(Duration::from_millis(10)), 1);
        assert_eq!(ttl_seconds(Duration::from_secs(120)), 120);
    }

    // Needs a live server: REDIS_URL=redis://127.0.0.1/ cargo test -- --ignored
    #[tokio::test]
    #[ignore]
    async fn test_live_conditional_create() {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".to_string());
        let store = RedisLeaseStore::connect(&url).await.unwrap();
        store.ping().await.unwrap();

        let key = "hold:seat:__live_test__";
        store.delete(key).await.unwrap();
        assert!(store.try_create(key, "u1", Duration::from_secs(5)).await.unwrap());
        assert!(!store.try_create(key, "u2", Duration::from_secs(5)).await.unwrap());
        assert!(!store.delete_if_equals(key, "u2").await.unwrap());
        assert!(store.delete_if_equals(key, "u1").await.unwrap());
        assert_eq!(store.get(key).await.unwrap(), None);
    }
}
