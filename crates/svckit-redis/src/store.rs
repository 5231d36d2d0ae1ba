//! Typed cache operations over a pooled Redis connection.
//!
//! Values are serialized to JSON strings on the way in and deserialized on
//! the way out, so any `Serialize`/`DeserializeOwned` type can be stored.
//! Counters (`incr`, `hincr`) operate on the raw integer representation,
//! which JSON shares for plain numbers.

use deadpool_redis::{redis::AsyncCommands, Connection, Pool};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use svckit_core::{SvcError, SvcResult};
use tracing::debug;

/// Typed Redis store backed by a connection pool.
#[derive(Clone)]
pub struct RedisStore {
    pool: Arc<Pool>,
}

fn redis_err(op: &str, key: &str, e: impl std::fmt::Display) -> SvcError {
    SvcError::system(format!("redis {op} failed for key '{key}': {e}"))
}

fn encode<T: Serialize>(value: &T) -> SvcResult<String> {
    serde_json::to_string(value)
        .map_err(|e| SvcError::system(format!("failed to serialize cache value: {e}")))
}

fn decode<T: DeserializeOwned>(raw: String) -> SvcResult<T> {
    serde_json::from_str(&raw)
        .map_err(|e| SvcError::system(format!("failed to deserialize cache value: {e}")))
}

impl RedisStore {
    /// Creates a store over an existing pool.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> SvcResult<Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| SvcError::system(format!("failed to get redis connection: {e}")))
    }

    // --- string operations ---

    /// Stores a value without expiry.
    pub async fn set<T: Serialize + Sync>(&self, key: &str, value: &T) -> SvcResult<()> {
        let raw = encode(value)?;
        let mut conn = self.conn().await?;
        conn.set::<_, _, ()>(key, raw)
            .await
            .map_err(|e| redis_err("SET", key, e))?;
        Ok(())
    }

    /// Stores a value with a time-to-live. A zero or sub-second TTL is
    /// clamped to one second.
    pub async fn set_ex<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> SvcResult<()> {
        let raw = encode(value)?;
        let ttl_secs = ttl.as_secs().max(1);
        let mut conn = self.conn().await?;
        conn.set_ex::<_, _, ()>(key, raw, ttl_secs)
            .await
            .map_err(|e| redis_err("SETEX", key, e))?;
        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    /// Fetches a value, returning `None` when the key is absent.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> SvcResult<Option<T>> {
        let mut conn = self.conn().await?;
        let raw: Option<String> = conn.get(key).await.map_err(|e| redis_err("GET", key, e))?;
        match raw {
            Some(raw) => {
                debug!("Cache hit for key '{}'", key);
                Ok(Some(decode(raw)?))
            }
            None => {
                debug!("Cache miss for key '{}'", key);
                Ok(None)
            }
        }
    }

    /// Deletes a key, returning whether it existed.
    pub async fn delete(&self, key: &str) -> SvcResult<bool> {
        let mut conn = self.conn().await?;
        let deleted: i64 = conn.del(key).await.map_err(|e| redis_err("DEL", key, e))?;
        Ok(deleted > 0)
    }

    /// Deletes several keys, returning how many existed.
    pub async fn delete_many(&self, keys: &[String]) -> SvcResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn().await?;
        let deleted: i64 = conn
            .del(keys)
            .await
            .map_err(|e| redis_err("DEL", &keys.join(","), e))?;
        Ok(deleted as u64)
    }

    /// Sets a key's time-to-live, returning whether the key existed.
    pub async fn expire(&self, key: &str, ttl: Duration) -> SvcResult<bool> {
        let mut conn = self.conn().await?;
        let set: bool = conn
            .expire(key, ttl.as_secs().max(1) as i64)
            .await
            .map_err(|e| redis_err("EXPIRE", key, e))?;
        Ok(set)
    }

    /// Returns the remaining time-to-live in seconds.
    ///
    /// `-1` means the key has no expiry, `-2` means it does not exist.
    pub async fn ttl(&self, key: &str) -> SvcResult<i64> {
        let mut conn = self.conn().await?;
        conn.ttl(key).await.map_err(|e| redis_err("TTL", key, e))
    }

    /// Checks whether a key exists.
    pub async fn exists(&self, key: &str) -> SvcResult<bool> {
        let mut conn = self.conn().await?;
        conn.exists(key)
            .await
            .map_err(|e| redis_err("EXISTS", key, e))
    }

    /// Atomically increments a counter key, returning the new value.
    pub async fn incr(&self, key: &str, delta: i64) -> SvcResult<i64> {
        if delta <= 0 {
            return Err(SvcError::business("increment delta must be positive"));
        }
        let mut conn = self.conn().await?;
        conn.incr(key, delta)
            .await
            .map_err(|e| redis_err("INCRBY", key, e))
    }

    /// Atomically decrements a counter key, returning the new value.
    pub async fn decr(&self, key: &str, delta: i64) -> SvcResult<i64> {
        if delta <= 0 {
            return Err(SvcError::business("decrement delta must be positive"));
        }
        let mut conn = self.conn().await?;
        conn.decr(key, delta)
            .await
            .map_err(|e| redis_err("DECRBY", key, e))
    }

    // --- hash operations ---

    /// Fetches one field of a hash.
    pub async fn hget<T: DeserializeOwned>(&self, key: &str, field: &str) -> SvcResult<Option<T>> {
        let mut conn = self.conn().await?;
        let raw: Option<String> = conn
            .hget(key, field)
            .await
            .map_err(|e| redis_err("HGET", key, e))?;
        raw.map(decode).transpose()
    }

    /// Stores one field of a hash.
    pub async fn hset<T: Serialize + Sync>(
        &self,
        key: &str,
        field: &str,
        value: &T,
    ) -> SvcResult<()> {
        let raw = encode(value)?;
        let mut conn = self.conn().await?;
        conn.hset::<_, _, _, ()>(key, field, raw)
            .await
            .map_err(|e| redis_err("HSET", key, e))?;
        Ok(())
    }

    /// Stores one field of a hash and sets the hash's time-to-live.
    pub async fn hset_ex<T: Serialize + Sync>(
        &self,
        key: &str,
        field: &str,
        value: &T,
        ttl: Duration,
    ) -> SvcResult<()> {
        self.hset(key, field, value).await?;
        self.expire(key, ttl).await?;
        Ok(())
    }

    /// Fetches all fields of a hash.
    pub async fn hget_all<T: DeserializeOwned>(&self, key: &str) -> SvcResult<HashMap<String, T>> {
        let mut conn = self.conn().await?;
        let raw: HashMap<String, String> = conn
            .hgetall(key)
            .await
            .map_err(|e| redis_err("HGETALL", key, e))?;
        raw.into_iter()
            .map(|(field, value)| Ok((field, decode(value)?)))
            .collect()
    }

    /// Stores several fields of a hash at once.
    pub async fn hset_all<T: Serialize + Sync>(
        &self,
        key: &str,
        entries: &HashMap<String, T>,
    ) -> SvcResult<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let items: Vec<(&str, String)> = entries
            .iter()
            .map(|(field, value)| Ok((field.as_str(), encode(value)?)))
            .collect::<SvcResult<_>>()?;
        let mut conn = self.conn().await?;
        conn.hset_multiple::<_, _, _, ()>(key, &items)
            .await
            .map_err(|e| redis_err("HMSET", key, e))?;
        Ok(())
    }

    /// Stores several fields of a hash and sets the hash's time-to-live.
    pub async fn hset_all_ex<T: Serialize + Sync>(
        &self,
        key: &str,
        entries: &HashMap<String, T>,
        ttl: Duration,
    ) -> SvcResult<()> {
        self.hset_all(key, entries).await?;
        self.expire(key, ttl).await?;
        Ok(())
    }

    /// Deletes fields of a hash.
    pub async fn hdelete(&self, key: &str, fields: &[String]) -> SvcResult<u64> {
        if fields.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn().await?;
        let deleted: i64 = conn
            .hdel(key, fields)
            .await
            .map_err(|e| redis_err("HDEL", key, e))?;
        Ok(deleted as u64)
    }

    /// Checks whether a hash field exists.
    pub async fn hexists(&self, key: &str, field: &str) -> SvcResult<bool> {
        let mut conn = self.conn().await?;
        conn.hexists(key, field)
            .await
            .map_err(|e| redis_err("HEXISTS", key, e))
    }

    /// Atomically increments a hash field, returning the new value.
    pub async fn hincr(&self, key: &str, field: &str, delta: i64) -> SvcResult<i64> {
        if delta <= 0 {
            return Err(SvcError::business("increment delta must be positive"));
        }
        let mut conn = self.conn().await?;
        conn.hincr(key, field, delta)
            .await
            .map_err(|e| redis_err("HINCRBY", key, e))
    }

    /// Atomically decrements a hash field, returning the new value.
    pub async fn hdecr(&self, key: &str, field: &str, delta: i64) -> SvcResult<i64> {
        if delta <= 0 {
            return Err(SvcError::business("decrement delta must be positive"));
        }
        let mut conn = self.conn().await?;
        conn.hincr(key, field, -delta)
            .await
            .map_err(|e| redis_err("HINCRBY", key, e))
    }

    // --- set operations ---

    /// Fetches all members of a set.
    pub async fn smembers<T: DeserializeOwned>(&self, key: &str) -> SvcResult<Vec<T>> {
        let mut conn = self.conn().await?;
        let raw: Vec<String> = conn
            .smembers(key)
            .await
            .map_err(|e| redis_err("SMEMBERS", key, e))?;
        raw.into_iter().map(decode).collect()
    }

    /// Checks whether a value is a member of a set.
    pub async fn sis_member<T: Serialize + Sync>(&self, key: &str, value: &T) -> SvcResult<bool> {
        let raw = encode(value)?;
        let mut conn = self.conn().await?;
        conn.sismember(key, raw)
            .await
            .map_err(|e| redis_err("SISMEMBER", key, e))
    }

    /// Adds values to a set, returning how many were newly added.
    pub async fn sadd<T: Serialize + Sync>(&self, key: &str, values: &[T]) -> SvcResult<u64> {
        if values.is_empty() {
            return Ok(0);
        }
        let raw: Vec<String> = values.iter().map(encode).collect::<SvcResult<_>>()?;
        let mut conn = self.conn().await?;
        let added: i64 = conn
            .sadd(key, raw)
            .await
            .map_err(|e| redis_err("SADD", key, e))?;
        Ok(added as u64)
    }

    /// Adds values to a set and sets the set's time-to-live.
    pub async fn sadd_ex<T: Serialize + Sync>(
        &self,
        key: &str,
        values: &[T],
        ttl: Duration,
    ) -> SvcResult<u64> {
        let added = self.sadd(key, values).await?;
        self.expire(key, ttl).await?;
        Ok(added)
    }

    /// Returns the number of members of a set.
    pub async fn ssize(&self, key: &str) -> SvcResult<u64> {
        let mut conn = self.conn().await?;
        let size: i64 = conn
            .scard(key)
            .await
            .map_err(|e| redis_err("SCARD", key, e))?;
        Ok(size as u64)
    }

    /// Removes values from a set, returning how many were removed.
    pub async fn sremove<T: Serialize + Sync>(&self, key: &str, values: &[T]) -> SvcResult<u64> {
        if values.is_empty() {
            return Ok(0);
        }
        let raw: Vec<String> = values.iter().map(encode).collect::<SvcResult<_>>()?;
        let mut conn = self.conn().await?;
        let removed: i64 = conn
            .srem(key, raw)
            .await
            .map_err(|e| redis_err("SREM", key, e))?;
        Ok(removed as u64)
    }

    // --- list operations ---

    /// Fetches a range of a list. Indexes follow Redis semantics, so
    /// `lrange(key, 0, -1)` fetches the whole list.
    pub async fn lrange<T: DeserializeOwned>(
        &self,
        key: &str,
        start: i64,
        stop: i64,
    ) -> SvcResult<Vec<T>> {
        let mut conn = self.conn().await?;
        let raw: Vec<String> = conn
            .lrange(key, start as isize, stop as isize)
            .await
            .map_err(|e| redis_err("LRANGE", key, e))?;
        raw.into_iter().map(decode).collect()
    }

    /// Returns the length of a list.
    pub async fn lsize(&self, key: &str) -> SvcResult<u64> {
        let mut conn = self.conn().await?;
        let len: i64 = conn.llen(key).await.map_err(|e| redis_err("LLEN", key, e))?;
        Ok(len as u64)
    }

    /// Fetches the element at an index; negative indexes count from the end.
    pub async fn lindex<T: DeserializeOwned>(&self, key: &str, index: i64) -> SvcResult<Option<T>> {
        let mut conn = self.conn().await?;
        let raw: Option<String> = conn
            .lindex(key, index as isize)
            .await
            .map_err(|e| redis_err("LINDEX", key, e))?;
        raw.map(decode).transpose()
    }

    /// Appends a value to a list, returning the new length.
    pub async fn lpush<T: Serialize + Sync>(&self, key: &str, value: &T) -> SvcResult<u64> {
        let raw = encode(value)?;
        let mut conn = self.conn().await?;
        let len: i64 = conn
            .rpush(key, raw)
            .await
            .map_err(|e| redis_err("RPUSH", key, e))?;
        Ok(len as u64)
    }

    /// Appends several values to a list, returning the new length.
    pub async fn lpush_all<T: Serialize + Sync>(&self, key: &str, values: &[T]) -> SvcResult<u64> {
        if values.is_empty() {
            return self.lsize(key).await;
        }
        let raw: Vec<String> = values.iter().map(encode).collect::<SvcResult<_>>()?;
        let mut conn = self.conn().await?;
        let len: i64 = conn
            .rpush(key, raw)
            .await
            .map_err(|e| redis_err("RPUSH", key, e))?;
        Ok(len as u64)
    }

    /// Appends a value to a list and sets the list's time-to-live.
    pub async fn lpush_ex<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> SvcResult<u64> {
        let len = self.lpush(key, value).await?;
        self.expire(key, ttl).await?;
        Ok(len)
    }

    /// Replaces the element at an index. Fails if the index is out of range.
    pub async fn lset<T: Serialize + Sync>(
        &self,
        key: &str,
        index: i64,
        value: &T,
    ) -> SvcResult<()> {
        let raw = encode(value)?;
        let mut conn = self.conn().await?;
        conn.lset::<_, _, ()>(key, index as isize, raw)
            .await
            .map_err(|e| redis_err("LSET", key, e))?;
        Ok(())
    }

    /// Removes occurrences of a value from a list, returning how many were
    /// removed. `count` follows Redis LREM semantics.
    pub async fn lremove<T: Serialize + Sync>(
        &self,
        key: &str,
        count: i64,
        value: &T,
    ) -> SvcResult<u64> {
        let raw = encode(value)?;
        let mut conn = self.conn().await?;
        let removed: i64 = conn
            .lrem(key, count as isize, raw)
            .await
            .map_err(|e| redis_err("LREM", key, e))?;
        Ok(removed as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let raw = encode(&vec![1, 2, 3]).unwrap();
        let back: Vec<i32> = decode(raw).unwrap();
        assert_eq!(back, vec![1, 2, 3]);
    }

    #[test]
    fn decode_rejects_mismatched_type() {
        let raw = encode(&"hello").unwrap();
        let back: SvcResult<i64> = decode(raw);
        assert!(back.is_err());
        assert!(back.unwrap_err().is_system());
    }

    #[test]
    fn encode_numbers_as_raw_integers() {
        // INCR requires the stored representation to be a plain integer.
        assert_eq!(encode(&42_i64).unwrap(), "42");
    }
}
