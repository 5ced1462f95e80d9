use crate::{abstract_trait::CacheBackendTrait, errors::CacheError};
use async_trait::async_trait;
use chrono::Duration;
use std::collections::HashMap;
use tokio::{sync::Mutex, time::Instant};

/// In-process cache backend for single-node runs without Redis.
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .await
            .values()
            .filter(|(_, expires_at)| *expires_at > now)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheBackendTrait for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.lock().await;

        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let ttl = ttl.to_std().unwrap_or_default();
        self.entries
            .lock()
            .await
            .insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), CacheError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    /// The whole keyspace fits in one step, so the cursor always ends at 0.
    async fn scan(&self, _cursor: u64, pattern: &str) -> Result<(u64, Vec<String>), CacheError> {
        let now = Instant::now();
        let entries = self.entries.lock().await;

        let keys = entries
            .iter()
            .filter(|(key, (_, expires_at))| *expires_at > now && glob_match(pattern, key))
            .map(|(key, _)| key.clone())
            .collect();

        Ok((0, keys))
    }

    async fn del_many(&self, keys: &[String]) -> Result<u64, CacheError> {
        let mut entries = self.entries.lock().await;
        Ok(keys.iter().filter(|k| entries.remove(*k).is_some()).count() as u64)
    }
}

enum Token {
    Any,
    Char(char),
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        match c {
            '*' => tokens.push(Token::Any),
            '\\' => tokens.push(Token::Char(chars.next().unwrap_or('\\'))),
            c => tokens.push(Token::Char(c)),
        }
    }

    tokens
}

/// `*` glob with backslash escapes, the subset of Redis MATCH syntax the
/// services use.
fn glob_match(pattern: &str, candidate: &str) -> bool {
    let tokens = tokenize(pattern);
    let text: Vec<char> = candidate.chars().collect();

    let (mut t, mut c) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while c < text.len() {
        match tokens.get(t) {
            Some(Token::Char(ch)) if *ch == text[c] => {
                t += 1;
                c += 1;
            }
            Some(Token::Any) => {
                backtrack = Some((t, c));
                t += 1;
            }
            _ => match backtrack {
                Some((star, from)) => {
                    backtrack = Some((star, from + 1));
                    t = star + 1;
                    c = from + 1;
                }
                None => return false,
            },
        }
    }

    tokens[t..].iter().all(|token| matches!(token, Token::Any))
}
