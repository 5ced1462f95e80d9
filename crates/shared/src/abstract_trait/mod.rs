mod cache;
mod jwt;

pub use self::cache::{CacheBackendTrait, DynCacheBackend};
pub use self::jwt::{DynJwtService, JwtServiceTrait};
