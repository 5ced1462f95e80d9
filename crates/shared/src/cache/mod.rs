mod cache_store;
mod memory;

pub use self::cache_store::CacheStore;
pub use self::memory::MemoryCacheStore;
