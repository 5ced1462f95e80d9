pub mod product;
mod store;
mod store_account;

pub use self::store::StoreRepository;
pub use self::store_account::StoreAccountRepository;
