pub mod product;
pub mod store;
pub mod store_account;
