pub mod api;
pub mod pagination;
pub mod product;
pub mod store;
pub mod store_account;
pub mod unit;
