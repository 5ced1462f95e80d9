pub mod barcode_cache;
pub mod product;
pub mod store_account;
pub mod subscription;
