mod product;
mod store;
mod store_account;

pub use self::product::{Product, ProductDraft, ProductStatus, ProductUnit, WarehouseQuantity};
pub use self::store::Store;
pub use self::store_account::{DEFAULT_PAUSE_REASON, PaymentOutcome, StoreAccount};
