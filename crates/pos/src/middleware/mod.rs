pub mod jwt;
pub mod subscription;
pub mod validate;
