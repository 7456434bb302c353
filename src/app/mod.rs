pub mod database_service;
pub mod seller_store;
