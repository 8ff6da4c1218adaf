pub mod account_service;
pub mod gallery_service;

pub use account_service::AccountSession;
