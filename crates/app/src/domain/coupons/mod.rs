//! Coupons

pub mod data;
pub mod errors;
pub mod models;
pub mod recorder;
mod repositories;
pub mod service;
pub mod store;

pub use errors::CouponsServiceError;
pub use service::*;
