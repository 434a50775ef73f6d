//! # Service Repository
//!
//! `services.json`: the service menu. Legacy records store `cost` and
//! `price` as strings; they read as numbers and are written back as numbers.

use salon_core::Service;

use super::json::JsonCollection;

pub type ServiceRepository = JsonCollection<Service>;
