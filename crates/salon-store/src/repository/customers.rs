//! # Customer Repository
//!
//! `customers.json`: name, phone, birthday and a free-text note. Customers
//! are not linked to ledger rows; the ledger stores the name as typed.

use salon_core::Customer;

use super::json::JsonCollection;

pub type CustomerRepository = JsonCollection<Customer>;

impl JsonCollection<Customer> {
    /// Customers whose phone number contains `digits`.
    pub fn search_phone(&self, digits: &str) -> Vec<Customer> {
        let digits = digits.trim();
        self.load()
            .into_iter()
            .filter(|c| {
                c.phone
                    .as_deref()
                    .is_some_and(|phone| !digits.is_empty() && phone.contains(digits))
            })
            .collect()
    }
}
