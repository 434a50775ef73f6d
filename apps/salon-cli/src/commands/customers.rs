//! `customers`: list or search the customer directory.

use salon_core::Customer;
use salon_store::Store;

use super::render;
use crate::error::CliResult;

pub fn customers(
    store: &Store,
    search: Option<&str>,
    phone: Option<&str>,
    json: bool,
) -> CliResult<String> {
    let repo = store.customers();
    let found = match (search, phone) {
        (_, Some(digits)) => repo.search_phone(digits),
        (Some(query), None) => repo.search(query),
        (None, None) => repo.load(),
    };
    render(&found, json, |list| customer_lines(list))
}

fn customer_lines(list: &[Customer]) -> String {
    if list.is_empty() {
        return "No customers".to_string();
    }
    list.iter()
        .map(|c| {
            format!(
                "{:<24} {:<16} {}",
                c.name,
                c.phone.as_deref().unwrap_or("-"),
                c.birthday.as_deref().unwrap_or("-")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
