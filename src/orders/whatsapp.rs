use std::fmt::Write as _;

use super::repo_types::OrderDetails;

pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}${}.{:02}", abs / 100, abs % 100)
}

/// Human-readable order summary used as the prefilled chat message.
pub fn order_summary(details: &OrderDetails) -> String {
    let order = &details.order;
    let mut text = format!(
        "Hello! I'd like to follow up on order #{}.\nCustomer: {}\nItems:\n",
        order.id, order.customer_name
    );
    for item in &details.items {
        let _ = writeln!(
            text,
            "- {} x {} ({})",
            item.quantity,
            item.product_name,
            format_cents(item.unit_price_cents)
        );
    }
    let _ = write!(
        text,
        "Total: {}\nStatus: {}",
        format_cents(order.total_cents),
        order.status
    );
    text
}

/// `https://wa.me/<digits>?text=<encoded message>`; non-digits in `number` are dropped.
pub fn deep_link(number: &str, message: &str) -> String {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    format!(
        "https://wa.me/{digits}?text={}",
        urlencoding::encode(message)
    )
}
