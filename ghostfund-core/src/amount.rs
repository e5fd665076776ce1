//! Currency-amount grammar shared by the deposit classifier and the
//! amount extractor.
//!
//! One pattern covers both token orders: "BDT 90" / "Tk. 160" and
//! "160 Tk" / "1,200tk" / "৳500". Keeping it in a single place means the
//! classifier and the extractor can never drift apart on what counts as a
//! tagged amount.

use regex::Regex;
use std::sync::LazyLock;

/// v1 of the currency-amount grammar.
///
/// Group 2 holds the number for the token-first form, group 3 for the
/// number-first form. Comma thousands separators are accepted inside the
/// number and stripped before parsing.
static CURRENCY_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:(tk|taka|bdt|৳)\.?\s*([0-9][0-9,]*))|(?:([0-9][0-9,]*)\s*(tk|taka|bdt|৳)\.?)")
        .unwrap()
});

/// Decide whether message text is an actual saving entry.
///
/// Weekly total announcements ("My weekly ghost fund ...") look like
/// deposits but are broadcasts, so they are vetoed first. After that, any
/// tagged amount counts, and a message that is nothing but digits is
/// accepted as numeric shorthand.
pub fn is_saving_message(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return false;
    }

    if lower.contains("weekly ghost fund") {
        return false;
    }

    if CURRENCY_AMOUNT.is_match(text) {
        return true;
    }

    is_all_digits(&lower)
}

/// Extract the deposited amount from message text.
///
/// Every non-overlapping tagged amount is summed, so "Saved 160 Tk and
/// 80 Tk" yields 240. With no tagged amount, a purely numeric message
/// yields its value. Anything else is an explicit absence, never a guess.
pub fn extract_amount(text: &str) -> Option<i64> {
    let mut amounts: Vec<i64> = Vec::new();

    for caps in CURRENCY_AMOUNT.captures_iter(text) {
        let Some(num) = caps.get(2).or_else(|| caps.get(3)) else {
            continue;
        };
        let clean: String = num.as_str().chars().filter(|c| c.is_ascii_digit()).collect();
        if let Ok(n) = clean.parse::<i64>() {
            amounts.push(n);
        }
    }

    if !amounts.is_empty() {
        return Some(amounts.iter().sum());
    }

    let stripped = text.trim();
    if is_all_digits(stripped) {
        return stripped.parse().ok();
    }

    None
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
