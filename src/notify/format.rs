//! Message bodies sent to the user.
//!
//! Kept free of transport concerns so tests can assert on them directly.

use crate::market::types::{TrackedPair, WeekRange, round2};

/// Alert pushed when the integer part of the ratio moves.
pub fn change_alert(
    pair: &TrackedPair,
    old: f64,
    new: f64,
    base_price: f64,
    fx_rate: Option<f64>,
    fx_currency: &str,
    range: Option<WeekRange>,
) -> String {
    let mut message = format!(
        "📢 {id} ratio change:\n\
         Was: 1 {base} = {old} {quote}\n\
         Now: 1 {base} = {new} {quote}\n\
         💵 ≈ {usd} USD ≈ {fiat} {cur}\n\n",
        id = pair.id(),
        base = pair.base_symbol,
        quote = pair.quote_symbol,
        usd = round2(base_price),
        fiat = fiat_value(base_price, fx_rate),
        cur = fx_currency.to_uppercase(),
    );

    if let Some(range) = range {
        message.push_str(&format!(
            "📊 52-week low: {low} {q}\n📈 52-week high: {high} {q}",
            low = range.low,
            high = range.high,
            q = pair.quote_symbol,
        ));
    }

    message
}

/// Reply to the "check ratio" query.
pub fn ratio_reply(
    pair: &TrackedPair,
    ratio: Option<f64>,
    base_price: Option<f64>,
    fx_rate: Option<f64>,
    fx_currency: &str,
) -> String {
    match (ratio, base_price) {
        (Some(ratio), Some(price)) => format!(
            "📡 1 {base} = {ratio} {quote}\n💵 ≈ {usd} USD ≈ {fiat} {cur}",
            base = pair.base_symbol,
            quote = pair.quote_symbol,
            usd = round2(price),
            fiat = fiat_value(price, fx_rate),
            cur = fx_currency.to_uppercase(),
        ),
        _ => "⚠️ Price data is currently unavailable. Try again later.".to_string(),
    }
}

/// Reply to the "52-week range" query.
pub fn range_reply(pair: &TrackedPair, low: Option<f64>, high: Option<f64>) -> String {
    match (low, high) {
        (Some(low), Some(high)) => format!(
            "📊 52-week range:\n🔻 Low: {low} {q}\n🔺 High: {high} {q}",
            q = pair.quote_symbol,
        ),
        _ => "⚠️ Could not load 52-week data.".to_string(),
    }
}

pub fn menu_reply() -> &'static str {
    "Choose an action:"
}

fn fiat_value(base_price: f64, fx_rate: Option<f64>) -> String {
    match fx_rate {
        Some(rate) => round2(base_price * rate).to_string(),
        None => "?".to_string(),
    }
}
