//! Conversation Assembly
//!
//! Frames a model call: persona, optional market context, prior turns and
//! the new user message, always in that order.

use agent_core::{Conversation, Message};
use rust_decimal::Decimal;

use crate::model::CoinSnapshot;

/// Placeholder for any figure the provider did not supply
pub const MISSING_FIELD: &str = "N/A";

/// Characters of the coin description kept in the context block
pub const DESCRIPTION_PREVIEW_CHARS: usize = 500;

/// Build the ordered turns for one model call.
///
/// Produces `persona, [context], history..., user`; the context turn is
/// present only when a snapshot is given.
pub fn build_messages(
    system_prompt: &str,
    snapshot: Option<&CoinSnapshot>,
    history: &[Message],
    user_message: &str,
) -> Conversation {
    let mut conversation = Conversation::with_system_prompt(system_prompt);

    if let Some(snapshot) = snapshot {
        conversation.push(Message::system(format!(
            "Additional context:\n{}",
            format_coin_context(snapshot)
        )));
    }

    conversation.extend(history.iter().cloned());
    conversation.push(Message::user(user_message));
    conversation
}

/// Render a snapshot as the fixed context template
pub fn format_coin_context(snapshot: &CoinSnapshot) -> String {
    let price = snapshot
        .current_price
        .map_or_else(missing, |p| format!("${}", p.normalize()));
    let change = snapshot.price_change_24h.map_or_else(missing, percent);
    let market_cap = snapshot
        .market_cap
        .map_or_else(missing, |v| format!("${}", group_thousands(v)));
    let volume = snapshot
        .volume
        .map_or_else(missing, |v| format!("${}", group_thousands(v)));
    let description = snapshot
        .description
        .as_deref()
        .map_or_else(missing, preview);

    format!(
        "Current coin information:\n\
         - Name: {}\n\
         - Symbol: {}\n\
         - Current Price: {price}\n\
         - 24h Change: {change}\n\
         - Market Cap: {market_cap}\n\
         - Volume: {volume}\n\
         - Description: {description}",
        snapshot.name,
        snapshot.symbol.to_uppercase(),
    )
}

fn missing() -> String {
    MISSING_FIELD.to_owned()
}

fn percent(change: Decimal) -> String {
    let change = change.round_dp(2);
    let sign = if change > Decimal::ZERO { "+" } else { "" };
    format!("{sign}{change:.2}%")
}

fn preview(description: &str) -> String {
    let mut chars = description.chars();
    let head: String = chars.by_ref().take(DESCRIPTION_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// `1930000000000` -> `1,930,000,000,000`
fn group_thousands(value: Decimal) -> String {
    let text = value.round_dp(2).normalize().to_string();
    let (sign, digits) = text
        .strip_prefix('-')
        .map_or(("", text.as_str()), |rest| ("-", rest));
    let (int, frac) = digits
        .split_once('.')
        .map_or((digits, None), |(i, f)| (i, Some(f)));

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}
