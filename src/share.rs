//! Challenge links and share cards
//!
//! A challenge link carries a short base-36 token in the `c` query
//! parameter. Both players rebuild the same set from that token with
//! [`build_from_token`](crate::generator::build_from_token).

use thiserror::Error;

use crate::session::SessionSummary;

/// Query parameter holding the challenge token
pub const TOKEN_PARAM: &str = "c";

/// Squares per row on the share card
const CARD_ROW: usize = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("link has no `c` parameter")]
    MissingToken,
    #[error("challenge token is empty")]
    EmptyToken,
    #[error("challenge token `{0}` is not base-36")]
    InvalidToken(String),
}

/// Base-36 (0-9a-z) rendering of `n`
pub fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// New token from a wall-clock timestamp in ms
pub fn mint_token(now_ms: f64) -> String {
    to_base36(now_ms.max(0.0) as u64)
}

/// Normalised (lowercase) token, if it is non-empty base-36
pub fn validate_token(token: &str) -> Result<String, LinkError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(LinkError::EmptyToken);
    }
    if !token.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(LinkError::InvalidToken(token.to_string()));
    }
    Ok(token.to_ascii_lowercase())
}

/// `base` with the challenge token attached
pub fn challenge_url(base: &str, token: &str) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}{TOKEN_PARAM}={token}")
}

/// Pull the challenge token out of a shared URL (or a bare query string)
pub fn token_from_url(url: &str) -> Result<String, LinkError> {
    let query = match url.split_once('?') {
        Some((_, q)) => q,
        None if url.contains('=') => url,
        None => return Err(LinkError::MissingToken),
    };
    let query = query.split('#').next().unwrap_or_default();
    let value = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == TOKEN_PARAM)
        .map(|(_, value)| value)
        .ok_or(LinkError::MissingToken)?;
    validate_token(value)
}

/// Emoji grid of the answer history plus the headline numbers
pub fn share_card(title: &str, summary: &SessionSummary) -> String {
    let mut lines = vec![format!("Mathswipe · {title}")];
    for row in summary.history.chunks(CARD_ROW) {
        lines.push(
            row.iter()
                .map(|&correct| if correct { "🟩" } else { "🟥" })
                .collect(),
        );
    }
    lines.push(format!(
        "Score {} · {}/{} ({:.0}%) · Best streak {}",
        summary.score,
        summary.total_correct,
        summary.total_answered,
        summary.accuracy() * 100.0,
        summary.best_streak
    ));
    lines.join("\n")
}
