//! Text rendering for chat replies and for ASCII-restricted fields.

use unicode_normalization::UnicodeNormalization;

use crate::BillQuote;

/// Characters that must be backslash-escaped to render literally in
/// Telegram MarkdownV2.
pub const MARKDOWN_V2_SPECIAL: &str = r"_*[]()~`>#+-=|{}.!";

/// Default length cap of [`normalize_display_text`].
pub const DISPLAY_TEXT_LIMIT: usize = 25;

const NO_MEMO: &str = "(khong co)";

/// How a reply is going to be rendered by the chat client.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Sent as is, nothing is reserved.
    #[default]
    Plain,
    /// Sent with MarkdownV2 parsing enabled.
    Escaped,
}

/// Prefixes every MarkdownV2 special character with a backslash.
///
/// The input is assumed unescaped: an existing backslash is left alone.
#[must_use]
pub fn escape_markdown_v2(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if MARKDOWN_V2_SPECIAL.contains(ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Reduces free text to upper-case ASCII letters, digits, spaces and hyphens.
///
/// Accents are removed by compatibility decomposition, any other non-ASCII
/// character is dropped. Runs of spaces collapse to one and the result is cut
/// to `limit` characters.
///
/// ```rust
/// use engine::normalize_display_text;
///
/// assert_eq!(normalize_display_text("Tiền ăn trưa!!!", 25), "TIEN AN TRUA");
/// ```
#[must_use]
pub fn normalize_display_text(text: &str, limit: usize) -> String {
    let kept: String = text
        .nfkd()
        .filter(char::is_ascii)
        .map(|ch| ch.to_ascii_uppercase())
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == ' ' || *ch == '-')
        .collect();

    let collapsed = kept.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated: String = collapsed.chars().take(limit).collect();
    truncated.trim().to_string()
}

/// Renders the confirmation text of a quote.
///
/// In [`RenderMode::Escaped`] every free-text field is escaped and the values
/// the user is likely to copy (account and amount to pay) are wrapped in
/// inline code.
#[must_use]
pub fn render_summary(quote: &BillQuote, mode: RenderMode) -> String {
    let text = |value: &str| match mode {
        RenderMode::Plain => value.to_string(),
        RenderMode::Escaped => escape_markdown_v2(value),
    };
    let code = |value: &str| match mode {
        RenderMode::Plain => value.to_string(),
        RenderMode::Escaped => format!("`{}`", escape_markdown_v2(value)),
    };

    let mut out = String::from("Thong tin chia bill:\n");
    out.push_str(&format!("Bank: {}\n", text(&quote.bank.display_code)));
    out.push_str(&format!("STK: {}\n", code(&quote.account)));
    out.push_str(&format!("So tien: {}\n", quote.total));
    if let Some(people) = quote.people {
        out.push_str(&format!("So nguoi: {people}\n"));
        out.push_str(&format!("Moi nguoi: {}\n", code(&quote.amount_due.to_string())));
    }
    out.push_str(&format!(
        "Noi dung: {}",
        text(quote.memo.as_deref().unwrap_or(NO_MEMO))
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_every_special_character() {
        assert_eq!(escape_markdown_v2("a_b*c"), r"a\_b\*c");
        assert_eq!(escape_markdown_v2("(khong co)"), r"\(khong co\)");
        assert_eq!(escape_markdown_v2("1.000!"), r"1\.000\!");
        assert_eq!(
            escape_markdown_v2(MARKDOWN_V2_SPECIAL),
            r"\_\*\[\]\(\)\~\`\>\#\+\-\=\|\{\}\.\!"
        );
    }

    #[test]
    fn leaves_other_characters_untouched() {
        assert_eq!(escape_markdown_v2("Tiền ăn 123"), "Tiền ăn 123");
        assert_eq!(escape_markdown_v2(r"a\b"), r"a\b");
        assert_eq!(escape_markdown_v2(""), "");
    }

    #[test]
    fn normalizes_vietnamese_memo() {
        let out = normalize_display_text("Tiền ăn trưa!!!", DISPLAY_TEXT_LIMIT);
        assert_eq!(out, "TIEN AN TRUA");
        assert!(out.is_ascii());
    }

    #[test]
    fn normalize_keeps_hyphen_and_collapses_spaces() {
        assert_eq!(normalize_display_text("  a -  b\t\tc  ", 25), "A - BC");
        assert_eq!(normalize_display_text("x  ,  y", 25), "X Y");
    }

    #[test]
    fn normalize_truncates_then_trims() {
        assert_eq!(normalize_display_text("abcd efgh", 5), "ABCD");
        assert_eq!(normalize_display_text(&"x".repeat(40), 25).len(), 25);
        assert_eq!(normalize_display_text("", 25), "");
        assert_eq!(normalize_display_text("!!!", 25), "");
    }

    #[test]
    fn normalize_drops_undecomposable_letters() {
        // `đ` has no decomposition into an ASCII base letter.
        assert_eq!(normalize_display_text("đi ăn", 25), "I AN");
    }
}
