//! Presentation strings for the REPL.
//!
//! Everything here returns a `String`; the library never prints. Column
//! widths and the list date format come from [`crate::config::Config`].

use crate::config::Config;
use crate::error::Result;
use crate::mailbox::Mailbox;
use crate::model::message::Message;
use crate::mua::Mua;

/// Truncate to at most `width` characters.
fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

/// The mailbox list: one row per mailbox with its message count.
pub fn mailbox_table(mua: &Mua) -> String {
    let mut out = String::new();
    out.push_str(&format!("  {:<4} {:<24} {:>10}\n", "#", "Mailbox", "# messages"));
    out.push_str(&format!("  {}\n", "-".repeat(40)));
    for (i, mailbox) in mua.mailboxes().iter().enumerate() {
        out.push_str(&format!(
            "  {:<4} {:<24} {:>10}\n",
            i + 1,
            truncate(mailbox.name(), 24),
            mailbox.len()
        ));
    }
    out
}

/// The message list of one mailbox: date, sender, recipients, subject,
/// newest first, 1-based numbering.
pub fn message_table(mailbox: &Mailbox, config: &Config) -> Result<String> {
    let widths = &config.display;
    let mut out = String::new();
    out.push_str(&format!(
        "  {:<4} {:<17} {:<from$} {:<to$} {}\n",
        "#",
        "Date",
        "From",
        "To",
        "Subject",
        from = widths.from_width,
        to = widths.to_width,
    ));
    out.push_str(&format!("  {}\n", "-".repeat(27 + widths.from_width + widths.to_width + 20)));

    for (i, message) in mailbox.messages().iter().enumerate() {
        let date = message
            .date()?
            .format(&config.display.date_format)
            .to_string();
        let from = message.sender()?.email();
        let to = message
            .recipients()?
            .iter()
            .map(|a| a.email())
            .collect::<Vec<_>>()
            .join(", ");
        let subject = message.subject()?;
        out.push_str(&format!(
            "  {:<4} {:<17} {:<from$} {:<to$} {}\n",
            i + 1,
            date,
            truncate(&from, widths.from_width),
            truncate(&to, widths.to_width),
            truncate(subject, widths.subject_width),
            from = widths.from_width,
            to = widths.to_width,
        ));
    }
    Ok(out)
}

/// A full message card: the mandatory headers, then each part's media
/// type and body.
pub fn message_card(message: &Message, config: &Config) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!("  {:<9} {}\n", "From", message.sender()?));
    let recipients = message
        .recipients()?
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    out.push_str(&format!("  {:<9} {}\n", "To", recipients));
    out.push_str(&format!("  {:<9} {}\n", "Subject", message.subject()?));
    out.push_str(&format!(
        "  {:<9} {}\n",
        "Date",
        message.date()?.format(&config.display.date_format)
    ));

    for part in message.parts() {
        let media = part
            .content_type()
            .map(|(media, _)| media)
            .unwrap_or("text/plain");
        out.push_str(&format!("\n  --- {media} ---\n"));
        for line in part.body().lines() {
            out.push_str(&format!("  {line}\n"));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::address::Address;
    use chrono::{FixedOffset, TimeZone};

    fn sample_message() -> Message {
        Message::singlepart(
            Address::new("Alice Rossi", "alice", "example.com").unwrap(),
            vec![Address::bare("bob", "example.com").unwrap()],
            "greetings",
            FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
                .unwrap(),
            "hello there\n",
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_message_card_shows_headers_and_body() {
        let card = message_card(&sample_message(), &Config::default()).unwrap();
        assert!(card.contains("Alice Rossi <alice@example.com>"));
        assert!(card.contains("bob@example.com"));
        assert!(card.contains("greetings"));
        assert!(card.contains("2024-01-02"));
        assert!(card.contains("--- text/plain ---"));
        assert!(card.contains("  hello there"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abcdef", 3), "abc");
        assert_eq!(truncate("ab", 5), "ab");
    }
}
