//! A named, date-ordered collection of messages.

use tracing::debug;

use crate::error::{MailError, Result};
use crate::model::message::Message;
use crate::parser::entry;
use crate::store::Folder;

/// One mailbox: a name plus its messages, kept strictly descending by
/// send date (stable for equal dates).
///
/// Mailboxes are mutated only through their owning [`crate::mua::Mua`].
#[derive(Debug, Clone, PartialEq)]
pub struct Mailbox {
    name: String,
    messages: Vec<Message>,
}

impl Mailbox {
    /// Build a mailbox by decoding every entry of a storage folder.
    pub fn from_folder(folder: &Folder) -> Result<Self> {
        let mut messages = Vec::new();
        for item in folder.entries()? {
            let content = item.content()?;
            let message = Message::from_fragments(&entry::decode(&content))?;
            messages.push(message);
        }
        debug!(name = folder.name(), count = messages.len(), "Loaded mailbox");
        let mut mailbox = Self {
            name: folder.name().to_string(),
            messages,
        };
        mailbox.sort();
        Ok(mailbox)
    }

    /// The mailbox name (may be empty; unique within a Mua).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the mailbox holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The messages, newest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// A copy of the n-th message (1-based, newest first).
    pub fn read(&self, index: usize) -> Result<Message> {
        self.check_index(index)?;
        Ok(self.messages[index - 1].clone())
    }

    /// Remove the n-th message (1-based).
    pub fn delete(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.messages.remove(index - 1);
        Ok(())
    }

    /// Append a message and restore date order.
    pub fn compose(&mut self, message: Message) {
        self.messages.push(message);
        self.sort();
    }

    /// Stable sort by descending send date; equal dates keep insertion
    /// order.
    fn sort(&mut self) {
        self.messages.sort_by(|a, b| b.sent_at().cmp(&a.sent_at()));
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < 1 || index > self.messages.len() {
            return Err(MailError::OutOfRange {
                index,
                count: self.messages.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::address::Address;
    use chrono::{DateTime, FixedOffset, TimeZone};

    fn date(day: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, day, 12, 0, 0)
            .unwrap()
    }

    fn message(day: u32, subject: &str) -> Message {
        Message::singlepart(
            Address::bare("a", "b").unwrap(),
            vec![Address::bare("c", "d").unwrap()],
            subject,
            date(day),
            "body\n",
            false,
        )
        .unwrap()
    }

    fn mailbox_with(messages: Vec<Message>) -> Mailbox {
        let mut mailbox = Mailbox {
            name: "inbox".to_string(),
            messages: Vec::new(),
        };
        for m in messages {
            mailbox.compose(m);
        }
        mailbox
    }

    #[test]
    fn test_compose_keeps_descending_date_order() {
        let mailbox = mailbox_with(vec![
            message(1, "oldest"),
            message(9, "newest"),
            message(5, "middle"),
        ]);
        let subjects: Vec<&str> = mailbox
            .messages()
            .iter()
            .map(|m| m.subject().unwrap())
            .collect();
        assert_eq!(subjects, ["newest", "middle", "oldest"]);
    }

    #[test]
    fn test_equal_dates_keep_insertion_order() {
        let mailbox = mailbox_with(vec![message(5, "first"), message(5, "second")]);
        let subjects: Vec<&str> = mailbox
            .messages()
            .iter()
            .map(|m| m.subject().unwrap())
            .collect();
        assert_eq!(subjects, ["first", "second"]);
    }

    #[test]
    fn test_read_is_one_based() {
        let mailbox = mailbox_with(vec![message(1, "old"), message(9, "new")]);
        assert_eq!(mailbox.read(1).unwrap().subject().unwrap(), "new");
        assert_eq!(mailbox.read(2).unwrap().subject().unwrap(), "old");
    }

    #[test]
    fn test_index_discipline() {
        let mut mailbox = mailbox_with(vec![message(1, "only")]);
        assert!(matches!(
            mailbox.read(0),
            Err(MailError::OutOfRange { index: 0, count: 1 })
        ));
        assert!(matches!(
            mailbox.read(2),
            Err(MailError::OutOfRange { index: 2, count: 1 })
        ));
        assert!(mailbox.delete(0).is_err());
        assert!(mailbox.delete(2).is_err());
        assert!(mailbox.delete(1).is_ok());
        assert!(mailbox.is_empty());
    }

    #[test]
    fn test_delete_shifts_later_messages() {
        let mut mailbox = mailbox_with(vec![
            message(1, "oldest"),
            message(5, "middle"),
            message(9, "newest"),
        ]);
        mailbox.delete(2).unwrap();
        assert_eq!(mailbox.len(), 2);
        assert_eq!(mailbox.read(2).unwrap().subject().unwrap(), "oldest");
    }

}
