//! The mail user agent: all mailboxes of a base directory plus the
//! current selection.
//!
//! The `Mua` is the single mutator of its mailboxes. Persistence is
//! issued before the in-memory mutation for both save and delete, so a
//! storage failure leaves the model exactly as it was; after every
//! successful operation the encoded in-memory mailbox matches the on-disk
//! entries of its folder.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{MailError, Result};
use crate::mailbox::Mailbox;
use crate::model::message::Message;
use crate::store::Storage;

/// A set of named mailboxes materialised from a base directory.
pub struct Mua {
    base_dir: PathBuf,
    mailboxes: Vec<Mailbox>,
    /// Name of the selected mailbox; empty means "none".
    selected: String,
}

impl Mua {
    /// Load every folder of the base directory into a mailbox.
    ///
    /// Mailboxes are ordered ascending by name; folder names are unique
    /// on disk, so mailbox names are unique here.
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        let storage = Storage::open(&base_dir)?;
        let mut mailboxes = Vec::new();
        for folder in storage.folders()? {
            mailboxes.push(Mailbox::from_folder(&folder)?);
        }
        mailboxes.sort_by(|a, b| a.name().cmp(b.name()));
        debug!(base_dir = %base_dir.display(), count = mailboxes.len(), "Opened mail store");
        Ok(Self {
            base_dir,
            mailboxes,
            selected: String::new(),
        })
    }

    /// The base directory backing this agent.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// The mailboxes, ascending by name.
    pub fn mailboxes(&self) -> &[Mailbox] {
        &self.mailboxes
    }

    /// Number of mailboxes.
    pub fn len(&self) -> usize {
        self.mailboxes.len()
    }

    /// Whether the base directory holds no mailboxes.
    pub fn is_empty(&self) -> bool {
        self.mailboxes.is_empty()
    }

    /// The selected mailbox name; empty when nothing is selected.
    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// The REPL prompt: `[*] > ` with no selection, `[<name>] > ` otherwise.
    pub fn prompt(&self) -> String {
        if self.selected.is_empty() {
            "[*] > ".to_string()
        } else {
            format!("[{}] > ", self.selected)
        }
    }

    /// Select the n-th mailbox (1-based, name order).
    pub fn select(&mut self, index: usize) -> Result<()> {
        if index < 1 || index > self.mailboxes.len() {
            return Err(MailError::OutOfRange {
                index,
                count: self.mailboxes.len(),
            });
        }
        self.selected = self.mailboxes[index - 1].name().to_string();
        Ok(())
    }

    /// A copy of the selected mailbox.
    pub fn current(&self) -> Result<Mailbox> {
        Ok(self.current_ref()?.clone())
    }

    /// A copy of the n-th message of the selected mailbox (1-based).
    pub fn read_message(&self, index: usize) -> Result<Message> {
        self.current_ref()?.read(index)
    }

    /// Persist a message into the selected mailbox, then add it in memory.
    ///
    /// The folder is looked up fresh on disk; a missing folder fails with
    /// `NoSuchMailbox` and changes nothing.
    pub fn save_message(&mut self, message: Message) -> Result<()> {
        let index = self.current_index()?;
        let encoded = message.encode();

        let storage = Storage::open(&self.base_dir)?;
        let folder = storage
            .folder(&self.selected)?
            .ok_or_else(|| MailError::NoSuchMailbox(self.selected.clone()))?;
        folder.add_entry(&encoded)?;

        self.mailboxes[index].compose(message);
        Ok(())
    }

    /// Delete the n-th message of the selected mailbox, on disk first.
    ///
    /// The on-disk entry is found by content equality with the encoded
    /// message. When no entry matches, nothing changes on either side.
    pub fn delete_message(&mut self, index: usize) -> Result<()> {
        let mailbox_index = self.current_index()?;
        let encoded = self.mailboxes[mailbox_index].read(index)?.encode();

        let storage = Storage::open(&self.base_dir)?;
        let folder = storage
            .folder(&self.selected)?
            .ok_or_else(|| MailError::NoSuchMailbox(self.selected.clone()))?;

        let mut deleted = false;
        for item in folder.entries()? {
            if item.content()? == encoded {
                item.delete()?;
                deleted = true;
                break;
            }
        }

        if deleted {
            self.mailboxes[mailbox_index].delete(index)?;
        } else {
            warn!(
                mailbox = %self.selected,
                index,
                "No stored entry matches the message; nothing deleted"
            );
        }
        Ok(())
    }

    /// The selected mailbox, by reference.
    fn current_ref(&self) -> Result<&Mailbox> {
        let index = self.current_index()?;
        Ok(&self.mailboxes[index])
    }

    /// Resolve the selected name to its position.
    ///
    /// No selection is `NoSelection`; a selected name that no longer
    /// resolves (the folder vanished externally) is `NoSuchMailbox`.
    fn current_index(&self) -> Result<usize> {
        if self.selected.is_empty() {
            return Err(MailError::NoSelection);
        }
        self.mailboxes
            .iter()
            .position(|m| m.name() == self.selected)
            .ok_or_else(|| MailError::NoSuchMailbox(self.selected.clone()))
    }
}
