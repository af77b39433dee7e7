use rand::seq::SliceRandom;

use crate::history::{HistoryError, HistoryStore, Message};

/// Sender label used for the user's own messages.
pub const SELF_SENDER: &str = "Ты";

/// Canned bot replies, chosen uniformly at random.
const REPLIES: [&str; 5] = ["Ок 👍", "Понял", "Интересно 🤔", "Хаха 😄", "Расскажи ещё"];

/// A bot reply waiting to be delivered. Captures the contact at send time,
/// so switching chats during the delay window cannot redirect the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    contact: String,
}

/// The chat session: the contact list, the active contact, and the store
/// behind them. Transcripts are always reloaded from the store rather than
/// cached here.
pub struct ChatSession {
    store: HistoryStore,
    contacts: Vec<String>,
    active: String,
}

impl ChatSession {
    /// Create a session over `store`. The first contact starts active.
    pub fn new(store: HistoryStore, contacts: Vec<String>) -> Self {
        let active = contacts.first().cloned().unwrap_or_default();
        Self {
            store,
            contacts,
            active,
        }
    }

    pub fn contacts(&self) -> &[String] {
        &self.contacts
    }

    pub fn active_contact(&self) -> &str {
        &self.active
    }

    /// Make `contact` the active chat. The caller re-renders from
    /// [`ChatSession::transcript`].
    pub fn switch(&mut self, contact: &str) {
        self.active = contact.to_string();
    }

    /// Append the user's message to the active transcript. Whitespace-only
    /// input is a no-op. On success returns the reply the caller must
    /// schedule.
    pub fn send(&self, text: &str) -> Result<Option<PendingReply>, HistoryError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        self.store.append(&self.active, SELF_SENDER, text)?;
        Ok(Some(PendingReply {
            contact: self.active.clone(),
        }))
    }

    /// Append a random canned phrase, attributed to the contact captured in
    /// `pending` and written to that contact's transcript, which is not
    /// necessarily the active one anymore.
    pub fn deliver_reply(&self, pending: &PendingReply) -> Result<(), HistoryError> {
        self.store
            .append(&pending.contact, &pending.contact, random_phrase())
    }

    /// The active contact's transcript, loaded fresh from the store.
    pub fn transcript(&self) -> Result<Vec<Message>, HistoryError> {
        self.store.load(&self.active)
    }
}

fn random_phrase() -> &'static str {
    REPLIES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(REPLIES[0])
}
