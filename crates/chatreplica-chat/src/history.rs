use std::collections::VecDeque;

use chatreplica_types::Message;

/// Ordered conversation transcript capped at `max_length` messages.
///
/// When full, appending drops the oldest message.
#[derive(Debug, Clone)]
pub struct ConversationLog {
    messages: VecDeque<Message>,
    max_length: usize,
}

impl ConversationLog {
    pub fn new(max_length: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(max_length.min(1024)),
            max_length,
        }
    }

    pub fn append(&mut self, message: Message) {
        if self.max_length == 0 {
            return;
        }
        while self.messages.len() >= self.max_length {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    /// Copy of the current transcript, oldest first
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.iter().cloned().collect()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.back()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }
}
