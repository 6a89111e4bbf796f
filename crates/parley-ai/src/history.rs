//! Ordered turn log for one conversation.

use parley_common::Turn;

/// Append-only conversation history.
///
/// Insertion order is the prompt order. Turns are never removed: the log
/// grows for as long as the session lives, and every turn is sent to the
/// backend on each call. Long conversations will eventually exceed the
/// backend's context window; start a new session to begin again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationHistory {
    turns: Vec<Turn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the seed transcript at session start, ahead of any exchange.
    pub fn seed(&mut self, turns: Vec<Turn>) {
        self.turns.extend(turns);
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Owned copy of the current turns, for request construction.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_order() {
        let mut history = ConversationHistory::new();
        history.append(Turn::user("one"));
        history.append(Turn::assistant("two"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.turns()[0], Turn::user("one"));
        assert_eq!(history.last(), Some(&Turn::assistant("two")));
    }

    #[test]
    fn snapshot_is_detached() {
        let mut history = ConversationHistory::new();
        history.append(Turn::user("one"));
        let snapshot = history.snapshot();
        history.append(Turn::assistant("two"));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn seed_precedes_appended_turns() {
        let mut history = ConversationHistory::new();
        history.seed(vec![Turn::system("be brief"), Turn::user("hi")]);
        history.append(Turn::assistant("hello"));
        assert_eq!(
            history.turns(),
            &[
                Turn::system("be brief"),
                Turn::user("hi"),
                Turn::assistant("hello"),
            ]
        );
    }

    #[test]
    fn empty_history() {
        let history = ConversationHistory::new();
        assert!(history.is_empty());
        assert!(history.last().is_none());
        assert!(history.snapshot().is_empty());
    }
}
