//! Clarification questions and the skip-resolved navigation over them.

use serde::{Deserialize, Serialize};

/// How a question was resolved.
///
/// The backend only knows one resolution path today: a user marking the
/// question resolved by hand. The wire format spells it `"manual"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionStatus {
    Manual,
}

/// A clarification question generated for the selected ticket.
///
/// A question is unresolved while `status` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The conversation thread this question belongs to.
    #[serde(rename = "sessionID")]
    pub session_id: String,
    /// The question text.
    pub question: String,
    /// Resolution marker, `None` while unresolved.
    #[serde(default)]
    pub status: Option<ResolutionStatus>,
}

impl Question {
    pub fn is_unresolved(&self) -> bool {
        self.status.is_none()
    }
}

/// Navigation direction over the question board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// The ordered question list plus an optional focused entry.
///
/// Focus moves cyclically over unresolved questions only; resolved entries
/// are skipped. A successful move also asks the front end to scroll the
/// landed entry into view.
#[derive(Debug, Clone, Default)]
pub struct QuestionBoard {
    questions: Vec<Question>,
    focused: Option<usize>,
}

impl QuestionBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn unresolved_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_unresolved()).count()
    }

    /// Replaces the whole list, as returned by the backend.
    ///
    /// Focus survives the replacement while it still points inside the list.
    pub fn replace(&mut self, questions: Vec<Question>) {
        self.questions = questions;
        if let Some(index) = self.focused {
            if index >= self.questions.len() {
                self.focused = None;
            }
        }
    }

    pub fn clear(&mut self) {
        self.questions.clear();
        self.focused = None;
    }

    /// Moves focus to the next unresolved question in `direction`.
    ///
    /// Starts from the focused entry, or from one-past-the-end (forward)
    /// / one-before-start (backward) when nothing is focused, stepping
    /// circularly and skipping resolved entries. Returns the landed index,
    /// or `None` when the list is empty or fully resolved (focus is left
    /// unchanged in both cases). A single unresolved entry re-selects
    /// itself.
    pub fn advance(&mut self, direction: Direction) -> Option<usize> {
        if self.questions.is_empty() {
            return None;
        }
        let len = self.questions.len() as isize;
        let mut index: isize = match self.focused {
            Some(i) => i as isize,
            None => match direction {
                Direction::Forward => -1,
                Direction::Backward => len,
            },
        };
        // A full cycle visits every entry once, including the start.
        for _ in 0..len {
            index = match direction {
                Direction::Forward => (index + 1).rem_euclid(len),
                Direction::Backward => (index - 1).rem_euclid(len),
            };
            if self.questions[index as usize].is_unresolved() {
                let landed = index as usize;
                self.focused = Some(landed);
                return Some(landed);
            }
        }
        None
    }

    /// Computes the toggle target for `index`: the session to POST for and
    /// the status the entry flips to.
    ///
    /// The caller applies the flip via [`apply_status`](Self::apply_status)
    /// only after the backend acknowledged it.
    pub fn toggle_target(&self, index: usize) -> Option<(String, Option<ResolutionStatus>)> {
        let question = self.questions.get(index)?;
        let next = match question.status {
            None => Some(ResolutionStatus::Manual),
            Some(_) => None,
        };
        Some((question.session_id.clone(), next))
    }

    pub fn apply_status(&mut self, index: usize, status: Option<ResolutionStatus>) {
        if let Some(question) = self.questions.get_mut(index) {
            question.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, resolved: bool) -> Question {
        Question {
            session_id: id.to_string(),
            question: format!("What about {id}?"),
            status: resolved.then_some(ResolutionStatus::Manual),
        }
    }

    fn board(resolved: &[bool]) -> QuestionBoard {
        let mut board = QuestionBoard::new();
        board.replace(
            resolved
                .iter()
                .enumerate()
                .map(|(i, &r)| question(&format!("s{i}"), r))
                .collect(),
        );
        board
    }

    #[test]
    fn forward_from_unfocused_lands_on_only_unresolved() {
        // All but index 2 resolved; length does not matter.
        for len in [3usize, 5, 8] {
            let mut resolved = vec![true; len];
            resolved[2] = false;
            let mut b = board(&resolved);
            assert_eq!(b.advance(Direction::Forward), Some(2));
            assert_eq!(b.focused(), Some(2));
        }
    }

    #[test]
    fn backward_from_unfocused_lands_on_only_unresolved() {
        let mut resolved = vec![true; 6];
        resolved[2] = false;
        let mut b = board(&resolved);
        assert_eq!(b.advance(Direction::Backward), Some(2));
    }

    #[test]
    fn all_resolved_is_a_noop() {
        for len in [1usize, 4, 7] {
            let mut b = board(&vec![true; len]);
            assert_eq!(b.advance(Direction::Forward), None);
            assert_eq!(b.focused(), None);
            assert_eq!(b.advance(Direction::Backward), None);
            assert_eq!(b.focused(), None);
        }
    }

    #[test]
    fn all_resolved_keeps_existing_focus() {
        let mut b = board(&[false, true, true]);
        assert_eq!(b.advance(Direction::Forward), Some(0));
        b.apply_status(0, Some(ResolutionStatus::Manual));
        assert_eq!(b.advance(Direction::Forward), None);
        assert_eq!(b.focused(), Some(0));
    }

    #[test]
    fn empty_board_is_a_noop() {
        let mut b = QuestionBoard::new();
        assert_eq!(b.advance(Direction::Forward), None);
    }

    #[test]
    fn single_unresolved_entry_reselects_itself() {
        let mut b = board(&[false]);
        assert_eq!(b.advance(Direction::Forward), Some(0));
        assert_eq!(b.advance(Direction::Forward), Some(0));
    }

    #[test]
    fn forward_skips_resolved_and_wraps() {
        let mut b = board(&[false, true, false, true]);
        assert_eq!(b.advance(Direction::Forward), Some(0));
        assert_eq!(b.advance(Direction::Forward), Some(2));
        // Wraps past the resolved tail back to the head.
        assert_eq!(b.advance(Direction::Forward), Some(0));
    }

    #[test]
    fn backward_steps_in_reverse() {
        let mut b = board(&[false, true, false, false]);
        assert_eq!(b.advance(Direction::Backward), Some(3));
        assert_eq!(b.advance(Direction::Backward), Some(2));
        assert_eq!(b.advance(Direction::Backward), Some(0));
    }

    #[test]
    fn toggle_target_flips_both_ways() {
        let b = board(&[false, true]);
        let (id, next) = b.toggle_target(0).unwrap();
        assert_eq!(id, "s0");
        assert_eq!(next, Some(ResolutionStatus::Manual));
        let (_, next) = b.toggle_target(1).unwrap();
        assert_eq!(next, None);
        assert!(b.toggle_target(9).is_none());
    }

    #[test]
    fn replace_drops_out_of_range_focus() {
        let mut b = board(&[false, false, false]);
        b.advance(Direction::Backward);
        assert_eq!(b.focused(), Some(2));
        b.replace(vec![question("s0", false)]);
        assert_eq!(b.focused(), None);
    }

    #[test]
    fn status_serializes_as_manual() {
        let q = question("s1", true);
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["status"], "manual");
        assert_eq!(json["sessionID"], "s1");
    }
}
