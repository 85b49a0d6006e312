//! Operator confirmation seam.
//!
//! Nothing in this workspace mutates a file without an explicit yes from
//! the operator, so every mutating path takes a [`Prompter`]. The CLI
//! implements it interactively; tests script the answers.

/// Blocking operator interaction.
pub trait Prompter {
    /// Yes/no confirmation. `false` skips the mutation and moves on.
    fn confirm(&mut self, message: &str) -> bool;

    /// Choose the line index to insert at, given the numbered document
    /// view. The manifest format has no canonical insertion point, so the
    /// operator decides.
    fn pick_line(&mut self, message: &str, lines: &[String]) -> usize;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod testing {
    use super::Prompter;
    use std::collections::VecDeque;

    /// Scripted prompter for unit tests: pops pre-seeded answers, panics
    /// when a test under-seeds it.
    pub struct Scripted {
        pub answers: VecDeque<bool>,
        pub lines: VecDeque<usize>,
    }

    impl Scripted {
        pub fn new(answers: &[bool], lines: &[usize]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                lines: lines.iter().copied().collect(),
            }
        }
    }

    impl Prompter for Scripted {
        fn confirm(&mut self, message: &str) -> bool {
            self.answers
                .pop_front()
                .unwrap_or_else(|| panic!("unexpected confirm: {message}"))
        }

        fn pick_line(&mut self, message: &str, _lines: &[String]) -> usize {
            self.lines
                .pop_front()
                .unwrap_or_else(|| panic!("unexpected pick_line: {message}"))
        }
    }
}
