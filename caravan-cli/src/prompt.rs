//! Interactive prompter backed by `inquire`.

use caravan_sync::Prompter;

/// Terminal prompter. A failed or interrupted prompt counts as "no", the
/// conservative answer for every mutating question.
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn confirm(&mut self, message: &str) -> bool {
        inquire::Confirm::new(message)
            .with_default(false)
            .prompt()
            .unwrap_or(false)
    }

    fn pick_line(&mut self, message: &str, lines: &[String]) -> usize {
        for (number, line) in lines.iter().enumerate() {
            println!("{number:3}: {line}");
        }
        inquire::CustomType::<usize>::new(message)
            .with_error_message("enter a line number")
            .prompt()
            .map(|n| n.min(lines.len()))
            .unwrap_or(lines.len())
    }
}
