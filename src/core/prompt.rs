//! Questions asked of the user during a download

use std::io;

/// Source of answers to interactive questions
pub trait Prompt {
    /// Ask a yes/no question; anything but an explicit yes is a no
    fn confirm(&self, message: &str) -> bool;

    /// Read one line of free text, trimmed; empty answers are allowed.
    ///
    /// Fails when no answer can be read at all, e.g. on a closed stdin.
    fn input(&self, prompt: &str) -> io::Result<String>;
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedPrompt;
    use super::*;

    #[test]
    fn test_scripted_prompt_defaults_to_no() {
        let prompt = ScriptedPrompt::new().with_confirm(true);
        assert!(prompt.confirm("first?"));
        assert!(!prompt.confirm("second?"));
        assert_eq!(prompt.asked.borrow().len(), 2);
    }

    #[test]
    fn test_scripted_prompt_trims_input() {
        let prompt = ScriptedPrompt::new().with_input("  1-3  ");
        assert_eq!(prompt.input("Selection").unwrap(), "1-3");

        let err = prompt.input("Selection").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
