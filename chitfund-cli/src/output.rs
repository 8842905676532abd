//! Where the shell's text goes
//!
//! Menus, receipts and reports are written through [`Output`]. Scripted
//! sessions swap in [`testing::MockOutput`] and read the transcript back.

use crate::error::CliResult;

/// Sink for everything the shell shows the operator
pub trait Output {
    fn print(&self, msg: &str) -> CliResult<()>;

    /// Machine-readable listing or status
    fn print_json(&self, data: &serde_json::Value) -> CliResult<()> {
        self.print(&serde_json::to_string_pretty(data)?)
    }

    /// A rejected command or bad answer. Never fatal to the session.
    fn error(&self, msg: &str) -> CliResult<()>;

    /// Contribution, payout or lifecycle change that was committed
    fn success(&self, msg: &str) -> CliResult<()> {
        self.print(&format!("✅ {}", msg))
    }

    fn warning(&self, msg: &str) -> CliResult<()> {
        self.print(&format!("⚠️  {}", msg))
    }

    fn info(&self, msg: &str) -> CliResult<()> {
        self.print(&format!("ℹ️  {}", msg))
    }

    /// Underlined title above a table
    fn header(&self, title: &str) -> CliResult<()> {
        self.print(&format!("\n{}\n{}", title, "=".repeat(title.chars().count())))
    }
}

/// Stdout for results, stderr for errors
pub struct ConsoleOutput;

impl Output for ConsoleOutput {
    fn print(&self, msg: &str) -> CliResult<()> {
        println!("{}", msg);
        Ok(())
    }

    fn error(&self, msg: &str) -> CliResult<()> {
        eprintln!("❌ {}", msg);
        Ok(())
    }
}

/// Capturing output for tests of command handlers and sessions
pub mod testing {
    use super::*;
    use std::cell::RefCell;

    /// One captured line, tagged with the stream it went to
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Line {
        Out(String),
        Err(String),
    }

    /// Records everything a session prints, in order
    #[derive(Default)]
    pub struct MockOutput {
        transcript: RefCell<Vec<Line>>,
    }

    impl MockOutput {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every line in the order it was printed
        pub fn transcript(&self) -> Vec<Line> {
            self.transcript.borrow().clone()
        }

        pub fn messages(&self) -> Vec<String> {
            self.stream(|line| match line {
                Line::Out(text) => Some(text),
                Line::Err(_) => None,
            })
        }

        pub fn errors(&self) -> Vec<String> {
            self.stream(|line| match line {
                Line::Err(text) => Some(text),
                Line::Out(_) => None,
            })
        }

        pub fn expect_message(&self, needle: &str) {
            let messages = self.messages();
            assert!(
                messages.iter().any(|m| m.contains(needle)),
                "no printed line mentions '{}': {:#?}",
                needle,
                messages
            );
        }

        pub fn expect_error(&self, needle: &str) {
            let errors = self.errors();
            assert!(
                errors.iter().any(|e| e.contains(needle)),
                "no error line mentions '{}': {:#?}",
                needle,
                errors
            );
        }

        fn stream(&self, pick: impl Fn(&Line) -> Option<&String>) -> Vec<String> {
            self.transcript.borrow().iter().filter_map(|l| pick(l).cloned()).collect()
        }

        fn record(&self, line: Line) -> CliResult<()> {
            self.transcript.borrow_mut().push(line);
            Ok(())
        }
    }

    impl Output for MockOutput {
        fn print(&self, msg: &str) -> CliResult<()> {
            self.record(Line::Out(msg.to_string()))
        }

        fn error(&self, msg: &str) -> CliResult<()> {
            self.record(Line::Err(msg.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_transcript_keeps_interleaved_order() {
        let output = MockOutput::new();
        output.print("chitfund:Family> collect Zed").unwrap();
        output.error("Member not found: Zed").unwrap();
        output.print("2 of 3 contributed").unwrap();

        assert_eq!(
            output.transcript(),
            vec![
                Line::Out("chitfund:Family> collect Zed".to_string()),
                Line::Err("Member not found: Zed".to_string()),
                Line::Out("2 of 3 contributed".to_string()),
            ]
        );
        assert_eq!(output.messages().len(), 2);
        output.expect_error("Zed");
    }

    #[test]
    fn test_decorated_lines_go_to_stdout() {
        let output = MockOutput::new();
        output.success("Asha paid 100 for round 1").unwrap();
        output.warning("Round 3 was the last round").unwrap();
        output.info("Ben and Chitra have not paid").unwrap();
        output.header("Round 2").unwrap();

        assert!(output.errors().is_empty());
        let printed = output.messages();
        assert!(printed[0].starts_with("✅ Asha"));
        assert!(printed[1].starts_with("⚠️"));
        assert!(printed[2].ends_with("have not paid"));
        assert!(printed[3].ends_with("Round 2\n======="));
    }

    #[test]
    fn test_json_is_pretty_printed() {
        let output = MockOutput::new();
        output.print_json(&serde_json::json!({"fund": "Family", "pool": 300})).unwrap();

        let printed = output.messages();
        assert_eq!(printed.len(), 1);
        assert!(printed[0].contains("\n"));
        let parsed: serde_json::Value = serde_json::from_str(&printed[0]).unwrap();
        assert_eq!(parsed["pool"], 300);
    }
}
