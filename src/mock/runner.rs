//! Canned process output

use std::cell::RefCell;

use crate::process::{CommandRunner, ProcessError, ToolOutput};

#[derive(Debug, Clone)]
enum Reply {
    Output(ToolOutput),
    Missing,
}

#[derive(Debug, Clone)]
struct Rule {
    prefix: Vec<String>,
    reply: Reply,
}

/// Command runner answering from scripted rules.
///
/// A rule matches when its whitespace-separated tokens are a prefix of
/// `program args...`; the longest matching prefix wins. Invocations no rule
/// matches behave as if the program were not installed.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    rules: RefCell<Vec<Rule>>,
    calls: RefCell<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands starting with `prefix` with `output`
    pub fn on(&self, prefix: &str, output: ToolOutput) -> &Self {
        self.push(prefix, Reply::Output(output));
        self
    }

    /// Make commands starting with `prefix` fail as not installed
    pub fn missing(&self, prefix: &str) -> &Self {
        self.push(prefix, Reply::Missing);
        self
    }

    fn push(&self, prefix: &str, reply: Reply) {
        self.rules.borrow_mut().push(Rule {
            prefix: prefix.split_whitespace().map(str::to_string).collect(),
            reply,
        });
    }

    /// Every invocation so far as `program args...`
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    /// Number of invocations starting with `prefix`
    pub fn calls_to(&self, prefix: &str) -> usize {
        let tokens: Vec<&str> = prefix.split_whitespace().collect();
        self.calls
            .borrow()
            .iter()
            .filter(|argv| starts_with(argv, &tokens))
            .count()
    }
}

fn starts_with<S: AsRef<str>>(argv: &[String], prefix: &[S]) -> bool {
    prefix.len() <= argv.len()
        && prefix
            .iter()
            .zip(argv)
            .all(|(want, got)| want.as_ref() == got)
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<ToolOutput, ProcessError> {
        let argv: Vec<String> = std::iter::once(program)
            .chain(args.iter().copied())
            .map(str::to_string)
            .collect();
        self.calls.borrow_mut().push(argv.clone());

        let rules = self.rules.borrow();
        let rule = rules
            .iter()
            .filter(|rule| starts_with(&argv, &rule.prefix))
            .max_by_key(|rule| rule.prefix.len());

        match rule.map(|r| &r.reply) {
            Some(Reply::Output(output)) => Ok(output.clone()),
            Some(Reply::Missing) | None => Err(ProcessError::NotFound(program.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_prefix_wins() {
        let runner = ScriptedRunner::new();
        runner
            .on("adb", ToolOutput::ok("generic"))
            .on("adb shell df", ToolOutput::ok("df table"));

        assert_eq!(runner.run("adb", &["shell", "df"]).unwrap().text, "df table");
        assert_eq!(runner.run("adb", &["devices"]).unwrap().text, "generic");
        assert_eq!(runner.calls_to("adb shell"), 1);
        assert_eq!(runner.calls_to("adb"), 2);
    }

    #[test]
    fn test_unscripted_program_is_missing() {
        let runner = ScriptedRunner::new();
        assert!(matches!(
            runner.run("jarsigner", &["-keystore", "k"]),
            Err(ProcessError::NotFound(p)) if p == "jarsigner"
        ));
        assert_eq!(runner.calls().len(), 1);
    }
}
