//! Operator prompts
//!
//! Blocking, line-based questions on stdin. End of input counts as an empty
//! answer, which always selects the default.

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::device::DataPolicy;
use crate::error::{DeployError, DeployResult};
use crate::version::VersionRequest;

/// Something that can answer a prompt with one line of text
pub trait Operator {
    fn ask(&mut self, prompt: &str) -> io::Result<String>;
}

/// Operator at the terminal
#[derive(Debug, Default)]
pub struct StdinOperator;

impl Operator for StdinOperator {
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

fn ask(operator: &mut dyn Operator, prompt: &str) -> DeployResult<String> {
    operator
        .ask(prompt)
        .map_err(|e| DeployError::io("<stdin>", e))
}

/// `Version: [latest] `. Blank selects the latest build.
pub fn ask_version(operator: &mut dyn Operator) -> DeployResult<VersionRequest> {
    let answer = ask(operator, "Version: [latest] ")?;
    VersionRequest::parse(&answer)
}

/// `Do you want to keep all user data? [Y/n] `. Only `n` or `no` wipes.
pub fn ask_data_policy(operator: &mut dyn Operator) -> DeployResult<DataPolicy> {
    let answer = ask(operator, "Do you want to keep all user data? [Y/n] ")?;
    Ok(match answer.trim().to_lowercase().as_str() {
        "n" | "no" => DataPolicy::Wipe,
        _ => DataPolicy::Keep,
    })
}

/// `Press Enter to exit...`. Input errors are only logged; the run is over.
pub fn acknowledge(operator: &mut dyn Operator) {
    if let Err(e) = operator.ask("Press Enter to exit...") {
        debug!(error = %e, "acknowledgment not read");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::ScriptedOperator;
    use crate::version::BuildVersion;

    #[test]
    fn test_blank_version_is_latest() {
        let mut operator = ScriptedOperator::new([""]);
        assert_eq!(ask_version(&mut operator).unwrap(), VersionRequest::Latest);
        assert_eq!(operator.prompts(), vec!["Version: [latest] ".to_string()]);
    }

    #[test]
    fn test_pinned_version() {
        let mut operator = ScriptedOperator::new(["1231"]);
        assert_eq!(
            ask_version(&mut operator).unwrap(),
            VersionRequest::Pinned(BuildVersion::new(1231))
        );
    }

    #[test]
    fn test_garbage_version_is_rejected() {
        let mut operator = ScriptedOperator::new(["yesterday"]);
        assert!(matches!(
            ask_version(&mut operator),
            Err(DeployError::InvalidVersion(_))
        ));
    }

    #[test]
    fn test_data_policy_answers() {
        for (answer, expected) in [
            ("", DataPolicy::Keep),
            ("y", DataPolicy::Keep),
            ("YES", DataPolicy::Keep),
            ("whatever", DataPolicy::Keep),
            ("n", DataPolicy::Wipe),
            ("No", DataPolicy::Wipe),
            (" NO ", DataPolicy::Wipe),
        ] {
            let mut operator = ScriptedOperator::new([answer]);
            assert_eq!(ask_data_policy(&mut operator).unwrap(), expected, "{:?}", answer);
        }
    }

    struct ClosedInput;

    impl Operator for ClosedInput {
        fn ask(&mut self, _prompt: &str) -> io::Result<String> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdin closed"))
        }
    }

    #[test]
    fn test_acknowledge_tolerates_closed_input() {
        acknowledge(&mut ClosedInput);
        assert!(matches!(
            ask_version(&mut ClosedInput),
            Err(DeployError::Io { .. })
        ));
    }

    #[test]
    fn test_exhausted_operator_takes_defaults() {
        let mut operator = ScriptedOperator::new(Vec::<String>::new());
        assert_eq!(ask_version(&mut operator).unwrap(), VersionRequest::Latest);
        assert_eq!(ask_data_policy(&mut operator).unwrap(), DataPolicy::Keep);
        acknowledge(&mut operator);
        assert_eq!(operator.prompts().len(), 3);
    }
}
