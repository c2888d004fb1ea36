//! jarsigner output classification.

/// Confirmation line jarsigner prints after a successful signature.
pub const SIGNED_MARKER: &str = "jar signed.";

/// What a jarsigner run that exited cleanly actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOutcome {
    /// The confirmation marker was present.
    Signed,
    /// Anything else. The target file must be treated as unusable.
    Rejected,
}

/// Classify combined stdout/stderr of a jarsigner invocation.
pub fn classify_sign_output(output: &str) -> SignOutcome {
    if output.contains(SIGNED_MARKER) {
        SignOutcome::Signed
    } else {
        SignOutcome::Rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_marker_is_signed() {
        assert_eq!(classify_sign_output("jar signed."), SignOutcome::Signed);
    }

    #[test]
    fn test_marker_with_warnings_is_signed() {
        let out = "jar signed.\n\nWarning: \nThe signer's certificate is self-signed.\n";
        assert_eq!(classify_sign_output(out), SignOutcome::Signed);
    }

    #[test]
    fn test_other_output_is_rejected() {
        assert_eq!(
            classify_sign_output("jarsigner: unable to sign jar: java.util.zip.ZipException"),
            SignOutcome::Rejected
        );
        assert_eq!(classify_sign_output(""), SignOutcome::Rejected);
    }
}
