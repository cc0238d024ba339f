/// Mask a credential for logging, keeping only its last four characters.
///
/// Values of eight characters or fewer are fully masked.
pub fn redact_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 8 {
        return "***".to_string();
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("***{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_tail_of_long_secrets() {
        let redacted = redact_secret("AIzaSyExampleKey1234");
        assert_eq!(redacted, "***1234");
        assert!(!redacted.contains("AIza"));
    }

    #[test]
    fn masks_short_secrets_entirely() {
        assert_eq!(redact_secret("abc"), "***");
        assert_eq!(redact_secret(""), "***");
    }
}
