/// Extract the enrollment identifier from a scanned QR payload.
///
/// The payload is scanned line by line; the first line beginning with the
/// literal prefix `Enrollment:` wins, and everything after that first colon
/// is returned with surrounding whitespace trimmed. A payload with no
/// matching line yields an empty string rather than an error: malformed
/// payload policy is delegated entirely to the server.
pub fn extract_enrollment(payload: &str) -> String {
    for line in payload.lines() {
        if let Some(rest) = line.strip_prefix("Enrollment:") {
            return rest.trim().to_string();
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_trimmed_identifier() {
        assert_eq!(extract_enrollment("Name: A\nEnrollment:  12AB34  \n"), "12AB34");
    }

    #[test]
    fn returns_empty_when_no_line_matches() {
        assert_eq!(extract_enrollment("hello\nworld"), "");
        assert_eq!(extract_enrollment(""), "");
    }

    #[test]
    fn first_matching_line_wins() {
        assert_eq!(extract_enrollment("Enrollment:1\nEnrollment:2"), "1");
    }

    #[test]
    fn keeps_everything_after_the_first_colon() {
        // Identifiers may themselves contain colons.
        assert_eq!(extract_enrollment("Enrollment: 2021:CS:042"), "2021:CS:042");
    }

    #[test]
    fn prefix_must_start_the_line() {
        assert_eq!(extract_enrollment("  Enrollment: 99"), "");
        assert_eq!(extract_enrollment("My Enrollment: 99"), "");
    }

    #[test]
    fn handles_crlf_payloads() {
        assert_eq!(extract_enrollment("Name: A\r\nEnrollment: 7Z\r\n"), "7Z");
    }
}
