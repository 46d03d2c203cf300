/// Maps a raw continuation token into loop state: `None` means the service
/// has no more pages. Some services omit the token on the last page, others
/// send an empty string; both end the loop, but an empty string must not be
/// confused with "first request".
pub fn continuation(token: Option<&str>) -> Option<String> {
    match token {
        Some(t) if !t.is_empty() => Some(t.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::continuation;

    #[test]
    fn absent_token_ends_pagination() {
        assert_eq!(continuation(None), None);
    }

    #[test]
    fn empty_token_ends_pagination() {
        assert_eq!(continuation(Some("")), None);
    }

    #[test]
    fn real_token_continues() {
        assert_eq!(continuation(Some("tok1")), Some("tok1".to_string()));
    }

    #[test]
    fn token_sequence_terminates_after_empty() {
        let pages = [Some("tok1"), Some("tok2"), Some("")];
        let mut fetched = 0;
        let mut cursor: Option<String> = None;
        for page in pages {
            fetched += 1;
            cursor = continuation(page);
            if cursor.is_none() {
                break;
            }
        }
        assert_eq!(fetched, 3);
        assert_eq!(cursor, None);
    }
}
