//! Token masking for log output.

const VISIBLE: usize = 4;

/// Masks a token so it can be logged.
///
/// Keeps at most the first and last four characters; tokens too short to
/// leave anything hidden are masked completely.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= VISIBLE * 3 {
        return "***".to_string();
    }

    let head: String = chars[..VISIBLE].iter().collect();
    let tail: String = chars[chars.len() - VISIBLE..].iter().collect();
    format!("{}***{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_tokens_keep_head_and_tail() {
        assert_eq!(mask_token("abcdefghijklmnopqrstuvwxyz"), "abcd***wxyz");
    }

    #[test]
    fn short_tokens_are_fully_masked() {
        assert_eq!(mask_token(""), "***");
        assert_eq!(mask_token("abcdefgh"), "***");
        assert_eq!(mask_token("abcdefghijkl"), "***");
    }

    #[test]
    fn multibyte_tokens_do_not_panic() {
        assert_eq!(mask_token("ééééééééééééééé"), "éééé***éééé");
    }
}
