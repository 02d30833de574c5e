//! Environment variable validation with helpful warnings
//!
//! Invalid values never abort a run: they are reported with a Levenshtein
//! based suggestion and the variable is treated as unset.

use tracing::warn;

/// Validator for environment variable values
pub struct EnvVarValidator<'a> {
    var_name: &'a str,
    valid_values: &'a [&'a str],
}

impl<'a> EnvVarValidator<'a> {
    /// Create a new validator for the given environment variable
    pub fn new(var_name: &'a str, valid_values: &'a [&'a str]) -> Self {
        Self {
            var_name,
            valid_values,
        }
    }

    /// Parse a value, logging a warning and returning `None` when it is invalid.
    pub fn parse<T, F>(&self, value: &str, parser: F) -> Option<T>
    where
        F: Fn(&str) -> Option<T>,
    {
        match self.check(value, parser) {
            Ok(parsed) => Some(parsed),
            Err(message) => {
                warn!("{}", message);
                None
            }
        }
    }

    /// Parse a value, returning the warning text for invalid input.
    pub fn check<T, F>(&self, value: &str, parser: F) -> Result<T, String>
    where
        F: Fn(&str) -> Option<T>,
    {
        parser(value).ok_or_else(|| {
            format!(
                "invalid {} value '{}'{}; valid values: {}",
                self.var_name,
                value,
                self.suggest(value),
                self.valid_values.join(", ")
            )
        })
    }

    fn suggest(&self, value: &str) -> String {
        let input = value.to_lowercase();
        match closest(&input, self.valid_values) {
            Some((suggested, dist)) if dist > 0 => format!(". Did you mean '{}'?", suggested),
            _ => String::new(),
        }
    }
}

/// Closest candidate within two edits of `input`, with its distance.
pub fn closest<'c>(input: &str, candidates: &[&'c str]) -> Option<(&'c str, usize)> {
    let mut best: Option<(&str, usize)> = None;
    for &candidate in candidates {
        let dist = levenshtein(input, candidate);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((candidate, dist)),
        }
    }
    best.filter(|(_, dist)| *dist <= 2)
}

/// Simple Levenshtein distance for typo detection
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    if a_bytes.is_empty() {
        return b_bytes.len();
    }
    if b_bytes.is_empty() {
        return a_bytes.len();
    }

    let mut prev_row: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr_row: Vec<usize> = vec![0; b_bytes.len() + 1];

    for (i, a_char) in a_bytes.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, b_char) in b_bytes.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_bytes.len()]
}

/// Lenient boolean parsing used for flag-like variables.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Accepted spellings for [`parse_bool`].
pub const BOOL_VALUES: &[&str] = &["true", "false", "1", "0", "yes", "no", "on", "off"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein("test", "test"), 0);
    }

    #[test]
    fn test_levenshtein_typos() {
        assert_eq!(levenshtein("asset_pth", "asset_path"), 1);
        assert_eq!(levenshtein("flase", "false"), 2);
        assert_eq!(levenshtein("", "abc"), 3);
    }

    #[test]
    fn test_parse_bool_spellings() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" 0 "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_env_validator_valid_value() {
        let validator = EnvVarValidator::new("STUBPACK_CLEAN_LOCALCACHE", BOOL_VALUES);
        assert_eq!(validator.check("yes", parse_bool), Ok(true));
    }

    #[test]
    fn test_env_validator_suggestion_typo() {
        let validator = EnvVarValidator::new("STUBPACK_CLEAN_LOCALCACHE", BOOL_VALUES);
        let msg = validator.check("treu", parse_bool).unwrap_err();

        assert!(msg.contains("STUBPACK_CLEAN_LOCALCACHE"), "{}", msg);
        assert!(msg.contains("Did you mean 'true'?"), "{}", msg);
    }

    #[test]
    fn test_env_validator_no_suggestion_for_distant_value() {
        let validator = EnvVarValidator::new("TEST", BOOL_VALUES);
        let msg = validator
            .check("something_completely_different", parse_bool)
            .unwrap_err();

        assert!(!msg.contains("Did you mean"), "{}", msg);
        assert!(msg.contains("valid values: true, false"), "{}", msg);
    }

    #[test]
    fn test_parse_returns_none_for_invalid() {
        let validator = EnvVarValidator::new("TEST", BOOL_VALUES);
        assert_eq!(validator.parse("nope", parse_bool), None);
    }
}
