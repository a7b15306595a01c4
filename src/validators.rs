
pub const MAX_LOGIN_LENGTH: usize = 39;
pub const MAX_QUERY_LENGTH: usize = 256;

pub fn is_str_valid_length(value: &str, min: usize, max: usize) -> bool {
    let length = value.chars().count();
    if !(length >= min) {
        return false;
    }
    if !(length <= max) {
        return false;
    }
    true
}

// Alphanumerics and hyphens only. Older accounts may start or end with a hyphen.
pub fn is_github_login(value: &str) -> bool {
    is_str_valid_length(value, 1, MAX_LOGIN_LENGTH)
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

pub fn is_search_query(value: &str) -> bool {
    is_str_valid_length(value, 1, MAX_QUERY_LENGTH)
}
