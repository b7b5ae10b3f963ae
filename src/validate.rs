/// Usernames double as the nickname shown on the welcome page.
pub fn username(value: &str) -> bool {
    value.len() >= 3
        && value.starts_with(|c: char| c.is_ascii_alphanumeric())
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub fn password(value: &str) -> bool {
    value.chars().count() >= 6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames() {
        assert!(username("Alice"));
        assert!(username("bob_99"));
        assert!(username("1-x"));

        assert!(!username("al"));
        assert!(!username("_alice"));
        assert!(!username("al ice"));
        assert!(!username("<b>alice</b>"));
        assert!(!username("älice"));
    }

    #[test]
    fn passwords() {
        assert!(password("secret"));
        assert!(password("ääääää"));
        assert!(!password("short"));
        assert!(!password(""));
    }
}
