pub const COOKIE_SESSION: &str = "session";
pub const COOKIE_USERNAME: &str = "username";
/// One-shot error message for the next rendering of a form page.
pub const COOKIE_ERROR: &str = "error";
