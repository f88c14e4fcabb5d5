//! Client-side form validation. Everything here runs before any network call;
//! a failing check means the request is never issued.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::error;

/// Institutional email domain accepted at login and registration.
pub const INSTITUTIONAL_DOMAIN: &str = "@epn.edu.ec";
pub const PASSWORD_MIN_LEN: usize = 7;
pub const PASSWORD_MAX_LEN: usize = 20;
pub const NAME_MIN_LEN: usize = 3;
pub const NAME_MAX_LEN: usize = 15;
pub const CODE_LEN: usize = 6;
/// Special characters a registration password must draw from.
pub const PASSWORD_SPECIALS: &str = "!@#$%^&*";

static PHONE_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^09[0-9]{8}$"));
static NAME_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-záéíóúÁÉÍÓÚñÑ ]+$"));

/// Matches `value` against a compiled pattern. A pattern that failed to
/// compile rejects every value and is logged on each use.
fn matches_pattern(pattern: &LazyLock<Result<Regex, regex::Error>>, value: &str) -> bool {
    match &**pattern {
        Ok(regex) => regex.is_match(value),
        Err(err) => {
            error!("Invalid validation pattern: {err}");
            false
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Only @epn.edu.ec emails are accepted")]
    EmailDomain,
    #[error("Password must be between 7 and 20 characters")]
    PasswordLength,
    #[error("Password must include a lowercase letter")]
    PasswordLowercase,
    #[error("Password must include an uppercase letter")]
    PasswordUppercase,
    #[error("Password must include a number")]
    PasswordDigit,
    #[error("Password must include a special character (!@#$%^&*)")]
    PasswordSpecial,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Phone format: 09XXXXXXXX")]
    Phone,
    #[error("{field}: between 3 and 15 characters")]
    NameLength { field: &'static str },
    #[error("{field}: letters and spaces only")]
    NameCharacters { field: &'static str },
    #[error("The code must be 6 digits")]
    Code,
    #[error("{0} is required")]
    Required(&'static str),
    #[error("You must accept the terms and conditions")]
    Terms,
}

/// # Errors
/// Returns `ValidationError::EmailDomain` unless the address ends with the institutional domain.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    let local = email.strip_suffix(INSTITUTIONAL_DOMAIN).unwrap_or_default();
    if local.is_empty() || local.contains(['@', ' ']) {
        return Err(ValidationError::EmailDomain);
    }
    Ok(())
}

/// Length-only check used by the login and password reset forms.
///
/// # Errors
/// Returns `ValidationError::PasswordLength` when out of range.
pub fn validate_password_length(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if (PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        Ok(())
    } else {
        Err(ValidationError::PasswordLength)
    }
}

/// Full strength check used at registration.
///
/// # Errors
/// Returns the first rule the password breaks.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    validate_password_length(password)?;
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(ValidationError::PasswordLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::PasswordUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PasswordDigit);
    }
    if !password.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        return Err(ValidationError::PasswordSpecial);
    }
    Ok(())
}

/// # Errors
/// Returns `ValidationError::PasswordMismatch` when the two entries differ.
pub fn validate_confirmation(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if password == confirmation {
        Ok(())
    } else {
        Err(ValidationError::PasswordMismatch)
    }
}

/// # Errors
/// Returns `ValidationError::Phone` unless the number is `09` plus eight digits.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if matches_pattern(&PHONE_PATTERN, phone.trim()) {
        Ok(())
    } else {
        Err(ValidationError::Phone)
    }
}

/// # Errors
/// Returns a length or character error naming `field`.
pub fn validate_name(field: &'static str, name: &str) -> Result<(), ValidationError> {
    let len = name.chars().count();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        return Err(ValidationError::NameLength { field });
    }
    if !matches_pattern(&NAME_PATTERN, name) {
        return Err(ValidationError::NameCharacters { field });
    }
    Ok(())
}

/// # Errors
/// Returns `ValidationError::Code` unless the code is exactly six ASCII digits.
pub fn validate_code(code: &str) -> Result<(), ValidationError> {
    let code = code.trim();
    if code.len() == CODE_LEN && code.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::Code)
    }
}

/// # Errors
/// Returns `ValidationError::Required` when the trimmed value is empty.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_requires_institutional_domain() {
        assert!(validate_email("test@epn.edu.ec").is_ok());
        assert!(validate_email("  maria.gonzalez@epn.edu.ec ").is_ok());
        for email in [
            "test@gmail.com",
            "@epn.edu.ec",
            "test@epn.edu.ec.evil.com",
            "a@b@epn.edu.ec",
            "test@EPN.edu.ec.com",
            "",
        ] {
            assert_eq!(
                validate_email(email),
                Err(ValidationError::EmailDomain),
                "{email}"
            );
        }
    }

    #[test]
    fn password_length_bounds() {
        assert_eq!(validate_password_length("abcdef"), Err(ValidationError::PasswordLength));
        assert!(validate_password_length("abcdefg").is_ok());
        assert!(validate_password_length(&"a".repeat(20)).is_ok());
        assert_eq!(
            validate_password_length(&"a".repeat(21)),
            Err(ValidationError::PasswordLength)
        );
    }

    #[test]
    fn password_strength_rules() {
        assert!(validate_password_strength("Abc123!").is_ok());
        assert!(validate_password_strength("Zz9^zzzzzzzzzzzzzzzz").is_ok());
        assert_eq!(validate_password_strength("Ab1!"), Err(ValidationError::PasswordLength));
        assert_eq!(validate_password_strength("ABC123!"), Err(ValidationError::PasswordLowercase));
        assert_eq!(validate_password_strength("abc123!"), Err(ValidationError::PasswordUppercase));
        assert_eq!(validate_password_strength("Abcdef!"), Err(ValidationError::PasswordDigit));
        assert_eq!(validate_password_strength("Abc1234"), Err(ValidationError::PasswordSpecial));
        // only the listed specials count
        assert_eq!(validate_password_strength("Abc123?"), Err(ValidationError::PasswordSpecial));
    }

    #[test]
    fn confirmation_must_match() {
        assert!(validate_confirmation("Abc123!", "Abc123!").is_ok());
        assert_eq!(
            validate_confirmation("Abc123!", "Abc123?"),
            Err(ValidationError::PasswordMismatch)
        );
    }

    #[test]
    fn patterns_compile() {
        assert!(PHONE_PATTERN.is_ok());
        assert!(NAME_PATTERN.is_ok());
    }

    #[test]
    fn phone_format() {
        assert!(validate_phone("0991234567").is_ok());
        assert_eq!(validate_phone("0891234567"), Err(ValidationError::Phone));
        assert_eq!(validate_phone("099123456"), Err(ValidationError::Phone));
        assert_eq!(validate_phone("09912345678"), Err(ValidationError::Phone));
        assert_eq!(validate_phone("09912a4567"), Err(ValidationError::Phone));
    }

    #[test]
    fn names_allow_spanish_letters() {
        assert!(validate_name("First name", "María José").is_ok());
        assert!(validate_name("Last name", "Núñez").is_ok());
        assert_eq!(
            validate_name("First name", "Al"),
            Err(ValidationError::NameLength { field: "First name" })
        );
        assert_eq!(
            validate_name("First name", "Carlos Alberto Ruiz"),
            Err(ValidationError::NameLength { field: "First name" })
        );
        assert_eq!(
            validate_name("Last name", "O'Brien"),
            Err(ValidationError::NameCharacters { field: "Last name" })
        );
    }

    #[test]
    fn verification_code_is_six_digits() {
        assert!(validate_code("123456").is_ok());
        assert!(validate_code(" 000000 ").is_ok());
        assert_eq!(validate_code("12345"), Err(ValidationError::Code));
        assert_eq!(validate_code("12345a"), Err(ValidationError::Code));
        assert_eq!(validate_code("١٢٣٤٥٦"), Err(ValidationError::Code));
    }

    #[test]
    fn require_rejects_blank() {
        assert_eq!(require("Token", "   "), Err(ValidationError::Required("Token")));
        assert!(require("Token", "abc").is_ok());
    }
}
