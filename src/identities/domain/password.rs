use std::fmt::Debug;

use semval::prelude::*;

const MIN_PASSWORD_LENGTH: usize = 8;
const SPECIAL_CHARACTERS: &str = "!@#$%^&*";

/// A validation view over a user's stored password.
pub struct Password<'a>(pub &'a str);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PasswordInvalidity {
    /// The value is smaller than the minimum allowable length for a
    /// password. The min length is contained as a value.
    MinLength(usize),
    MissingUppercase,
    MissingLowercase,
    MissingDigit,
    /// The value contains none of the accepted special characters.
    MissingSpecialCharacter,
}

impl Validate for Password<'_> {
    type Invalidity = PasswordInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(
                self.0.len() < MIN_PASSWORD_LENGTH,
                PasswordInvalidity::MinLength(MIN_PASSWORD_LENGTH),
            )
            .invalidate_if(
                !self.0.chars().any(|c| c.is_ascii_uppercase()),
                PasswordInvalidity::MissingUppercase,
            )
            .invalidate_if(
                !self.0.chars().any(|c| c.is_ascii_lowercase()),
                PasswordInvalidity::MissingLowercase,
            )
            .invalidate_if(
                !self.0.chars().any(|c| c.is_ascii_digit()),
                PasswordInvalidity::MissingDigit,
            )
            .invalidate_if(
                !self.0.chars().any(|c| SPECIAL_CHARACTERS.contains(c)),
                PasswordInvalidity::MissingSpecialCharacter,
            )
            .into()
    }
}

impl Debug for Password<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Don't include the raw password in debug output.
        f.debug_tuple("Password").field(&"*".repeat(8)).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_does_not_contain_value() {
        let raw_password = "some-very-unique-string";
        let password = Password(raw_password);

        let debugged = format!("{:?}", password);

        assert!(!debugged.contains(raw_password));
    }

    #[test]
    fn complex_password_is_valid() {
        assert!(Password("Str0ng&Secret").validate().is_ok());
    }

    #[test]
    fn short_password_is_invalid() {
        let context = Password("A1&a").validate().unwrap_err();

        assert!(context
            .into_iter()
            .any(|i| i == PasswordInvalidity::MinLength(MIN_PASSWORD_LENGTH)));
    }

    #[test]
    fn missing_character_classes_are_reported() {
        let context = Password("alllowercase").validate().unwrap_err();
        let invalidities: Vec<_> = context.into_iter().collect();

        assert!(invalidities.contains(&PasswordInvalidity::MissingUppercase));
        assert!(invalidities.contains(&PasswordInvalidity::MissingDigit));
        assert!(invalidities.contains(&PasswordInvalidity::MissingSpecialCharacter));
        assert!(!invalidities.contains(&PasswordInvalidity::MissingLowercase));
    }
}
