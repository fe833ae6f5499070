use std::fmt::Debug;

use chrono::{DateTime, Duration, Utc};
use semval::prelude::*;
use serde::{Deserialize, Serialize};

use crate::store::Document;

use super::password::{Password, PasswordInvalidity};

/// Youngest age, in years, a registered user may have.
pub const MINIMUM_AGE_YEARS: i64 = 15;

/// A registered user and their running account balance.
///
/// The balance is only ever changed through the balance adjuster; profile
/// operations replace every other field but never compute a new balance.
#[derive(Clone, Deserialize, PartialEq, Serialize)]
pub struct User {
    pub id: String,
    pub user_name: String,
    pub password: String,
    pub email: String,
    pub phone: String,
    pub birth_date: DateTime<Utc>,
    pub balance: f64,
}

impl Document for User {
    type Key = String;

    const COLLECTION: &'static str = "users";

    fn key(&self) -> String {
        self.id.clone()
    }
}

impl Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("user_name", &self.user_name)
            // Don't include the raw password in debug output.
            .field("password", &"*".repeat(8))
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("birth_date", &self.birth_date)
            .field("balance", &self.balance)
            .finish()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UserIdInvalidity {
    /// The identifier is not exactly nine ASCII digits.
    NotNineDigits,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UserNameInvalidity {
    /// The display name is empty after trimming whitespace.
    Empty,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PhoneInvalidity {
    /// The number matches neither the mobile nor the landline dial pattern.
    UnrecognizedDialPattern,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BirthDateInvalidity {
    /// The birth date implies an age below the minimum. The required age in
    /// years is contained as a value.
    MinimumAge(i64),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UserInvalidity {
    Id(UserIdInvalidity),
    UserName(UserNameInvalidity),
    Password(PasswordInvalidity),
    Phone(PhoneInvalidity),
    BirthDate(BirthDateInvalidity),
}

impl Validate for User {
    type Invalidity = UserInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(
                !is_nine_digits(&self.id),
                UserInvalidity::Id(UserIdInvalidity::NotNineDigits),
            )
            .invalidate_if(
                self.user_name.trim().is_empty(),
                UserInvalidity::UserName(UserNameInvalidity::Empty),
            )
            .validate_with(&Password(&self.password), UserInvalidity::Password)
            .invalidate_if(
                !is_dial_pattern(&self.phone),
                UserInvalidity::Phone(PhoneInvalidity::UnrecognizedDialPattern),
            )
            .invalidate_if(
                self.birth_date > latest_allowed_birth_date(),
                UserInvalidity::BirthDate(BirthDateInvalidity::MinimumAge(MINIMUM_AGE_YEARS)),
            )
            .into()
    }
}

pub(crate) fn is_nine_digits(value: &str) -> bool {
    value.len() == 9 && value.chars().all(|c| c.is_ascii_digit())
}

fn all_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Accepts the two regional dial patterns: `05X-YYYYYYY` for mobile numbers
/// and `0X-YYYYYYY` for landlines.
fn is_dial_pattern(phone: &str) -> bool {
    let (prefix, line) = match phone.split_once('-') {
        Some(parts) => parts,
        None => return false,
    };

    if line.len() != 7 || !all_digits(line) {
        return false;
    }

    let mobile = prefix.len() == 3 && prefix.starts_with("05") && all_digits(prefix);
    let landline = prefix.len() == 2 && prefix.starts_with('0') && all_digits(prefix);

    mobile || landline
}

/// The most recent birth date that still satisfies the minimum age.
fn latest_allowed_birth_date() -> DateTime<Utc> {
    // Roughly MINIMUM_AGE_YEARS years; leap days are ignored, matching the
    // observed behavior.
    Utc::now() - Duration::days(MINIMUM_AGE_YEARS * 365)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_user() -> User {
        User {
            id: "325962801".to_owned(),
            user_name: "Dana Levi".to_owned(),
            password: "Sup3r&Secret".to_owned(),
            email: "dana@example.com".to_owned(),
            phone: "052-1234567".to_owned(),
            birth_date: Utc::now() - Duration::days(30 * 365),
            balance: 9557.0,
        }
    }

    #[test]
    fn valid_user_passes_validation() {
        assert!(valid_user().validate().is_ok());
    }

    #[test]
    fn short_id_is_invalid() {
        let mut user = valid_user();
        user.id = "12345".to_owned();

        let context = user.validate().unwrap_err();

        assert!(context
            .into_iter()
            .any(|i| i == UserInvalidity::Id(UserIdInvalidity::NotNineDigits)));
    }

    #[test]
    fn non_numeric_id_is_invalid() {
        let mut user = valid_user();
        user.id = "32596280a".to_owned();

        assert!(user.validate().is_err());
    }

    #[test]
    fn blank_user_name_is_invalid() {
        let mut user = valid_user();
        user.user_name = "   ".to_owned();

        let context = user.validate().unwrap_err();

        assert!(context
            .into_iter()
            .any(|i| i == UserInvalidity::UserName(UserNameInvalidity::Empty)));
    }

    #[test]
    fn landline_phone_is_valid() {
        let mut user = valid_user();
        user.phone = "02-1234567".to_owned();

        assert!(user.validate().is_ok());
    }

    #[test]
    fn unrecognized_phone_is_invalid() {
        let mut user = valid_user();
        user.phone = "123-4567890".to_owned();

        let context = user.validate().unwrap_err();

        assert!(context
            .into_iter()
            .any(|i| i == UserInvalidity::Phone(PhoneInvalidity::UnrecognizedDialPattern)));
    }

    #[test]
    fn underage_user_is_invalid() {
        let mut user = valid_user();
        user.birth_date = Utc::now() - Duration::days(10 * 365);

        let context = user.validate().unwrap_err();

        assert!(context.into_iter().any(|i| i
            == UserInvalidity::BirthDate(BirthDateInvalidity::MinimumAge(MINIMUM_AGE_YEARS))));
    }

    #[test]
    fn weak_password_is_reported_through_user_validation() {
        let mut user = valid_user();
        user.password = "weak".to_owned();

        let context = user.validate().unwrap_err();

        assert!(context
            .into_iter()
            .any(|i| matches!(i, UserInvalidity::Password(_))));
    }
}
