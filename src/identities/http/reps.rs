use semval::context::Context as ValidationContext;
use serde::Deserialize;

use crate::identities::domain::{
    password::PasswordInvalidity,
    users::{
        BirthDateInvalidity, PhoneInvalidity, UserIdInvalidity, UserInvalidity, UserNameInvalidity,
    },
};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Flatten a validation context into a single user-correctable message.
pub fn user_validation_message(validation: ValidationContext<UserInvalidity>) -> String {
    let messages: Vec<String> = validation
        .into_iter()
        .map(|invalidity| match invalidity {
            UserInvalidity::Id(UserIdInvalidity::NotNineDigits) => {
                "id must be exactly 9 digits.".to_owned()
            }
            UserInvalidity::UserName(UserNameInvalidity::Empty) => {
                "user_name must not be empty.".to_owned()
            }
            UserInvalidity::Password(password_invalidity) => match password_invalidity {
                PasswordInvalidity::MinLength(min) => {
                    format!("password must be at least {} characters long.", min)
                }
                PasswordInvalidity::MissingUppercase => {
                    "password must contain at least one uppercase letter.".to_owned()
                }
                PasswordInvalidity::MissingLowercase => {
                    "password must contain at least one lowercase letter.".to_owned()
                }
                PasswordInvalidity::MissingDigit => {
                    "password must contain at least one number.".to_owned()
                }
                PasswordInvalidity::MissingSpecialCharacter => {
                    "password must contain at least one special character.".to_owned()
                }
            },
            UserInvalidity::Phone(PhoneInvalidity::UnrecognizedDialPattern) => {
                "phone must be in the format 05X-YYYYYYY or 0X-YYYYYYY.".to_owned()
            }
            UserInvalidity::BirthDate(BirthDateInvalidity::MinimumAge(years)) => {
                format!("user must be at least {} years old.", years)
            }
        })
        .collect();

    messages.join(" ")
}
