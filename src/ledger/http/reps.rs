use semval::context::Context as ValidationContext;
use serde::Deserialize;

use crate::ledger::domain::{
    AmountInvalidity, EntryDateInvalidity, EntryInvalidity, OwnerIdInvalidity,
};

/// Scopes ledger reads and deletes to the requesting user.
#[derive(Deserialize)]
pub struct OwnerQuery {
    pub user_id: String,
}

/// Flatten a validation context into a single user-correctable message.
pub fn entry_validation_message(validation: ValidationContext<EntryInvalidity>) -> String {
    let messages: Vec<String> = validation
        .into_iter()
        .map(|invalidity| match invalidity {
            EntryInvalidity::OwnerId(OwnerIdInvalidity::NotNineDigits) => {
                "userId must be exactly 9 digits.".to_owned()
            }
            EntryInvalidity::Amount(AmountInvalidity::Negative) => {
                "amount must not be negative.".to_owned()
            }
            EntryInvalidity::Date(EntryDateInvalidity::InFuture) => {
                "date cannot be in the future.".to_owned()
            }
        })
        .collect();

    messages.join(" ")
}
