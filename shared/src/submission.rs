use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::identity::Identity;

/// Field names the relay form expects for each value. The default form has
/// no city or store entries, so those are only sent once a field is named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub prize: String,
    pub city: Option<String>,
    pub store: Option<String>,
}

impl Default for FormFields {
    fn default() -> Self {
        Self {
            name: NAME_FIELD.to_string(),
            phone: PHONE_FIELD.to_string(),
            email: EMAIL_FIELD.to_string(),
            prize: PRIZE_FIELD.to_string(),
            city: None,
            store: None,
        }
    }
}

/// Builds the url-encoded form body posted to the relay. City and store are
/// only included when the player picked them and the form has a field for them.
pub fn build_submission_form(
    identity: &Identity,
    prize: &str,
    fields: &FormFields,
) -> Vec<(String, String)> {
    let mut form = vec![
        (fields.name.clone(), identity.full_name.clone()),
        (fields.phone.clone(), identity.phone.clone()),
        (fields.email.clone(), identity.email.clone()),
        (fields.prize.clone(), prize.to_string()),
    ];
    if let (Some(field), Some(city)) = (&fields.city, &identity.city) {
        form.push((field.clone(), city.clone()));
    }
    if let (Some(field), Some(store)) = (&fields.store, &identity.store) {
        form.push((field.clone(), store.clone()));
    }
    form
}
