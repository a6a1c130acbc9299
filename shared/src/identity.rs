use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::constants::*;
use crate::stores;
use crate::validation::*;

/// Who is playing. Built once from the entry form and never changed while
/// the play lasts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_location", skip_on_field_errors = false))]
pub struct Identity {
    #[validate(custom = "validate_full_name")]
    pub full_name: String,
    #[validate(custom = "validate_contact")]
    pub phone: String,
    #[validate(custom = "validate_email")]
    pub email: String,
    pub city: Option<String>,
    pub store: Option<String>,
}

fn validate_location(identity: &Identity) -> Result<(), ValidationError> {
    match (identity.city.as_deref(), identity.store.as_deref()) {
        (None, None) => Ok(()),
        (None, Some(_)) => Err(location_error("store_without_city", INVALID_STORE_ERROR)),
        (Some(city), store) => {
            if stores::stores_for(city).is_none() {
                return Err(location_error("unknown_city", INVALID_CITY_ERROR));
            }
            match store {
                Some(store) if !stores::is_known_store(city, store) => {
                    Err(location_error("unknown_store", INVALID_STORE_ERROR))
                }
                _ => Ok(()),
            }
        }
    }
}

fn location_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl Identity {
    pub fn new(full_name: &str, phone: &str, email: &str) -> Self {
        Self {
            full_name: full_name.trim().to_string(),
            phone: phone.trim().to_string(),
            email: email.trim().to_string(),
            city: None,
            store: None,
        }
    }

    pub fn with_location(mut self, city: Option<String>, store: Option<String>) -> Self {
        self.city = non_blank(city);
        self.store = non_blank(store);
        self
    }

    /// Consumes the identity and hands it back only if every field checks out.
    pub fn validated(self) -> Result<Self, ValidationErrors> {
        self.validate()?;
        Ok(self)
    }

    pub fn normalized_phone(&self) -> String {
        normalize_phone(&self.phone)
    }

    /// Name, phone and email are all the relay needs to record an entry.
    pub fn has_required_fields(&self) -> bool {
        !self.full_name.trim().is_empty()
            && !self.normalized_phone().is_empty()
            && !self.email.trim().is_empty()
    }
}

/// Picks the message of the first failing field for a one-line notice.
pub fn first_error_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);
    fields
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Please check your details".to_string())
}
