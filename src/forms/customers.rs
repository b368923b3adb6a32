use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::customer::NewCustomer;
use crate::forms::{optional_text, sanitize_inline_text};

const NAME_MAX_LEN: u64 = 255;
const EMAIL_MAX_LEN: u64 = 255;
const PHONE_MAX_LEN: u64 = 25;
const STATE_MAX_LEN: u64 = 25;
const ZIP_CODE_MAX_LEN: u64 = 5;

pub type CustomerFormResult<T> = Result<T, CustomerFormError>;

/// Errors that can occur while processing customer forms.
#[derive(Debug, Error)]
pub enum CustomerFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// A name is empty after sanitization.
    #[error("{field} cannot be empty")]
    EmptyName { field: &'static str },
}

/// Payload of `POST /v1/customers`.
#[derive(Debug, Deserialize, Validate)]
pub struct AddCustomerForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub first_name: String,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub last_name: String,
    #[validate(email, length(max = EMAIL_MAX_LEN))]
    pub email: String,
    #[validate(length(max = PHONE_MAX_LEN))]
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    #[validate(length(max = STATE_MAX_LEN))]
    pub state: Option<String>,
    #[validate(length(max = ZIP_CODE_MAX_LEN))]
    pub zip_code: Option<String>,
}

impl AddCustomerForm {
    /// Validates and sanitizes the payload into a [`NewCustomer`]. Emails are
    /// stored lowercase.
    pub fn into_new_customer(self) -> CustomerFormResult<NewCustomer> {
        self.validate()?;

        let first_name = sanitize_inline_text(&self.first_name);
        if first_name.is_empty() {
            return Err(CustomerFormError::EmptyName {
                field: "first_name",
            });
        }
        let last_name = sanitize_inline_text(&self.last_name);
        if last_name.is_empty() {
            return Err(CustomerFormError::EmptyName { field: "last_name" });
        }

        let email = self.email.trim().to_lowercase();
        let mut new_customer = NewCustomer::new(first_name, last_name, email).with_address(
            optional_text(self.street.as_deref()),
            optional_text(self.city.as_deref()),
            optional_text(self.state.as_deref()),
            optional_text(self.zip_code.as_deref()),
        );

        if let Some(phone) = optional_text(self.phone.as_deref()) {
            new_customer = new_customer.with_phone(phone);
        }

        Ok(new_customer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> AddCustomerForm {
        AddCustomerForm {
            first_name: "  Debra ".to_string(),
            last_name: "Burks".to_string(),
            email: "Debra.Burks@Yahoo.com ".to_string(),
            phone: Some("  ".to_string()),
            street: Some("9273 Thorne Ave.".to_string()),
            city: Some("Orchard  Park".to_string()),
            state: Some("NY".to_string()),
            zip_code: Some("14127".to_string()),
        }
    }

    #[test]
    fn sanitizes_fields() {
        let customer = form().into_new_customer().unwrap();
        assert_eq!(customer.first_name, "Debra");
        assert_eq!(customer.email, "debra.burks@yahoo.com");
        assert_eq!(customer.phone, None);
        assert_eq!(customer.city.as_deref(), Some("Orchard Park"));
        assert_eq!(customer.customer_id, None);
    }

    #[test]
    fn rejects_invalid_email() {
        let mut form = form();
        form.email = "not-an-email".to_string();
        assert!(matches!(
            form.into_new_customer(),
            Err(CustomerFormError::Validation(_))
        ));
    }

    #[test]
    fn rejects_blank_names() {
        let mut form = form();
        form.last_name = "\u{7}".to_string();
        assert!(matches!(
            form.into_new_customer(),
            Err(CustomerFormError::EmptyName { field: "last_name" })
        ));
    }
}
