//! Billing form and its validation state machine.
//!
//! ```text
//! Editing --submit--> Validating --all filled--> Accepted
//!    ^                    |
//!    |                    +--any empty---> Rejected
//!    +------ set_field ---------------------+
//! ```
//!
//! A field holding only whitespace counts as empty.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The seven required billing fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BillingField {
    FirstName,
    LastName,
    Address,
    City,
    ZipCode,
    Phone,
    Email,
}

impl BillingField {
    pub const ALL: [Self; 7] = [
        Self::FirstName,
        Self::LastName,
        Self::Address,
        Self::City,
        Self::ZipCode,
        Self::Phone,
        Self::Email,
    ];

    /// Form field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Address => "address",
            Self::City => "city",
            Self::ZipCode => "zipCode",
            Self::Phone => "phone",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for BillingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown field name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown billing field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for BillingField {
    type Err = UnknownField;

    /// Accepts both `zipCode` and `zip_code` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Billing details entered by the shopper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BillingForm {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub phone: String,
    pub email: String,
}

impl BillingForm {
    #[must_use]
    pub fn get(&self, field: BillingField) -> &str {
        match field {
            BillingField::FirstName => &self.first_name,
            BillingField::LastName => &self.last_name,
            BillingField::Address => &self.address,
            BillingField::City => &self.city,
            BillingField::ZipCode => &self.zip_code,
            BillingField::Phone => &self.phone,
            BillingField::Email => &self.email,
        }
    }

    fn slot(&mut self, field: BillingField) -> &mut String {
        match field {
            BillingField::FirstName => &mut self.first_name,
            BillingField::LastName => &mut self.last_name,
            BillingField::Address => &mut self.address,
            BillingField::City => &mut self.city,
            BillingField::ZipCode => &mut self.zip_code,
            BillingField::Phone => &mut self.phone,
            BillingField::Email => &mut self.email,
        }
    }

    /// Whether `field` holds something other than whitespace.
    #[must_use]
    pub fn is_filled(&self, field: BillingField) -> bool {
        !self.get(field).trim().is_empty()
    }
}

/// Per-field "required" error flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
    pub first_name: bool,
    pub last_name: bool,
    pub address: bool,
    pub city: bool,
    pub zip_code: bool,
    pub phone: bool,
    pub email: bool,
}

impl FieldErrors {
    /// Flags for every empty field of `form`.
    #[must_use]
    pub fn check(form: &BillingForm) -> Self {
        let mut errors = Self::default();
        for field in BillingField::ALL {
            *errors.flag(field) = !form.is_filled(field);
        }
        errors
    }

    #[must_use]
    pub const fn get(&self, field: BillingField) -> bool {
        match field {
            BillingField::FirstName => self.first_name,
            BillingField::LastName => self.last_name,
            BillingField::Address => self.address,
            BillingField::City => self.city,
            BillingField::ZipCode => self.zip_code,
            BillingField::Phone => self.phone,
            BillingField::Email => self.email,
        }
    }

    fn flag(&mut self, field: BillingField) -> &mut bool {
        match field {
            BillingField::FirstName => &mut self.first_name,
            BillingField::LastName => &mut self.last_name,
            BillingField::Address => &mut self.address,
            BillingField::City => &mut self.city,
            BillingField::ZipCode => &mut self.zip_code,
            BillingField::Phone => &mut self.phone,
            BillingField::Email => &mut self.email,
        }
    }

    #[must_use]
    pub fn any(&self) -> bool {
        BillingField::ALL.into_iter().any(|field| self.get(field))
    }

    /// Fields currently flagged.
    pub fn fields(&self) -> impl Iterator<Item = BillingField> + '_ {
        BillingField::ALL.into_iter().filter(|field| self.get(*field))
    }
}

/// Where the form is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    #[default]
    Editing,
    Validating,
    Accepted,
    Rejected,
}

/// The checkout form: values, error flags and phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    values: BillingForm,
    errors: FieldErrors,
    phase: FormPhase,
}

impl CheckoutForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Change one field and return to editing.
    ///
    /// The field's error flag is cleared once it holds a non-empty value.
    pub fn set_field(&mut self, field: BillingField, value: impl Into<String>) {
        *self.values.slot(field) = value.into();
        if self.values.is_filled(field) {
            *self.errors.flag(field) = false;
        }
        self.phase = FormPhase::Editing;
    }

    /// Check every required field.
    ///
    /// # Errors
    ///
    /// Returns the error flags, and moves to [`FormPhase::Rejected`], when
    /// any field is empty. On success the form stays in
    /// [`FormPhase::Validating`] until the submission settles.
    pub fn validate(&mut self) -> Result<BillingForm, FieldErrors> {
        self.phase = FormPhase::Validating;
        self.errors = FieldErrors::check(&self.values);

        if self.errors.any() {
            self.phase = FormPhase::Rejected;
            return Err(self.errors);
        }
        Ok(self.values.clone())
    }

    /// The order was placed: discard the entered values.
    pub fn accept(&mut self) {
        self.values = BillingForm::default();
        self.errors = FieldErrors::default();
        self.phase = FormPhase::Accepted;
    }

    /// Submission failed after validation; keep the values for another try.
    pub fn resume_editing(&mut self) {
        self.phase = FormPhase::Editing;
    }

    #[must_use]
    pub const fn values(&self) -> &BillingForm {
        &self.values
    }

    #[must_use]
    pub const fn errors(&self) -> FieldErrors {
        self.errors
    }

    #[must_use]
    pub const fn phase(&self) -> FormPhase {
        self.phase
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn filled_form() -> CheckoutForm {
        let mut form = CheckoutForm::new();
        form.set_field(BillingField::FirstName, "Ada");
        form.set_field(BillingField::LastName, "Lovelace");
        form.set_field(BillingField::Address, "12 Analytical Row");
        form.set_field(BillingField::City, "London");
        form.set_field(BillingField::ZipCode, "01234");
        form.set_field(BillingField::Phone, "+44 20 7946 0000");
        form.set_field(BillingField::Email, "ada@example.com");
        form
    }

    #[test]
    fn test_empty_form_flags_every_field() {
        let mut form = CheckoutForm::new();
        let errors = form.validate().unwrap_err();

        assert_eq!(errors.fields().count(), 7);
        assert_eq!(form.phase(), FormPhase::Rejected);
    }

    #[test]
    fn test_whitespace_counts_as_empty() {
        let mut form = filled_form();
        form.set_field(BillingField::City, "   ");
        let errors = form.validate().unwrap_err();

        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![BillingField::City]);
    }

    #[test]
    fn test_editing_clears_flag_once_filled() {
        let mut form = CheckoutForm::new();
        form.validate().unwrap_err();

        form.set_field(BillingField::Email, "");
        assert!(form.errors().get(BillingField::Email));
        assert_eq!(form.phase(), FormPhase::Editing);

        form.set_field(BillingField::Email, "ada@example.com");
        assert!(!form.errors().get(BillingField::Email));
        assert!(form.errors().get(BillingField::Phone));
    }

    #[test]
    fn test_valid_form_stays_validating() {
        let mut form = filled_form();
        let billing = form.validate().unwrap();

        assert_eq!(billing.first_name, "Ada");
        assert_eq!(form.phase(), FormPhase::Validating);
        assert!(!form.errors().any());
    }

    #[test]
    fn test_accept_discards_values() {
        let mut form = filled_form();
        form.validate().unwrap();
        form.accept();

        assert_eq!(form.phase(), FormPhase::Accepted);
        assert_eq!(form.values(), &BillingForm::default());
    }

    #[test]
    fn test_field_names() {
        assert_eq!("zipCode".parse::<BillingField>().unwrap(), BillingField::ZipCode);
        assert_eq!("zip_code".parse::<BillingField>().unwrap(), BillingField::ZipCode);
        assert_eq!("FIRSTNAME".parse::<BillingField>().unwrap(), BillingField::FirstName);
        assert!("country".parse::<BillingField>().is_err());
    }

    #[test]
    fn test_errors_serialize_camel_case() {
        let json = serde_json::to_value(FieldErrors::check(&BillingForm::default())).unwrap();
        assert_eq!(json["zipCode"], true);
    }
}
