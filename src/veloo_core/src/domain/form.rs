use std::fmt;

use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ports::gateway::Payload;

/// The only state sellers can register in for now.
pub const DEFAULT_STATE: &str = "kwara";

/// Registration form fields, named as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FirstName,
    LastName,
    BusinessEmail,
    Password,
    PhoneNumber,
    BusinessType,
    State,
    Location,
    AgreeToTerms,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::FirstName,
        Field::LastName,
        Field::BusinessEmail,
        Field::Password,
        Field::PhoneNumber,
        Field::BusinessType,
        Field::State,
        Field::Location,
        Field::AgreeToTerms,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::BusinessEmail => "businessEmail",
            Field::Password => "password",
            Field::PhoneNumber => "phoneNumber",
            Field::BusinessType => "businessType",
            Field::State => "state",
            Field::Location => "location",
            Field::AgreeToTerms => "agreeToTerms",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusinessType {
    Shop,
    Restaurant,
    ServiceProvider,
}

impl BusinessType {
    pub const ALL: [BusinessType; 3] = [
        BusinessType::Shop,
        BusinessType::Restaurant,
        BusinessType::ServiceProvider,
    ];

    pub const fn value(self) -> &'static str {
        match self {
            BusinessType::Shop => "shop",
            BusinessType::Restaurant => "restaurant",
            BusinessType::ServiceProvider => "service-provider",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            BusinessType::Shop => "Shop",
            BusinessType::Restaurant => "Restaurant",
            BusinessType::ServiceProvider => "Service Provider",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.value() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Ilorin,
    Malete,
}

impl Location {
    pub const ALL: [Location; 2] = [Location::Ilorin, Location::Malete];

    pub const fn value(self) -> &'static str {
        match self {
            Location::Ilorin => "ilorin",
            Location::Malete => "malete",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Location::Ilorin => "Ilorin",
            Location::Malete => "Malete",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|location| location.value() == value)
    }
}

/// A single user edit to the registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEdit {
    FirstName(String),
    LastName(String),
    BusinessEmail(String),
    Password(String),
    PhoneNumber(String),
    BusinessType(String),
    State(String),
    Location(String),
    AgreeToTerms(bool),
}

impl FormEdit {
    pub fn field(&self) -> Field {
        match self {
            FormEdit::FirstName(_) => Field::FirstName,
            FormEdit::LastName(_) => Field::LastName,
            FormEdit::BusinessEmail(_) => Field::BusinessEmail,
            FormEdit::Password(_) => Field::Password,
            FormEdit::PhoneNumber(_) => Field::PhoneNumber,
            FormEdit::BusinessType(_) => Field::BusinessType,
            FormEdit::State(_) => Field::State,
            FormEdit::Location(_) => Field::Location,
            FormEdit::AgreeToTerms(_) => Field::AgreeToTerms,
        }
    }

    /// Builds an edit from a field name and its textual value.
    ///
    /// `agreeToTerms` accepts `true`/`false`; anything else yields `None`.
    pub fn from_text(field: Field, value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        Some(match field {
            Field::FirstName => FormEdit::FirstName(value),
            Field::LastName => FormEdit::LastName(value),
            Field::BusinessEmail => FormEdit::BusinessEmail(value),
            Field::Password => FormEdit::Password(value),
            Field::PhoneNumber => FormEdit::PhoneNumber(value),
            Field::BusinessType => FormEdit::BusinessType(value),
            Field::State => FormEdit::State(value),
            Field::Location => FormEdit::Location(value),
            Field::AgreeToTerms => FormEdit::AgreeToTerms(value.parse().ok()?),
        })
    }
}

/// Seller registration data as collected by the signup form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    first_name: String,
    last_name: String,
    business_email: String,
    #[serde(
        serialize_with = "serialize_secret",
        deserialize_with = "deserialize_secret"
    )]
    password: Secret<String>,
    phone_number: String,
    business_type: String,
    #[serde(default = "default_state")]
    state: String,
    location: String,
    agree_to_terms: bool,
}

impl FormData {
    pub fn new() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            business_email: String::new(),
            password: Secret::new(String::new()),
            phone_number: String::new(),
            business_type: String::new(),
            state: default_state(),
            location: String::new(),
            agree_to_terms: false,
        }
    }

    /// Applies an edit. Returns false when the field is not user-editable.
    pub fn apply(&mut self, edit: FormEdit) -> bool {
        match edit {
            FormEdit::FirstName(value) => self.first_name = value,
            FormEdit::LastName(value) => self.last_name = value,
            FormEdit::BusinessEmail(value) => self.business_email = value,
            FormEdit::Password(value) => self.password = Secret::new(value),
            FormEdit::PhoneNumber(value) => self.phone_number = value,
            FormEdit::BusinessType(value) => self.business_type = value,
            FormEdit::State(_) => return false,
            FormEdit::Location(value) => self.location = value,
            FormEdit::AgreeToTerms(value) => self.agree_to_terms = value,
        }
        true
    }

    pub fn with(mut self, edit: FormEdit) -> Self {
        self.apply(edit);
        self
    }

    /// Forces fields that are not user-controlled back to their fixed values.
    pub fn normalized(mut self) -> Self {
        self.state = default_state();
        self
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn business_email(&self) -> &str {
        &self.business_email
    }

    pub fn password(&self) -> &Secret<String> {
        &self.password
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn business_type(&self) -> &str {
        &self.business_type
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn agree_to_terms(&self) -> bool {
        self.agree_to_terms
    }

    pub fn selected_business_type(&self) -> Option<BusinessType> {
        BusinessType::from_value(&self.business_type)
    }

    pub fn selected_location(&self) -> Option<Location> {
        Location::from_value(&self.location)
    }

    /// Registration payload, in form field order.
    pub fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.push(Field::FirstName.as_str(), &self.first_name);
        payload.push(Field::LastName.as_str(), &self.last_name);
        payload.push(Field::BusinessEmail.as_str(), &self.business_email);
        payload.push(Field::Password.as_str(), self.password.expose_secret());
        payload.push(Field::PhoneNumber.as_str(), &self.phone_number);
        payload.push(Field::BusinessType.as_str(), &self.business_type);
        payload.push(Field::State.as_str(), &self.state);
        payload.push(Field::Location.as_str(), &self.location);
        payload.push(
            Field::AgreeToTerms.as_str(),
            if self.agree_to_terms { "true" } else { "false" },
        );
        payload
    }
}

impl Default for FormData {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for FormData {
    fn eq(&self, other: &Self) -> bool {
        self.first_name == other.first_name
            && self.last_name == other.last_name
            && self.business_email == other.business_email
            && self.password.expose_secret() == other.password.expose_secret()
            && self.phone_number == other.phone_number
            && self.business_type == other.business_type
            && self.state == other.state
            && self.location == other.location
            && self.agree_to_terms == other.agree_to_terms
    }
}

impl Eq for FormData {}

fn default_state() -> String {
    DEFAULT_STATE.to_string()
}

fn serialize_secret<S>(secret: &Secret<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(secret.expose_secret())
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Secret<String>, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(Secret::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> FormData {
        FormData::new()
            .with(FormEdit::FirstName("Ada".into()))
            .with(FormEdit::LastName("Obi".into()))
            .with(FormEdit::BusinessEmail("ada@shop.ng".into()))
            .with(FormEdit::Password("Str0ng!pass".into()))
            .with(FormEdit::PhoneNumber("0803 123 4567".into()))
            .with(FormEdit::BusinessType("shop".into()))
            .with(FormEdit::Location("ilorin".into()))
            .with(FormEdit::AgreeToTerms(true))
    }

    #[test]
    fn test_state_is_not_editable() {
        let mut form = FormData::new();
        assert!(!form.apply(FormEdit::State("lagos".into())));
        assert_eq!(form.state(), DEFAULT_STATE);
    }

    #[test]
    fn test_json_uses_camel_case_and_round_trips_password() {
        let form = filled();
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["businessEmail"], "ada@shop.ng");
        assert_eq!(json["agreeToTerms"], true);
        assert_eq!(json["password"], "Str0ng!pass");

        let restored: FormData = serde_json::from_value(json).unwrap();
        assert_eq!(restored, form);
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", filled());
        assert!(!rendered.contains("Str0ng!pass"));
    }

    #[test]
    fn test_normalized_restores_fixed_state() {
        let json = serde_json::json!({
            "firstName": "", "lastName": "", "businessEmail": "", "password": "",
            "phoneNumber": "", "businessType": "", "state": "lagos",
            "location": "", "agreeToTerms": false
        });
        let form: FormData = serde_json::from_value(json).unwrap();
        assert_eq!(form.normalized().state(), DEFAULT_STATE);
    }

    #[test]
    fn test_payload_lists_every_field() {
        let payload = filled().to_payload();
        assert_eq!(payload.len(), Field::ALL.len());
        assert_eq!(payload.get("state"), Some(DEFAULT_STATE));
        assert_eq!(payload.get("agreeToTerms"), Some("true"));
        assert_eq!(payload.get("password"), Some("Str0ng!pass"));
    }

    #[test]
    fn test_option_sets() {
        assert_eq!(
            BusinessType::from_value("service-provider"),
            Some(BusinessType::ServiceProvider)
        );
        assert_eq!(BusinessType::from_value("Shop"), None);
        assert_eq!(Location::from_value("malete").map(Location::label), Some("Malete"));
        assert_eq!(Field::parse("phoneNumber"), Some(Field::PhoneNumber));
    }

    #[test]
    fn test_agree_to_terms_from_text() {
        assert_eq!(
            FormEdit::from_text(Field::AgreeToTerms, "true"),
            Some(FormEdit::AgreeToTerms(true))
        );
        assert_eq!(FormEdit::from_text(Field::AgreeToTerms, "yes"), None);
    }
}
