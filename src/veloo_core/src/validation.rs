//! Field validation and password scoring for the signup form.
//!
//! Everything here is pure: the controllers call these functions on demand and
//! never cache their results.

use std::sync::LazyLock;

use regex::Regex;
use secrecy::ExposeSecret;

use crate::domain::{
    email::is_email_shaped,
    form::{BusinessType, Field, FormData, Location},
    form_errors::FormErrors,
    password_strength::{PasswordStrength, StrengthLabel},
};

/// Lowest score a password needs to be accepted.
pub const MIN_PASSWORD_SCORE: u8 = 3;

static PHONE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s\-()]{7,}$").expect("phone pattern is a valid regex"));

type Criterion = (fn(&str) -> bool, &'static str);

// Scoring order is also the order feedback is reported in.
const CRITERIA: [Criterion; 5] = [
    (|p| p.chars().count() >= 8, "At least 8 characters"),
    (|p| p.chars().any(|c| c.is_ascii_lowercase()), "One lowercase letter"),
    (|p| p.chars().any(|c| c.is_ascii_uppercase()), "One uppercase letter"),
    (|p| p.chars().any(|c| c.is_ascii_digit()), "One number"),
    (
        |p| p.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()),
        "One special character",
    ),
];

pub fn is_valid_email(candidate: &str) -> bool {
    is_email_shaped(candidate)
}

pub fn score_password(password: &str) -> PasswordStrength {
    let mut score = 0;
    let mut feedback = Vec::new();
    for (is_met, description) in CRITERIA {
        if is_met(password) {
            score += 1;
        } else {
            feedback.push(description);
        }
    }

    let strength = StrengthLabel::from_score(score);
    PasswordStrength {
        score,
        strength,
        color: strength.color(),
        feedback,
    }
}

/// Checks every field independently and reports all failures together.
pub fn validate(form: &FormData) -> FormErrors {
    let mut errors = FormErrors::new();

    if form.first_name().trim().is_empty() {
        errors.insert(Field::FirstName, "First name is required");
    }
    if form.last_name().trim().is_empty() {
        errors.insert(Field::LastName, "Last name is required");
    }

    if form.business_email().trim().is_empty() {
        errors.insert(Field::BusinessEmail, "Business email is required");
    } else if !is_valid_email(form.business_email()) {
        errors.insert(Field::BusinessEmail, "Invalid email format");
    }

    let password = form.password().expose_secret();
    if password.is_empty() {
        errors.insert(Field::Password, "Password is required");
    } else if score_password(password).score < MIN_PASSWORD_SCORE {
        errors.insert(Field::Password, "Password is too weak");
    }

    if form.phone_number().trim().is_empty() {
        errors.insert(Field::PhoneNumber, "Phone number is required");
    } else if !PHONE_NUMBER.is_match(form.phone_number()) {
        errors.insert(Field::PhoneNumber, "Invalid phone number");
    }

    if BusinessType::from_value(form.business_type()).is_none() {
        errors.insert(Field::BusinessType, "Business type is required");
    }
    if Location::from_value(form.location()).is_none() {
        errors.insert(Field::Location, "Location is required");
    }

    if !form.agree_to_terms() {
        errors.insert(
            Field::AgreeToTerms,
            "You must agree to the terms and conditions",
        );
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::form::FormEdit;
    use fake::Fake;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::{FirstName, LastName};
    use quickcheck_macros::quickcheck;

    fn valid_form() -> FormData {
        let email: String = SafeEmail().fake();
        FormData::new()
            .with(FormEdit::FirstName(FirstName().fake()))
            .with(FormEdit::LastName(LastName().fake()))
            .with(FormEdit::BusinessEmail(email))
            .with(FormEdit::Password("Market#2024".into()))
            .with(FormEdit::PhoneNumber("(0803) 555-0199".into()))
            .with(FormEdit::BusinessType("restaurant".into()))
            .with(FormEdit::Location("malete".into()))
            .with(FormEdit::AgreeToTerms(true))
    }

    #[test]
    fn test_empty_form_reports_eight_fields() {
        let errors = validate(&FormData::new());
        assert_eq!(errors.len(), 8);
        assert!(!errors.contains(Field::State));
        assert_eq!(errors.get(Field::Password), Some("Password is required"));
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(validate(&valid_form()).is_empty());
    }

    #[test]
    fn test_whitespace_names_are_rejected() {
        let form = valid_form().with(FormEdit::FirstName("   ".into()));
        let errors = validate(&form);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::FirstName), Some("First name is required"));
    }

    #[test]
    fn test_password_messages_distinguish_required_and_weak() {
        let weak = valid_form().with(FormEdit::Password("abc".into()));
        assert_eq!(validate(&weak).get(Field::Password), Some("Password is too weak"));

        let medium = valid_form().with(FormEdit::Password("abcdefG1".into()));
        assert!(!validate(&medium).contains(Field::Password));
    }

    #[test]
    fn test_email_and_phone_formats() {
        let form = valid_form()
            .with(FormEdit::BusinessEmail("seller.at.shop".into()))
            .with(FormEdit::PhoneNumber("12ab567".into()));
        let errors = validate(&form);
        assert_eq!(errors.get(Field::BusinessEmail), Some("Invalid email format"));
        assert_eq!(errors.get(Field::PhoneNumber), Some("Invalid phone number"));

        let short = valid_form().with(FormEdit::PhoneNumber("123456".into()));
        assert!(validate(&short).contains(Field::PhoneNumber));
    }

    #[test]
    fn test_unknown_options_are_rejected() {
        let form = valid_form()
            .with(FormEdit::BusinessType("spaceship".into()))
            .with(FormEdit::Location("lagos".into()));
        let errors = validate(&form);
        assert_eq!(errors.get(Field::BusinessType), Some("Business type is required"));
        assert_eq!(errors.get(Field::Location), Some("Location is required"));
    }

    #[test]
    fn test_score_climbs_as_criteria_are_added() {
        let steps = [
            ("a", 1, "Very Weak"),
            ("a1", 2, "Weak"),
            ("a1B", 3, "Medium"),
            ("a1B!", 4, "Strong"),
            ("a1B!longenough", 5, "Very Strong"),
        ];
        for (password, score, label) in steps {
            let strength = score_password(password);
            assert_eq!(strength.score, score, "{password}");
            assert_eq!(strength.strength.as_str(), label, "{password}");
        }
    }

    #[test]
    fn test_feedback_follows_rule_order() {
        let strength = score_password("");
        assert_eq!(strength.score, 0);
        assert_eq!(strength.color, "bg-red-500");
        assert_eq!(
            strength.feedback,
            vec![
                "At least 8 characters",
                "One lowercase letter",
                "One uppercase letter",
                "One number",
                "One special character",
            ]
        );
    }

    #[test]
    fn test_whitespace_is_not_special() {
        let strength = score_password("abc DEF");
        assert_eq!(strength.feedback, vec!["At least 8 characters", "One number", "One special character"]);
    }

    #[quickcheck]
    fn prop_appending_never_lowers_score(base: String, suffix: String) -> bool {
        let extended = format!("{base}{suffix}");
        score_password(&extended).score >= score_password(&base).score
    }

    #[quickcheck]
    fn prop_score_and_feedback_cover_all_criteria(password: String) -> bool {
        let strength = score_password(&password);
        usize::from(strength.score) + strength.feedback.len() == CRITERIA.len()
    }
}
