//! Line-oriented terminal front end for the onboarding flow.

use std::fmt::Write;

use thiserror::Error;
use veloo_application::{
    DropdownKind, FlowSnapshot, SignupView, UiEvent, VerificationState, VerificationView,
};
use veloo_core::{BusinessType, Field, FormEdit, Location, OTP_LENGTH};

pub const HELP: &str = "\
Signup:
  set <field> <value>     firstName lastName businessEmail password phoneNumber
  agree [no]              accept (or withdraw from) the terms and conditions
  show-password           toggle password visibility
  toggle <dropdown>       business-type | location
  pick <dropdown> <value> shop restaurant service-provider | ilorin malete
  click                   click outside the dropdowns
  submit
Verification:
  digit <slot> <d>        type a digit (or nothing) into slot 0-4
  backspace <slot>
  focus <slot>
  paste <text>
  verify | resend
  edit-email | email <text> | update-email | cancel-email
  back                    return to signup
Other:
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Event(UiEvent),
    Click,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command `{0}`, try `help`")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("Unknown field `{0}`")]
    UnknownField(String),
    #[error("Unknown dropdown `{0}`, expected business-type or location")]
    UnknownDropdown(String),
    #[error("`{value}` is not a {kind} option")]
    UnknownOption { kind: &'static str, value: String },
    #[error("`{0}` is not a code slot")]
    InvalidSlot(String),
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (name, rest) = line
        .split_once(char::is_whitespace)
        .map(|(name, rest)| (name, rest.trim()))
        .unwrap_or((line, ""));

    let command = match name {
        "set" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .map(|(field, value)| (field, value.trim()))
                .unwrap_or((rest, ""));
            if field.is_empty() {
                return Err(CommandError::Usage("set <field> <value>"));
            }
            let field = Field::parse(field)
                .ok_or_else(|| CommandError::UnknownField(field.to_string()))?;
            let edit = FormEdit::from_text(field, value)
                .ok_or(CommandError::Usage("set agreeToTerms <true|false>"))?;
            Command::Event(UiEvent::Edit(edit))
        }
        "agree" => Command::Event(UiEvent::Edit(FormEdit::AgreeToTerms(!matches!(
            rest,
            "no" | "false"
        )))),
        "show-password" => Command::Event(UiEvent::TogglePasswordVisibility),
        "toggle" => Command::Event(UiEvent::ToggleDropdown(parse_dropdown(rest)?)),
        "pick" => {
            let (dropdown, value) = rest
                .split_once(char::is_whitespace)
                .ok_or(CommandError::Usage("pick <dropdown> <value>"))?;
            let value = value.trim();
            let event = match parse_dropdown(dropdown)? {
                DropdownKind::BusinessType => BusinessType::from_value(value)
                    .map(UiEvent::SelectBusinessType)
                    .ok_or_else(|| CommandError::UnknownOption {
                        kind: "business type",
                        value: value.to_string(),
                    })?,
                DropdownKind::Location => Location::from_value(value)
                    .map(UiEvent::SelectLocation)
                    .ok_or_else(|| CommandError::UnknownOption {
                        kind: "location",
                        value: value.to_string(),
                    })?,
            };
            Command::Event(event)
        }
        "click" => Command::Click,
        "submit" => Command::Event(UiEvent::Submit),
        "digit" => {
            let (slot, value) = rest
                .split_once(char::is_whitespace)
                .map(|(slot, value)| (slot, value.trim()))
                .unwrap_or((rest, ""));
            Command::Event(UiEvent::OtpInput {
                index: parse_slot(slot)?,
                value: value.to_string(),
            })
        }
        "backspace" => Command::Event(UiEvent::OtpBackspace {
            index: parse_slot(rest)?,
        }),
        "focus" => Command::Event(UiEvent::FocusOtpSlot(parse_slot(rest)?)),
        "paste" => Command::Event(UiEvent::OtpPaste(rest.to_string())),
        "verify" => Command::Event(UiEvent::Verify),
        "resend" => Command::Event(UiEvent::Resend),
        "edit-email" => Command::Event(UiEvent::StartEmailEdit),
        "email" => Command::Event(UiEvent::SetEmailDraft(rest.to_string())),
        "update-email" => Command::Event(UiEvent::UpdateEmail),
        "cancel-email" => Command::Event(UiEvent::CancelEmailEdit),
        "back" => Command::Event(UiEvent::BackToSignup),
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn parse_dropdown(name: &str) -> Result<DropdownKind, CommandError> {
    match name {
        "business-type" | "businessType" => Ok(DropdownKind::BusinessType),
        "location" => Ok(DropdownKind::Location),
        other => Err(CommandError::UnknownDropdown(other.to_string())),
    }
}

fn parse_slot(text: &str) -> Result<usize, CommandError> {
    text.parse::<usize>()
        .ok()
        .filter(|slot| *slot < OTP_LENGTH)
        .ok_or_else(|| CommandError::InvalidSlot(text.to_string()))
}

pub fn render(snapshot: &FlowSnapshot) -> String {
    match snapshot {
        FlowSnapshot::Signup(view) => render_signup(view),
        FlowSnapshot::Verification(view) => render_verification(view),
    }
}

fn render_signup(view: &SignupView) -> String {
    let mut out = String::from("== Create your seller account ==\n");
    let rows = [
        (Field::FirstName, "First name", view.first_name.as_str()),
        (Field::LastName, "Last name", view.last_name.as_str()),
        (Field::BusinessEmail, "Business email", view.business_email.as_str()),
        (Field::Password, "Password", view.password.as_str()),
        (Field::PhoneNumber, "Phone number", view.phone_number.as_str()),
        (
            Field::BusinessType,
            "Business type",
            view.business_type.unwrap_or("Select business type"),
        ),
        (Field::State, "State", view.state.as_str()),
        (
            Field::Location,
            "Location",
            view.location.unwrap_or("Select location"),
        ),
    ];
    for (field, label, value) in rows {
        let _ = writeln!(out, "{label:>15}: {value}");
        if field == Field::Password {
            if let Some(strength) = &view.password_strength {
                let _ = writeln!(out, "{:>15}  {} ({}/5)", "", strength.strength.as_str(), strength.score);
                for hint in &strength.feedback {
                    let _ = writeln!(out, "{:>15}  - {hint}", "");
                }
            }
        }
        if let Some(error) = view.errors.get(field) {
            let _ = writeln!(out, "{:>15}  ! {error}", "");
        }
    }

    let tick = if view.agree_to_terms { "x" } else { " " };
    let _ = writeln!(out, "{:>15}: [{tick}] I agree to the terms and conditions", "Terms");
    if let Some(error) = view.errors.get(Field::AgreeToTerms) {
        let _ = writeln!(out, "{:>15}  ! {error}", "");
    }

    if view.dropdowns.is_open(DropdownKind::BusinessType) {
        let options: Vec<_> = BusinessType::ALL.iter().map(|kind| kind.value()).collect();
        let _ = writeln!(out, "Business type options: {}", options.join(" | "));
    }
    if view.dropdowns.is_open(DropdownKind::Location) {
        let options: Vec<_> = Location::ALL.iter().map(|location| location.value()).collect();
        let _ = writeln!(out, "Location options: {}", options.join(" | "));
    }
    if view.submitting {
        out.push_str("Creating your account...\n");
    }
    out
}

fn render_verification(view: &VerificationView) -> String {
    let mut out = String::from("== Verify your email ==\n");
    let _ = writeln!(out, "We sent a 5-digit code to {}", view.email);

    let slots: Vec<String> = view
        .slots
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            let digit = if slot.is_empty() { "_" } else { slot.as_str() };
            if index == view.focus {
                format!(">{digit}<")
            } else {
                format!(" {digit} ")
            }
        })
        .collect();
    let _ = writeln!(out, "{}", slots.join(""));

    if let Some(error) = &view.error {
        let _ = writeln!(out, "! {error}");
    }
    if let Some(draft) = &view.email_draft {
        let _ = writeln!(out, "New email: {draft}");
    }

    let status = match view.state {
        VerificationState::Verifying => "Verifying...".to_string(),
        VerificationState::Resending => "Sending a new code...".to_string(),
        VerificationState::Complete => "Verified".to_string(),
        _ if view.can_resend => "Didn't get it? You can resend the code now".to_string(),
        _ => format!("Resend code in {}", view.countdown),
    };
    let _ = writeln!(out, "{status}");
    out
}
