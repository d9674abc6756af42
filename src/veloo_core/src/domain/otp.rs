use serde::Serialize;

pub const OTP_LENGTH: usize = 5;

/// The five single-digit code slots and the slot that currently has focus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OtpInput {
    slots: [Option<char>; OTP_LENGTH],
    focus: usize,
}

impl OtpInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn slot(&self, index: usize) -> Option<char> {
        self.slots.get(index).copied().flatten()
    }

    /// Slots rendered as strings, empty where nothing was typed.
    pub fn as_strings(&self) -> [String; OTP_LENGTH] {
        self.slots
            .map(|slot| slot.map(String::from).unwrap_or_default())
    }

    pub fn focus_slot(&mut self, index: usize) {
        if index < OTP_LENGTH {
            self.focus = index;
        }
    }

    /// Handles a change of slot `index` to `value`.
    ///
    /// Returns true when the slot was updated. Multi-character and non-digit
    /// input is ignored.
    pub fn input(&mut self, index: usize, value: &str) -> bool {
        if index >= OTP_LENGTH {
            return false;
        }
        let mut chars = value.chars();
        let digit = match (chars.next(), chars.next()) {
            (None, _) => None,
            (Some(c), None) if c.is_ascii_digit() => Some(c),
            _ => return false,
        };

        self.slots[index] = digit;
        self.focus = index;
        if digit.is_some() && index < OTP_LENGTH - 1 {
            self.focus = index + 1;
        }
        true
    }

    /// Handles Backspace pressed in slot `index`.
    ///
    /// A filled slot is cleared in place (returns true). On an empty slot focus
    /// moves back one slot, except on the first slot.
    pub fn backspace(&mut self, index: usize) -> bool {
        if index >= OTP_LENGTH {
            return false;
        }
        if self.slots[index].take().is_some() {
            self.focus = index;
            return true;
        }
        if index > 0 {
            self.focus = index - 1;
        }
        false
    }

    /// Fills every slot from pasted text once non-digits are stripped, but only
    /// when exactly [`OTP_LENGTH`] digits remain.
    pub fn paste(&mut self, text: &str) -> bool {
        let digits: Vec<char> = text.chars().filter(char::is_ascii_digit).collect();
        if digits.len() != OTP_LENGTH {
            return false;
        }
        for (slot, digit) in self.slots.iter_mut().zip(digits) {
            *slot = Some(digit);
        }
        self.focus = OTP_LENGTH - 1;
        true
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// The concatenated code, once every slot is filled.
    pub fn code(&self) -> Option<String> {
        self.slots.iter().copied().collect()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_typing_advances_focus() {
        let mut otp = OtpInput::new();
        assert!(otp.input(0, "4"));
        assert_eq!(otp.focus(), 1);
        assert!(otp.input(4, "9"));
        assert_eq!(otp.focus(), 4);
    }

    #[test]
    fn test_rejects_non_digits_and_multiple_characters() {
        let mut otp = OtpInput::new();
        assert!(!otp.input(0, "a"));
        assert!(!otp.input(0, "12"));
        assert_eq!(otp.slot(0), None);
        assert_eq!(otp.focus(), 0);
    }

    #[test]
    fn test_empty_input_clears_slot() {
        let mut otp = OtpInput::new();
        otp.input(2, "7");
        assert!(otp.input(2, ""));
        assert_eq!(otp.slot(2), None);
        assert_eq!(otp.focus(), 2);
    }

    #[test]
    fn test_paste_five_digits_fills_all_slots() {
        let mut otp = OtpInput::new();
        assert!(otp.paste("12345"));
        assert_eq!(otp.as_strings(), ["1", "2", "3", "4", "5"].map(String::from));
        assert_eq!(otp.focus(), 4);
        assert_eq!(otp.code().as_deref(), Some("12345"));
    }

    #[test]
    fn test_paste_strips_separators() {
        let mut otp = OtpInput::new();
        assert!(otp.paste("12-3 45"));
        assert_eq!(otp.code().as_deref(), Some("12345"));
    }

    #[test]
    fn test_paste_of_wrong_length_is_ignored() {
        let mut otp = OtpInput::new();
        otp.input(0, "9");
        assert!(!otp.paste("123"));
        assert!(!otp.paste("123456"));
        assert_eq!(otp.as_strings(), ["9", "", "", "", ""].map(String::from));
    }

    #[test]
    fn test_backspace_on_empty_slot_moves_focus_back() {
        let mut otp = OtpInput::new();
        otp.focus_slot(2);
        assert!(!otp.backspace(2));
        assert_eq!(otp.focus(), 1);
    }

    #[test]
    fn test_backspace_on_first_slot_keeps_focus() {
        let mut otp = OtpInput::new();
        assert!(!otp.backspace(0));
        assert_eq!(otp.focus(), 0);
    }

    #[test]
    fn test_backspace_on_filled_slot_clears_it() {
        let mut otp = OtpInput::new();
        otp.input(3, "8");
        assert!(otp.backspace(3));
        assert_eq!(otp.slot(3), None);
        assert_eq!(otp.focus(), 3);
    }

    #[test]
    fn test_incomplete_code_is_none() {
        let mut otp = OtpInput::new();
        otp.input(0, "1");
        otp.input(1, "2");
        otp.input(2, "3");
        assert!(!otp.is_complete());
        assert_eq!(otp.code(), None);
    }

    #[quickcheck]
    fn prop_slots_always_hold_at_most_one_digit(ops: Vec<(u8, String)>) -> bool {
        let mut otp = OtpInput::new();
        for (index, value) in ops {
            let index = usize::from(index % 7);
            match index {
                5 => {
                    otp.paste(&value);
                }
                6 => {
                    otp.backspace(value.len() % OTP_LENGTH);
                }
                _ => {
                    otp.input(index, &value);
                }
            }
        }
        otp.focus() < OTP_LENGTH
            && otp
                .as_strings()
                .iter()
                .all(|slot| slot.is_empty() || (slot.len() == 1 && slot.chars().all(|c| c.is_ascii_digit())))
    }
}
