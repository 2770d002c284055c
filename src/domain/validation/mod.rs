//! Shared validation vocabulary
//!
//! Fields, rule kinds, and the structured report used by both the account
//! registration rules and the profile submission rules. Validation never
//! returns a bare boolean: every failed rule is recorded as a
//! `(field, kind)` pair so callers and tests can assert on which rule
//! failed, and each pair maps to the localized message shown to the user.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Input fields that validation rules can attach errors to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Kana,
    Gender,
    Birthdate,
    PhoneNumber,
    Email,
    LoginId,
    Password,
    ConfirmPassword,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Kana => "kana",
            Self::Gender => "gender",
            Self::Birthdate => "birthdate",
            Self::PhoneNumber => "phone_number",
            Self::Email => "email",
            Self::LoginId => "login_id",
            Self::Password => "password",
            Self::ConfirmPassword => "confirm_password",
        }
    }
}

/// Password complexity policies
///
/// `Standard` applies to profile submissions (length, lowercase, uppercase,
/// digit). `Strict` applies to registration and login credentials and
/// additionally requires a special character. The two intentionally differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordPolicy {
    Standard,
    Strict,
}

const MIN_PASSWORD_LENGTH: usize = 8;

impl PasswordPolicy {
    /// Check a password against this policy.
    ///
    /// Expressed as character-class scans; the equivalent lookahead regex
    /// for `Strict` is `^(?=.*[a-z])(?=.*[A-Z])(?=.*\d)(?=.*[\W_])[a-zA-Z\d\W_]{8,}$`.
    pub fn satisfied_by(&self, password: &str) -> bool {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return false;
        }

        let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());

        if !(has_lower && has_upper && has_digit) {
            return false;
        }

        match self {
            Self::Standard => true,
            Self::Strict => password.chars().any(|c| !c.is_ascii_alphanumeric()),
        }
    }
}

/// What a failed rule was checking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Field was empty or missing
    Required,
    /// Field did not match its format rule (kana, phone digits, email)
    Malformed,
    /// Password did not satisfy the policy
    Weak(PasswordPolicy),
    /// Confirm-password did not equal password
    Mismatch,
    /// Login ID is already in use by another record
    Duplicate,
    /// Birthdate is after today
    InFuture,
}

impl ErrorKind {
    /// Stable machine-readable code for the wire format
    pub fn code(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Malformed => "malformed",
            Self::Weak(_) => "weak_password",
            Self::Mismatch => "mismatch",
            Self::Duplicate => "duplicate",
            Self::InFuture => "in_future",
        }
    }
}

/// A single failed rule: which field, and what the rule was checking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub kind: ErrorKind,
}

impl FieldError {
    pub fn new(field: Field, kind: ErrorKind) -> Self {
        Self { field, kind }
    }

    /// The localized message shown to the user for this error
    pub fn message(&self) -> &'static str {
        match (self.field, self.kind) {
            (Field::Name, ErrorKind::Required) => "氏名を入力してください。",
            (Field::Kana, ErrorKind::Required) => "氏名(カナ)を入力してください。",
            (Field::Kana, ErrorKind::Malformed) => "氏名(カナ)はカタカナで入力してください。",
            (Field::Gender, ErrorKind::Required) => "性別を選択してください。",
            (Field::Birthdate, ErrorKind::Required) => "生年月日を入力してください。",
            (Field::Birthdate, ErrorKind::InFuture) => {
                "生年月日は現在の日付以前である必要があります。"
            }
            (Field::PhoneNumber, ErrorKind::Required) => "電話番号を入力してください。",
            (Field::PhoneNumber, ErrorKind::Malformed) => {
                "電話番号は10〜11桁の数字で入力してください。ハイフン（-）は含めないでください。"
            }
            (Field::Email, ErrorKind::Required) => "メールアドレスを入力してください。",
            (Field::Email, ErrorKind::Malformed) => "正しいメールアドレスを入力してください。",
            (Field::LoginId, ErrorKind::Required) => "ログインIDを入力してください。",
            (Field::LoginId, ErrorKind::Duplicate) => {
                "このログインIDはすでに使用されています。別のIDを入力してください。"
            }
            (Field::Password, ErrorKind::Required) => "パスワードを入力してください。",
            (Field::Password, ErrorKind::Weak(PasswordPolicy::Standard)) => {
                "パスワードは8文字以上で、大文字、小文字、数字を含む必要があります。"
            }
            (Field::Password, ErrorKind::Weak(PasswordPolicy::Strict)) => {
                "パスワードは8文字以上で、大文字、小文字、数字、特殊文字を含む必要があります。"
            }
            (Field::ConfirmPassword, ErrorKind::Required) => "確認パスワードを入力してください。",
            (Field::ConfirmPassword, ErrorKind::Mismatch) => {
                "確認パスワードとパスワードは不一致しました。"
            }
            _ => "入力内容に誤りがあります。",
        }
    }
}

/// Ordered collection of failed rules from one validation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed rule
    pub fn push(&mut self, field: Field, kind: ErrorKind) {
        self.errors.push(FieldError::new(field, kind));
    }

    /// True when no rule failed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether any error is attached to the given field
    pub fn has_error_on(&self, field: Field) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Whether the exact (field, kind) pair was recorded
    pub fn contains(&self, field: Field, kind: ErrorKind) -> bool {
        self.errors.iter().any(|e| e.field == field && e.kind == kind)
    }

    /// Append all errors from another report
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
    }
}

static KANA_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ァ-ヶーｦ-ﾟ]+(\s[ァ-ヶーｦ-ﾟ]+)*$").expect("kana pattern is valid")
});

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{10,11}$").expect("phone pattern is valid"));

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid"));

/// Katakana-only name check (full-width and half-width, space-separated parts)
pub fn is_kana(value: &str) -> bool {
    KANA_PATTERN.is_match(value)
}

/// Phone numbers are 10-11 digits, no separators
pub fn is_phone_number(value: &str) -> bool {
    PHONE_PATTERN.is_match(value)
}

pub fn is_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Pattern rules

    #[test]
    fn test_kana_accepts_katakana() {
        assert!(is_kana("タナカ"));
        assert!(is_kana("タナカ タロウ"));
        assert!(is_kana("ﾀﾅｶ"));
        assert!(is_kana("ヴェルナー"));
    }

    #[test]
    fn test_kana_rejects_non_katakana() {
        assert!(!is_kana(""));
        assert!(!is_kana("たなか"));
        assert!(!is_kana("田中"));
        assert!(!is_kana("Tanaka"));
        assert!(!is_kana("タナカ "));
        assert!(!is_kana(" タナカ"));
    }

    #[test]
    fn test_phone_number_digits() {
        assert!(is_phone_number("0312345678"));
        assert!(is_phone_number("09012345678"));

        assert!(!is_phone_number("031234567"));
        assert!(!is_phone_number("090123456789"));
        assert!(!is_phone_number("03-1234-5678"));
        assert!(!is_phone_number(""));
    }

    #[test]
    fn test_email_format() {
        assert!(is_email("tanaka@example.com"));
        assert!(is_email("a.b+c@mail.example.co.jp"));

        assert!(!is_email("tanaka"));
        assert!(!is_email("tanaka@"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("tanaka@example"));
        assert!(!is_email("ta naka@example.com"));
    }

    // Password policies

    #[test]
    fn test_standard_policy() {
        assert!(PasswordPolicy::Standard.satisfied_by("Passw0rd"));
        assert!(PasswordPolicy::Standard.satisfied_by("Abcdefg1"));
        // No special character required
        assert!(PasswordPolicy::Standard.satisfied_by("Abcdef12"));

        assert!(!PasswordPolicy::Standard.satisfied_by("Abcdef1")); // 7 chars
        assert!(!PasswordPolicy::Standard.satisfied_by("abcdefg1")); // no upper
        assert!(!PasswordPolicy::Standard.satisfied_by("ABCDEFG1")); // no lower
        assert!(!PasswordPolicy::Standard.satisfied_by("Abcdefgh")); // no digit
    }

    #[test]
    fn test_strict_policy_requires_special_character() {
        assert!(PasswordPolicy::Strict.satisfied_by("Passw0rd!"));
        assert!(PasswordPolicy::Strict.satisfied_by("Aa1_aaaa"));
        assert!(PasswordPolicy::Strict.satisfied_by("Aa1 aaaa")); // space counts

        assert!(!PasswordPolicy::Strict.satisfied_by("Passw0rd")); // no special
        assert!(!PasswordPolicy::Strict.satisfied_by("Aa1!aaa")); // 7 chars
        assert!(!PasswordPolicy::Strict.satisfied_by("aa1!aaaa")); // no upper
        assert!(!PasswordPolicy::Strict.satisfied_by("AA1!AAAA")); // no lower
        assert!(!PasswordPolicy::Strict.satisfied_by("Aaa!aaaa")); // no digit
    }

    // Report behavior

    #[test]
    fn test_empty_report_is_valid() {
        let report = ValidationReport::new();
        assert!(report.is_valid());
        assert!(report.errors().is_empty());
    }

    #[test]
    fn test_report_records_field_and_kind() {
        let mut report = ValidationReport::new();
        report.push(Field::LoginId, ErrorKind::Duplicate);
        report.push(Field::Birthdate, ErrorKind::InFuture);

        assert!(!report.is_valid());
        assert_eq!(report.errors().len(), 2);
        assert!(report.contains(Field::LoginId, ErrorKind::Duplicate));
        assert!(report.contains(Field::Birthdate, ErrorKind::InFuture));
        assert!(report.has_error_on(Field::LoginId));
        assert!(!report.has_error_on(Field::Email));
    }

    #[test]
    fn test_report_merge() {
        let mut a = ValidationReport::new();
        a.push(Field::Name, ErrorKind::Required);

        let mut b = ValidationReport::new();
        b.push(Field::Kana, ErrorKind::Malformed);

        a.merge(b);
        assert_eq!(a.errors().len(), 2);
        assert!(a.contains(Field::Kana, ErrorKind::Malformed));
    }

    // Localized messages

    #[test]
    fn test_messages_match_locale_catalog() {
        assert_eq!(
            FieldError::new(Field::Name, ErrorKind::Required).message(),
            "氏名を入力してください。"
        );
        assert_eq!(
            FieldError::new(Field::Kana, ErrorKind::Malformed).message(),
            "氏名(カナ)はカタカナで入力してください。"
        );
        assert_eq!(
            FieldError::new(Field::LoginId, ErrorKind::Duplicate).message(),
            "このログインIDはすでに使用されています。別のIDを入力してください。"
        );
        assert_eq!(
            FieldError::new(Field::ConfirmPassword, ErrorKind::Mismatch).message(),
            "確認パスワードとパスワードは不一致しました。"
        );
    }

    #[test]
    fn test_weak_password_messages_differ_by_policy() {
        let standard = FieldError::new(Field::Password, ErrorKind::Weak(PasswordPolicy::Standard));
        let strict = FieldError::new(Field::Password, ErrorKind::Weak(PasswordPolicy::Strict));

        assert_ne!(standard.message(), strict.message());
        assert!(strict.message().contains("特殊文字"));
        assert!(!standard.message().contains("特殊文字"));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ErrorKind::Required.code(), "required");
        assert_eq!(ErrorKind::Weak(PasswordPolicy::Strict).code(), "weak_password");
        assert_eq!(ErrorKind::Duplicate.code(), "duplicate");
        assert_eq!(ErrorKind::InFuture.code(), "in_future");
    }

    #[test]
    fn test_field_wire_names() {
        assert_eq!(Field::PhoneNumber.as_str(), "phone_number");
        assert_eq!(Field::ConfirmPassword.as_str(), "confirm_password");
    }
}
