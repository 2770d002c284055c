//! Registration and login input rules

use crate::domain::validation::{
    is_email, ErrorKind, Field, PasswordPolicy, ValidationReport,
};

/// Validate a registration submission.
///
/// All fields are required; the email must be well-formed; the password
/// must satisfy the `Strict` policy; the confirmation must match.
pub fn validate_registration(
    login_id: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> ValidationReport {
    let mut report = ValidationReport::new();

    if login_id.trim().is_empty() {
        report.push(Field::LoginId, ErrorKind::Required);
    }

    if email.trim().is_empty() {
        report.push(Field::Email, ErrorKind::Required);
    } else if !is_email(email) {
        report.push(Field::Email, ErrorKind::Malformed);
    }

    if password.is_empty() {
        report.push(Field::Password, ErrorKind::Required);
    } else if !PasswordPolicy::Strict.satisfied_by(password) {
        report.push(Field::Password, ErrorKind::Weak(PasswordPolicy::Strict));
    }

    if confirm_password.is_empty() {
        report.push(Field::ConfirmPassword, ErrorKind::Required);
    } else if confirm_password != password {
        report.push(Field::ConfirmPassword, ErrorKind::Mismatch);
    }

    report
}

/// Validate a login submission.
///
/// Only presence is checked here: anything beyond that is answered by the
/// credential check itself, which reports one generic failure message
/// without revealing which part was wrong.
pub fn validate_login(login_id: &str, password: &str) -> ValidationReport {
    let mut report = ValidationReport::new();

    if login_id.trim().is_empty() {
        report.push(Field::LoginId, ErrorKind::Required);
    }

    if password.is_empty() {
        report.push(Field::Password, ErrorKind::Required);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_registration() {
        let report =
            validate_registration("tanaka01", "tanaka@example.com", "Passw0rd!", "Passw0rd!");
        assert!(report.is_valid());
    }

    #[test]
    fn test_registration_all_fields_required() {
        let report = validate_registration("", "", "", "");

        assert!(report.contains(Field::LoginId, ErrorKind::Required));
        assert!(report.contains(Field::Email, ErrorKind::Required));
        assert!(report.contains(Field::Password, ErrorKind::Required));
        assert!(report.contains(Field::ConfirmPassword, ErrorKind::Required));
        assert_eq!(report.errors().len(), 4);
    }

    #[test]
    fn test_registration_malformed_email() {
        let report = validate_registration("tanaka01", "not-an-email", "Passw0rd!", "Passw0rd!");
        assert!(report.contains(Field::Email, ErrorKind::Malformed));
    }

    #[test]
    fn test_registration_password_needs_special_character() {
        let report = validate_registration("tanaka01", "tanaka@example.com", "Passw0rd", "Passw0rd");
        assert!(report.contains(Field::Password, ErrorKind::Weak(PasswordPolicy::Strict)));
    }

    #[test]
    fn test_registration_confirm_mismatch() {
        let report =
            validate_registration("tanaka01", "tanaka@example.com", "Passw0rd!", "Passw0rd?");
        assert!(report.contains(Field::ConfirmPassword, ErrorKind::Mismatch));
        assert!(!report.has_error_on(Field::Password));
    }

    #[test]
    fn test_login_requires_both_fields() {
        assert!(validate_login("tanaka01", "Passw0rd!").is_valid());
        assert!(validate_login("", "Passw0rd!").contains(Field::LoginId, ErrorKind::Required));
        assert!(validate_login("tanaka01", "").contains(Field::Password, ErrorKind::Required));
    }

    #[test]
    fn test_login_does_not_judge_password_strength() {
        // A weak password is still a credible login attempt
        assert!(validate_login("tanaka01", "short").is_valid());
    }
}
