//! Profile submission rules
//!
//! The declarative field rules run synchronously over a submission; the two
//! imperative rules (login id uniqueness, birthdate not in the future) need
//! the store and the clock, so the service layer applies them and merges
//! their findings into the same report.

use chrono::NaiveDate;

use super::entity::ProfileSubmission;
use crate::domain::validation::{
    is_email, is_kana, is_phone_number, ErrorKind, Field, PasswordPolicy, ValidationReport,
};

/// Run the declarative field rules over a submission.
pub fn validate_submission(submission: &ProfileSubmission) -> ValidationReport {
    let mut report = ValidationReport::new();

    if submission.name.trim().is_empty() {
        report.push(Field::Name, ErrorKind::Required);
    }

    if submission.kana.trim().is_empty() {
        report.push(Field::Kana, ErrorKind::Required);
    } else if !is_kana(&submission.kana) {
        report.push(Field::Kana, ErrorKind::Malformed);
    }

    if submission.gender.trim().is_empty() {
        report.push(Field::Gender, ErrorKind::Required);
    }

    if submission.birthdate.is_none() {
        report.push(Field::Birthdate, ErrorKind::Required);
    }

    if submission.phone_number.trim().is_empty() {
        report.push(Field::PhoneNumber, ErrorKind::Required);
    } else if !is_phone_number(&submission.phone_number) {
        report.push(Field::PhoneNumber, ErrorKind::Malformed);
    }

    if submission.email.trim().is_empty() {
        report.push(Field::Email, ErrorKind::Required);
    } else if !is_email(&submission.email) {
        report.push(Field::Email, ErrorKind::Malformed);
    }

    if submission.login_id.trim().is_empty() {
        report.push(Field::LoginId, ErrorKind::Required);
    }

    if submission.password.is_empty() {
        report.push(Field::Password, ErrorKind::Required);
    } else if !PasswordPolicy::Standard.satisfied_by(&submission.password) {
        report.push(Field::Password, ErrorKind::Weak(PasswordPolicy::Standard));
    }

    if submission.confirm_password.is_empty() {
        report.push(Field::ConfirmPassword, ErrorKind::Required);
    } else if submission.confirm_password != submission.password {
        report.push(Field::ConfirmPassword, ErrorKind::Mismatch);
    }

    report
}

/// Birthdates may not lie after the reference date.
pub fn birthdate_is_valid(birthdate: NaiveDate, today: NaiveDate) -> bool {
    birthdate <= today
}
