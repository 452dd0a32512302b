//! Screen-scoped form state and the request lifecycle shared by every form.
use std::collections::BTreeMap;

use crate::api::{UserPayload, UserRecord};
use crate::error::ClientError;

/// Input fields used across login, registration and record forms.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    PaternalSurname,
    MaternalSurname,
    BirthDate,
    Phone,
    Email,
    Password,
    ConfirmPassword,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::PaternalSurname => "Paternal surname",
            Field::MaternalSurname => "Maternal surname",
            Field::BirthDate => "Birth date (YYYY-MM-DD)",
            Field::Phone => "Phone",
            Field::Email => "Email",
            Field::Password => "Password",
            Field::ConfirmPassword => "Confirm password",
        }
    }

    /// Rendered masked.
    pub fn is_secret(self) -> bool {
        matches!(self, Field::Password | Field::ConfirmPassword)
    }
}

pub const LOGIN_FIELDS: &[Field] = &[Field::Email, Field::Password];

pub const RECORD_FIELDS: &[Field] = &[
    Field::Name,
    Field::PaternalSurname,
    Field::MaternalSurname,
    Field::BirthDate,
    Field::Phone,
    Field::Email,
    Field::Password,
];

pub const REGISTER_FIELDS: &[Field] = &[
    Field::Name,
    Field::PaternalSurname,
    Field::MaternalSurname,
    Field::BirthDate,
    Field::Phone,
    Field::Email,
    Field::Password,
    Field::ConfirmPassword,
];

/// `idle -> submitting -> {succeeded | failed}`; a failed form goes back to
/// idle on the next edit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RequestStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

impl RequestStatus {
    pub fn error(&self) -> Option<&str> {
        match self {
            RequestStatus::Failed(m) => Some(m),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FormState {
    fields: &'static [Field],
    values: BTreeMap<Field, String>,
    focus: usize,
    pub status: RequestStatus,
}

impl FormState {
    pub fn new(fields: &'static [Field]) -> Self {
        Self {
            fields,
            values: fields.iter().map(|f| (*f, String::new())).collect(),
            focus: 0,
            status: RequestStatus::Idle,
        }
    }

    /// Prefill a record form. The password always starts empty.
    pub fn from_record(record: &UserRecord) -> Self {
        let mut form = Self::new(RECORD_FIELDS);
        form.values.insert(Field::Name, record.name.clone());
        form.values.insert(Field::PaternalSurname, record.paternal_surname.clone());
        form.values.insert(Field::MaternalSurname, record.maternal_surname.clone());
        form.values.insert(Field::BirthDate, record.birth_date.clone());
        form.values.insert(Field::Phone, record.phone.clone());
        form.values.insert(Field::Email, record.email.clone());
        form
    }

    pub fn fields(&self) -> &'static [Field] {
        self.fields
    }

    pub fn get(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Replace a value. Fields not on this form are ignored.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        if let Some(slot) = self.values.get_mut(&field) {
            *slot = value.into();
            self.touch();
        }
    }

    pub fn focused(&self) -> Field {
        self.fields[self.focus.min(self.fields.len() - 1)]
    }

    pub fn focus_index(&self) -> usize {
        self.focus
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    pub fn push_char(&mut self, c: char) {
        let field = self.focused();
        if let Some(slot) = self.values.get_mut(&field) {
            slot.push(c);
            self.touch();
        }
    }

    pub fn pop_char(&mut self) {
        let field = self.focused();
        if let Some(slot) = self.values.get_mut(&field) {
            slot.pop();
            self.touch();
        }
    }

    /// Edits dismiss a previous failure.
    fn touch(&mut self) {
        if matches!(self.status, RequestStatus::Failed(_) | RequestStatus::Succeeded) {
            self.status = RequestStatus::Idle;
        }
    }

    /// First field left empty, in display order.
    pub fn first_missing(&self) -> Option<Field> {
        self.fields.iter().copied().find(|f| self.get(*f).is_empty())
    }

    pub fn clear(&mut self) {
        for v in self.values.values_mut() {
            v.clear();
        }
        self.focus = 0;
    }

    pub fn is_submitting(&self) -> bool {
        self.status == RequestStatus::Submitting
    }

    pub fn begin_submit(&mut self) {
        self.status = RequestStatus::Submitting;
    }

    pub fn succeed(&mut self) {
        self.status = RequestStatus::Succeeded;
    }

    pub fn fail(&mut self, err: &ClientError) {
        self.status = RequestStatus::Failed(err.message().to_string());
    }

    /// Body for register, create and update. Values are sent as entered.
    pub fn payload(&self) -> UserPayload {
        UserPayload {
            name: self.get(Field::Name).to_string(),
            paternal_surname: self.get(Field::PaternalSurname).to_string(),
            maternal_surname: self.get(Field::MaternalSurname).to_string(),
            birth_date: self.get(Field::BirthDate).to_string(),
            phone: self.get(Field::Phone).to_string(),
            email: self.get(Field::Email).to_string(),
            password: self.get(Field::Password).to_string(),
        }
    }
}
