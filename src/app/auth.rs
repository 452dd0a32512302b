//! Login and registration.
use crate::api::{ApiClient, Credentials, Role, Token};
use crate::app::form::{Field, FormState, LOGIN_FIELDS, REGISTER_FIELDS};
use crate::error::ClientError;

pub const MISSING_FIELDS: &str = "Please fill in all fields";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match";

/// Sign in as `role`. Empty credentials fail before any request.
pub async fn login(api: &ApiClient, role: Role, email: &str, password: &str) -> Result<Token, ClientError> {
    if email.is_empty() || password.is_empty() {
        return Err(ClientError::validation(MISSING_FIELDS));
    }
    let credentials = Credentials {
        email: email.to_string(),
        password: password.to_string(),
    };
    let token = api.login(role, &credentials).await?;
    tracing::info!(role = role.label(), "signed in");
    tracing::debug!(token = %token.redacted(), "session token received");
    Ok(token)
}

/// Local checks for a registration form, in the order they are reported.
pub fn validate_registration(form: &FormState) -> Result<(), ClientError> {
    if form.first_missing().is_some() {
        return Err(ClientError::validation(MISSING_FIELDS));
    }
    if form.get(Field::Password) != form.get(Field::ConfirmPassword) {
        return Err(ClientError::validation(PASSWORD_MISMATCH));
    }
    Ok(())
}

/// Register an end user. Success clears the form; failure keeps it intact.
pub async fn register(api: &ApiClient, form: &mut FormState) -> Result<(), ClientError> {
    validate_registration(form)?;
    api.register(&form.payload()).await?;
    tracing::info!(email = form.get(Field::Email), "registered");
    form.clear();
    Ok(())
}

/// Login screen state.
#[derive(Clone, Debug)]
pub struct LoginForm {
    pub role: Role,
    pub form: FormState,
}

impl LoginForm {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            form: FormState::new(LOGIN_FIELDS),
        }
    }

    pub async fn submit(&mut self, api: &ApiClient) -> Result<Token, ClientError> {
        self.form.begin_submit();
        let res = login(
            api,
            self.role,
            self.form.get(Field::Email),
            self.form.get(Field::Password),
        )
        .await;
        match &res {
            Ok(_) => self.form.succeed(),
            Err(e) => self.form.fail(e),
        }
        res
    }
}

/// Registration screen state.
#[derive(Clone, Debug)]
pub struct RegisterForm {
    pub form: FormState,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self {
            form: FormState::new(REGISTER_FIELDS),
        }
    }

    pub async fn submit(&mut self, api: &ApiClient) -> Result<(), ClientError> {
        self.form.begin_submit();
        let res = register(api, &mut self.form).await;
        match &res {
            Ok(()) => self.form.succeed(),
            Err(e) => self.form.fail(e),
        }
        res
    }
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self::new()
    }
}
