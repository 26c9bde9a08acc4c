//! Login and sign-up screen

use super::validation::is_valid_email;
use super::Screen;
use crate::errors::AuthError;
use std::fmt;
use std::str::FromStr;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Role picked on the login form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserRole {
    Owner,
    Guest,
}

impl UserRole {
    /// Numeric role id carried in the session token
    pub fn role_id(&self) -> u32 {
        match self {
            UserRole::Owner => 1,
            UserRole::Guest => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Owner => "Owner",
            UserRole::Guest => "Guest",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "owner" | "propietario" => Ok(UserRole::Owner),
            "guest" | "huésped" | "huesped" => Ok(UserRole::Guest),
            _ => Err(AuthError::UnknownRole(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthTab {
    #[default]
    Login,
    SignUp,
}

impl AuthTab {
    pub fn label(&self) -> &'static str {
        match self {
            AuthTab::Login => "Login",
            AuthTab::SignUp => "Sign Up",
        }
    }
}

impl FromStr for AuthTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "login" | "iniciarsesión" | "iniciarsesion" => Ok(AuthTab::Login),
            "signup" | "registrarse" | "register" => Ok(AuthTab::SignUp),
            _ => Err(format!("unknown tab: {}", s)),
        }
    }
}

/// Values typed into the login form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub role: Option<UserRole>,
    pub remember_me: bool,
}

/// Values typed into the sign-up form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub full_name: String,
    pub email: String,
    pub dni: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub accept_terms: bool,
}

impl SignUpForm {
    /// Labels of the required fields left blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("full name", &self.full_name),
            ("email", &self.email),
            ("DNI", &self.dni),
            ("phone", &self.phone),
            ("password", &self.password),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(label, _)| label)
        .collect()
    }
}

/// Which password fields are shown in clear text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PasswordVisibility {
    pub login: bool,
    pub signup: bool,
    pub confirm: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthScreen {
    pub tab: AuthTab,
    pub login: LoginForm,
    pub signup: SignUpForm,
    pub visible: PasswordVisibility,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub auth_token: Option<String>,
    /// Email kept for the next session when "remember me" was checked
    pub remembered_email: Option<String>,
    pub current_screen: Screen,
}

impl Default for AuthScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthScreen {
    pub fn new() -> Self {
        Self {
            tab: AuthTab::Login,
            login: LoginForm::default(),
            signup: SignUpForm::default(),
            visible: PasswordVisibility::default(),
            is_loading: false,
            error_message: None,
            auth_token: None,
            remembered_email: None,
            current_screen: Screen::Auth,
        }
    }

    pub fn switch_tab(&mut self, tab: AuthTab) {
        self.tab = tab;
        self.error_message = None;
    }

    pub fn toggle_password_visibility(&mut self) {
        self.visible.login = !self.visible.login;
    }

    pub fn toggle_signup_password_visibility(&mut self) {
        self.visible.signup = !self.visible.signup;
    }

    pub fn toggle_confirm_password_visibility(&mut self) {
        self.visible.confirm = !self.visible.confirm;
    }

    /// Inline error for the login email field
    pub fn email_error(&self) -> Option<&'static str> {
        let email = self.login.email.trim();
        if !email.is_empty() && !is_valid_email(email) {
            Some("Invalid email format")
        } else {
            None
        }
    }

    /// The sign-up button stays disabled until the terms are accepted
    pub fn can_sign_up(&self) -> bool {
        self.signup.accept_terms && !self.is_loading
    }

    pub fn login(&mut self) -> Result<(), AuthError> {
        let result = self.try_login();
        if let Err(e) = &result {
            self.error_message = Some(e.to_string());
        }
        result
    }

    fn try_login(&mut self) -> Result<(), AuthError> {
        if self.login.email.is_empty() || self.login.password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        let Some(role) = self.login.role else {
            return Err(AuthError::RoleNotSelected);
        };

        let email = &self.login.email;
        if !email.contains('@') || self.login.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidCredentials);
        }

        self.auth_token = Some(format!("token_for_{}", email));
        self.remembered_email = self.login.remember_me.then(|| email.clone());
        self.error_message = None;
        self.current_screen = Screen::Home;
        tracing::debug!("Logged in as {} ({})", email, role);
        Ok(())
    }

    pub fn sign_up(&mut self) -> Result<(), AuthError> {
        let result = self.try_sign_up();
        if let Err(e) = &result {
            self.error_message = Some(e.to_string());
        }
        result
    }

    fn try_sign_up(&mut self) -> Result<(), AuthError> {
        let form = &self.signup;
        if !form.accept_terms {
            return Err(AuthError::TermsNotAccepted);
        }
        if form.password != form.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        if !form.missing_fields().is_empty() {
            return Err(AuthError::MissingFields);
        }

        self.error_message = None;
        self.current_screen = Screen::AccountTypeSelection;
        tracing::debug!("Registered {}", form.email);
        Ok(())
    }

    pub fn open_terms(&mut self) {
        self.current_screen = Screen::TermsAndConditions;
    }

    pub fn is_logged_in(&self) -> bool {
        self.auth_token.is_some()
    }
}
