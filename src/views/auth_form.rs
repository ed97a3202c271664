//! Login / signup form state.
//!
//! DESIGN
//! ======
//! Mirrors the auth modal: one form toggling between login and signup.
//! Signup fields are validated here, before anything reaches the identity
//! provider; provider failures come back as an [`IdentityErrorKind`] and are
//! shown as localized text. Copy is Spanish, as on the rest of the site.

use serde::{Deserialize, Serialize};

use crate::services::identity::IdentityErrorKind;

pub const DEFAULT_PHONE_PREFIX: &str = "+593";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("El nombre es requerido")]
    NameRequired,
    #[error("El número de WhatsApp es requerido")]
    PhoneRequired,
    #[error("El número debe comenzar con {prefix}")]
    PhonePrefix { prefix: String },
}

impl crate::error::ErrorCode for FormError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NameRequired => "E_NAME_REQUIRED",
            Self::PhoneRequired => "E_PHONE_REQUIRED",
            Self::PhonePrefix { .. } => "E_PHONE_PREFIX",
        }
    }
}

/// Localized message for an identity failure.
#[must_use]
pub fn identity_error_message(kind: IdentityErrorKind) -> &'static str {
    match kind {
        IdentityErrorKind::AccountNotFound => "No existe una cuenta con este email",
        IdentityErrorKind::WrongCredential => "Contraseña incorrecta",
        IdentityErrorKind::EmailAlreadyRegistered => "Ya existe una cuenta con este email",
        IdentityErrorKind::WeakCredential => "La contraseña debe tener al menos 6 caracteres",
        IdentityErrorKind::MalformedEmail => "Email inválido",
        IdentityErrorKind::Unknown => GENERIC_ERROR_MESSAGE,
    }
}

pub const GENERIC_ERROR_MESSAGE: &str = "Error al procesar la solicitud. Intenta nuevamente.";

/// Keep only digits and `+`, as the phone input does while typing.
#[must_use]
pub fn sanitize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Validated credentials ready for the session controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Login { email: String, password: String },
    Signup { email: String, password: String, display_name: String, phone_number: String },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub email: String,
    #[serde(skip)]
    pub password: String,
    pub display_name: String,
    pub phone_number: String,
    pub busy: bool,
    pub error: Option<String>,
}

impl AuthForm {
    #[must_use]
    pub fn new(mode: AuthMode) -> Self {
        Self { mode, ..Self::default() }
    }

    pub fn switch_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Signup,
            AuthMode::Signup => AuthMode::Login,
        };
        self.error = None;
    }

    pub fn set_phone_number(&mut self, raw: &str) {
        self.phone_number = sanitize_phone(raw);
    }

    /// Check signup-only fields. Login has nothing to check client-side.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule, in form order.
    pub fn validate(&self, phone_prefix: &str) -> Result<(), FormError> {
        if self.mode == AuthMode::Login {
            return Ok(());
        }
        if self.display_name.trim().is_empty() {
            return Err(FormError::NameRequired);
        }
        if self.phone_number.trim().is_empty() {
            return Err(FormError::PhoneRequired);
        }
        if !self.phone_number.starts_with(phone_prefix) {
            return Err(FormError::PhonePrefix { prefix: phone_prefix.to_owned() });
        }
        Ok(())
    }

    /// Start a submission: clear the previous error and validate.
    ///
    /// # Errors
    ///
    /// On a validation failure the message is stored on the form and the
    /// form is left idle.
    pub fn begin_submit(&mut self, phone_prefix: &str) -> Result<Submission, FormError> {
        self.error = None;
        if let Err(e) = self.validate(phone_prefix) {
            self.error = Some(e.to_string());
            self.busy = false;
            return Err(e);
        }
        self.busy = true;

        Ok(match self.mode {
            AuthMode::Login => Submission::Login { email: self.email.clone(), password: self.password.clone() },
            AuthMode::Signup => Submission::Signup {
                email: self.email.clone(),
                password: self.password.clone(),
                display_name: self.display_name.clone(),
                phone_number: self.phone_number.clone(),
            },
        })
    }

    /// Record a provider failure for re-presentation.
    pub fn fail(&mut self, kind: IdentityErrorKind) {
        self.error = Some(identity_error_message(kind).to_owned());
        self.busy = false;
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        match self.mode {
            AuthMode::Login => "Iniciar Sesión",
            AuthMode::Signup => "Crear Cuenta",
        }
    }

    #[must_use]
    pub fn subtitle(&self) -> &'static str {
        match self.mode {
            AuthMode::Login => "Accede a tu cuenta y gestiona tus suscripciones",
            AuthMode::Signup => "Únete a VacApp y empieza a ahorrar",
        }
    }

    #[must_use]
    pub fn switch_prompt(&self) -> (&'static str, &'static str) {
        match self.mode {
            AuthMode::Login => ("¿No tienes cuenta?", "Crear cuenta"),
            AuthMode::Signup => ("¿Ya tienes cuenta?", "Iniciar sesión"),
        }
    }
}

#[cfg(test)]
#[path = "auth_form_test.rs"]
mod tests;
