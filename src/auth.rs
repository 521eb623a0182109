//! Sign-in and password-recovery flow: sign in, or forget password -> OTP -> reset.
//! The current step carries what later steps need (email, verified OTP), the way the
//! screens hand it along as navigation state.

use crate::dispatch::Dispatcher;
use crate::endpoints::{
    EmailRequest, ForgetPassword, Login, LoginRequest, OtpRequest, Profile, ResetPassword,
    ResetPasswordRequest, VerifyOtp,
};
use crate::error::ClientError;
use crate::models::User;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthStep {
    SignIn,
    ForgetPassword,
    VerifyOtp { email: String },
    ResetPassword { email: String, otp: String },
}

impl AuthStep {
    pub fn name(&self) -> &'static str {
        match self {
            AuthStep::SignIn => "sign_in",
            AuthStep::ForgetPassword => "forget_password",
            AuthStep::VerifyOtp { .. } => "verify_otp",
            AuthStep::ResetPassword { .. } => "reset_password",
        }
    }
}

pub struct AuthFlow {
    dispatcher: Dispatcher,
    step: AuthStep,
}

impl AuthFlow {
    pub fn new(dispatcher: Dispatcher) -> Self {
        AuthFlow {
            dispatcher,
            step: AuthStep::SignIn,
        }
    }

    pub fn step(&self) -> &AuthStep {
        &self.step
    }

    /// Email to pre-fill on the sign-in form.
    pub fn remembered_email(&self) -> Option<String> {
        self.dispatcher.session().remembered_email()
    }

    /// Store token and user on success; remember or forget the email per `remember`.
    /// A wrong password comes back as `ClientError::Server` with status 401.
    pub async fn login(&mut self, email: &str, password: &str, remember: bool) -> Result<Option<User>, ClientError> {
        self.expect(&["sign_in"])?;
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = self.dispatcher.call::<Login>(&request).await?;
        let session = self.dispatcher.session();
        let mut user = response.data.user;
        session.sign_in(response.data.token, user.clone());
        if user.is_none() {
            // Older backends return only the token.
            user = match self.dispatcher.call::<Profile>(&()).await {
                Ok(profile) => Some(profile.data),
                Err(e) => {
                    tracing::warn!(error = %e, "signed in but could not load profile");
                    None
                }
            };
            session.set_user(user.clone());
        }
        session.remember_email(remember.then(|| request.email.clone()));
        tracing::info!(email = %request.email, "signed in");
        Ok(user)
    }

    pub fn logout(&mut self) {
        self.dispatcher.session().clear_auth();
        self.step = AuthStep::SignIn;
    }

    pub fn start_reset(&mut self) -> Result<(), ClientError> {
        self.expect(&["sign_in"])?;
        self.step = AuthStep::ForgetPassword;
        Ok(())
    }

    /// Ask the backend to email an OTP.
    pub async fn request_otp(&mut self, email: &str) -> Result<Option<String>, ClientError> {
        self.expect(&["forget_password", "verify_otp"])?;
        let email = email.trim().to_string();
        if email.is_empty() {
            return Err(ClientError::Validation("email is required".into()));
        }
        let response = self
            .dispatcher
            .call::<ForgetPassword>(&EmailRequest { email: email.clone() })
            .await?;
        self.step = AuthStep::VerifyOtp { email };
        Ok(response.message)
    }

    pub async fn verify_otp(&mut self, otp: &str) -> Result<(), ClientError> {
        let email = match &self.step {
            AuthStep::VerifyOtp { email } => email.clone(),
            other => {
                return Err(ClientError::InvalidStep {
                    expected: "verify_otp",
                    actual: other.name(),
                })
            }
        };
        let otp = otp.trim().to_string();
        if otp.is_empty() {
            return Err(ClientError::Validation("otp is required".into()));
        }
        self.dispatcher
            .call::<VerifyOtp>(&OtpRequest {
                email: email.clone(),
                otp: otp.clone(),
            })
            .await?;
        self.step = AuthStep::ResetPassword { email, otp };
        Ok(())
    }

    /// Mismatched confirmation is rejected before any request is made.
    pub async fn reset_password(&mut self, password: &str, confirmation: &str) -> Result<(), ClientError> {
        let (email, otp) = match &self.step {
            AuthStep::ResetPassword { email, otp } => (email.clone(), otp.clone()),
            other => {
                return Err(ClientError::InvalidStep {
                    expected: "reset_password",
                    actual: other.name(),
                })
            }
        };
        if password.is_empty() {
            return Err(ClientError::Validation("password is required".into()));
        }
        if password != confirmation {
            return Err(ClientError::Validation("passwords do not match".into()));
        }
        self.dispatcher
            .call::<ResetPassword>(&ResetPasswordRequest {
                email,
                otp,
                password: password.to_string(),
                confirm_password: confirmation.to_string(),
            })
            .await?;
        self.step = AuthStep::SignIn;
        Ok(())
    }

    pub fn back_to_sign_in(&mut self) {
        self.step = AuthStep::SignIn;
    }

    fn expect(&self, allowed: &[&'static str]) -> Result<(), ClientError> {
        let actual = self.step.name();
        if allowed.contains(&actual) {
            Ok(())
        } else {
            Err(ClientError::InvalidStep {
                expected: allowed[0],
                actual,
            })
        }
    }
}
