//! Registration workflow: rate limiting, persistence, activation email
//! dispatch, and issuance of the initial session token.

use chrono::Utc;
use tracing::{info, warn};

use passport_core::error::{PassportError, PassportResult};
use passport_core::models::client::ClientInfo;
use passport_core::models::login_user::{LoginUser, LoginUserStatus, UserStatus};
use passport_core::models::registering_user::{CreateRegisteringUser, RegisteringUser};
use passport_core::repository::RegisteringUserRepository;
use passport_core::support::{EmailSender, RegistrationLimiter, RegistrationNotifier};

use crate::activation::{ActivationClaims, ActivationTokenCodec};
use crate::config::AuthConfig;
use crate::password;
use crate::token::TokenCodec;

/// Input for email registration.
#[derive(Debug, Clone)]
pub struct RegisterByEmail {
    pub user_name: String,
    pub email: String,
    pub password: String,
}

/// Successful registration result: the caller is authenticated
/// immediately, even though the account is not yet activated.
#[derive(Debug, Clone)]
pub struct RegisteredLogin {
    /// Signed session token.
    pub token: String,
    pub login_user: LoginUser,
    pub status: LoginUserStatus,
}

/// Orchestrates email registration and activation.
///
/// Generic over the repository and collaborator traits so the workflow
/// has no dependency on any concrete store or transport.
pub struct RegistrationWorkflow<R, L, E, N>
where
    R: RegisteringUserRepository,
    L: RegistrationLimiter,
    E: EmailSender,
    N: RegistrationNotifier,
{
    registering: R,
    limiter: L,
    email: E,
    notifier: N,
    session_codec: TokenCodec,
    activation_codec: ActivationTokenCodec,
    config: AuthConfig,
}

impl<R, L, E, N> RegistrationWorkflow<R, L, E, N>
where
    R: RegisteringUserRepository,
    L: RegistrationLimiter,
    E: EmailSender,
    N: RegistrationNotifier,
{
    pub fn new(registering: R, limiter: L, email: E, notifier: N, config: AuthConfig) -> Self {
        let session_codec = TokenCodec::new(config.encrypt_key.clone());
        let activation_codec = ActivationTokenCodec::new(
            config.activation_secret.clone(),
            config.activation_token_ttl_secs,
        );
        Self {
            registering,
            limiter,
            email,
            notifier,
            session_codec,
            activation_codec,
            config,
        }
    }

    /// Register a new account by email.
    ///
    /// Checks the rate limit and password policy, hashes, then persists.
    /// The store's uniqueness constraint is the duplicate signal; there
    /// is no prior existence read. After persistence: best-effort
    /// notifier, activation email, then mint and sign the initial
    /// session.
    pub async fn register_by_email(
        &self,
        input: RegisterByEmail,
        client: &ClientInfo,
    ) -> PassportResult<RegisteredLogin> {
        self.limiter.check(&client.ip).await?;

        if input.password.chars().count() < self.config.min_password_length {
            return Err(PassportError::Validation {
                message: format!(
                    "password must be at least {} characters",
                    self.config.min_password_length
                ),
            });
        }

        let password_hash = password::hash_password(&input.password, self.config.pepper.as_deref())?;
        let user = self
            .registering
            .create(CreateRegisteringUser {
                user_name: input.user_name,
                email: input.email,
                password_hash,
            })
            .await?;

        if let Err(e) = self.notifier.registered(user.id, client).await {
            warn!(user_id = %user.id, error = %e, "registration notifier failed");
        }

        self.send_activation_email(&user).await?;

        let now = Utc::now().timestamp_millis();
        let expire_at = now + self.config.session_lifetime_secs as i64 * 1000;
        let login_user = LoginUser::new(
            user.id,
            user.user_name.clone(),
            self.config.default_avatar.clone(),
            client.device_id.clone(),
            now,
            expire_at,
        );
        let status = LoginUserStatus::new(UserStatus::Normal, expire_at);
        let token = self.session_codec.sign(&login_user)?;

        info!(user_id = %user.id, "registered new account by email");
        Ok(RegisteredLogin {
            token,
            login_user,
            status,
        })
    }

    /// Mint an activation token for `user` and dispatch the activation
    /// email. Send failures propagate; without the email the account
    /// can never be activated.
    pub async fn send_activation_email(&self, user: &RegisteringUser) -> PassportResult<()> {
        let claims = ActivationClaims::new(
            user.id,
            user.user_name.clone(),
            user.email.clone(),
            user.password_hash.clone(),
            Utc::now().timestamp_millis(),
        );
        let token = self.activation_codec.create_token(&claims)?;
        let body = format!("{}{}", self.config.activation_link_base, token);

        self.email
            .send(
                &user.email,
                &self.config.activation_subject,
                &body,
                &self.config.language,
            )
            .await
    }

    /// Consume an activation link: decode, verify against the account's
    /// *current* password hash, bind-check the username, and mark the
    /// account active. Repeat activation is a no-op.
    pub async fn active_email(&self, token: &str) -> PassportResult<()> {
        let pair = self.activation_codec.parse(token)?;
        let mut user = self.registering.find_by_email(pair.email()).await?;

        let claims = self.activation_codec.verify(&pair, &user.password_hash)?;
        if !claims.matches_user_name(&user.user_name) {
            return Err(PassportError::Validation {
                message: "activation token does not match the account's current user name".into(),
            });
        }

        user.activate();
        self.registering.save(&user).await?;
        info!(user_id = %user.id, "account activated by email token");
        Ok(())
    }
}
