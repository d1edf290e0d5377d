//! Accounts: registration, sign-in, username probes and per-user lookups.
//!
//! Passwords are stored as Argon2 encoded hashes with a random 16 byte salt.
//! Hashing and verification run on the blocking pool.

use anyhow::anyhow;
use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::commands::accounts::{
    GeneratedFinancialData, RegisterCommand, RegisterResult, SignInCommand, SignInResult,
    UserRoomResult,
};
use crate::domain::errors::{non_empty, DomainError, DomainResult};
use crate::domain::financial_data::FinancialDataGenerator;
use crate::domain::models::account::{MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH};
use crate::domain::models::Account;
use crate::domain::room_service::RoomService;
use crate::domain::session_service::SessionService;
use crate::storage::{AccountStorage, Connection, RoomStorage};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Clone)]
pub struct AccountService<C: Connection> {
    account_repository: C::AccountRepository,
    room_repository: C::RoomRepository,
    room_service: RoomService<C>,
    session_service: SessionService,
    generator: Arc<dyn FinancialDataGenerator>,
}

impl<C: Connection> AccountService<C> {
    pub fn new(
        connection: Arc<C>,
        room_service: RoomService<C>,
        session_service: SessionService,
        generator: Arc<dyn FinancialDataGenerator>,
    ) -> Self {
        Self {
            account_repository: connection.create_account_repository(),
            room_repository: connection.create_room_repository(),
            room_service,
            session_service,
            generator,
        }
    }

    /// Create an account, optionally attach it to a room, open a session and
    /// try to generate its financial data. A generator failure does not fail
    /// the registration.
    pub async fn register(&self, command: RegisterCommand) -> DomainResult<RegisterResult> {
        let (username, password) = match (
            non_empty(command.username.as_deref()),
            command.password.filter(|p| !p.is_empty()),
        ) {
            (Some(username), Some(password)) => (Account::normalize_username(username), password),
            _ => return Err(DomainError::validation("Username and password are required")),
        };

        if username.chars().count() < MIN_USERNAME_LENGTH {
            return Err(DomainError::validation(
                "Username must be at least 3 characters long",
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::validation(
                "Password must be at least 6 characters long",
            ));
        }

        info!("Registering account {}", username);

        let taken = || {
            DomainError::conflict("Username already exists. Please choose a different username.")
        };
        if self.account_repository.get_account(&username).await?.is_some() {
            return Err(taken());
        }

        let password_hash = hash_password(password).await?;
        let id = Account::generate_id(Utc::now().timestamp_millis(), &mut rand::thread_rng());
        let mut account = Account {
            id,
            username: username.clone(),
            password_hash,
            room_id: None,
            financial_data: None,
            created_at: Utc::now(),
        };

        if !self.account_repository.store_account(&account).await? {
            return Err(taken());
        }

        if let Some(code) = non_empty(command.room_id.as_deref()) {
            match self.room_service.attach_on_register(code, &username).await {
                Ok(room) => account.room_id = Some(room.id),
                Err(e) => warn!("Could not attach {} to room {}: {}", username, code, e),
            }
        }

        let token = self.session_service.sign_in_session(&username).await;

        let financial_data = match self.generator.generate(&account.id).await {
            Ok(data) => {
                if let Err(e) = self.account_repository.set_financial_data(&username, &data).await {
                    warn!("Failed to store financial data for {}: {}", username, e);
                }
                account.financial_data = Some(data.clone());
                Some(data)
            }
            Err(e) => {
                warn!("Financial data generation failed for {}: {}", account.id, e);
                None
            }
        };

        info!("Registered account {} ({})", username, account.id);
        Ok(RegisterResult {
            account,
            token,
            financial_data,
        })
    }

    pub async fn username_available(&self, username: Option<&str>) -> DomainResult<bool> {
        Ok(!self.username_exists(username).await?)
    }

    pub async fn username_exists(&self, username: Option<&str>) -> DomainResult<bool> {
        let username = non_empty(username)
            .map(Account::normalize_username)
            .ok_or_else(|| DomainError::validation("Username is required"))?;
        Ok(self.account_repository.get_account(&username).await?.is_some())
    }

    pub async fn sign_in(&self, command: SignInCommand) -> DomainResult<SignInResult> {
        let (username, password) = match (
            non_empty(command.username.as_deref()),
            command.password.filter(|p| !p.is_empty()),
        ) {
            (Some(username), Some(password)) => (Account::normalize_username(username), password),
            _ => return Err(DomainError::validation("Username and password are required")),
        };

        info!("Sign in attempt for {}", username);

        let account = self
            .account_repository
            .get_account(&username)
            .await?
            .ok_or_else(|| DomainError::unauthorized(INVALID_CREDENTIALS))?;

        if !verify_password(account.password_hash.clone(), password).await? {
            warn!("Bad password for {}", username);
            return Err(DomainError::unauthorized(INVALID_CREDENTIALS));
        }

        let token = self.session_service.sign_in_session(&account.username).await;

        let room = match &account.room_id {
            Some(room_id) => match self.room_repository.get_room(room_id).await {
                Ok(room) => room,
                Err(e) => {
                    warn!("Failed to load room {} during sign in: {}", room_id, e);
                    None
                }
            },
            None => None,
        };

        Ok(SignInResult {
            username: account.username,
            token,
            room,
        })
    }

    pub async fn list_users(&self) -> DomainResult<Vec<Account>> {
        Ok(self.account_repository.list_accounts().await?)
    }

    /// The room `user` currently belongs to; users may only ask about themselves
    pub async fn user_room(&self, actor: Option<&str>, user: &str) -> DomainResult<UserRoomResult> {
        let actor = actor.ok_or_else(|| {
            DomainError::unauthorized("You must be signed in to check room membership")
        })?;
        if !is_same_user(actor, user) {
            return Err(DomainError::forbidden(
                "You can only check your own room membership",
            ));
        }

        let account = self.find_account(user).await?;
        let room = match &account.room_id {
            Some(room_id) => self.room_repository.get_room(room_id).await?,
            None => None,
        };

        Ok(UserRoomResult { room })
    }

    /// Run the generator for `user` and store the result on the account
    pub async fn regenerate_financial_data(
        &self,
        actor: Option<&str>,
        user: &str,
    ) -> DomainResult<GeneratedFinancialData> {
        let account = self.financial_data_owner(actor, user).await?;

        let data = self
            .generator
            .generate(&account.id)
            .await
            .map_err(|e| DomainError::Generator(e.to_string()))?;
        self.account_repository
            .set_financial_data(&account.username, &data)
            .await?;

        Ok(GeneratedFinancialData {
            user_id: account.id,
            data,
        })
    }

    /// The stored financial data document, if one was ever generated
    pub async fn get_financial_data(&self, actor: Option<&str>, user: &str) -> DomainResult<Account> {
        self.financial_data_owner(actor, user).await
    }

    async fn financial_data_owner(&self, actor: Option<&str>, user: &str) -> DomainResult<Account> {
        let actor = actor.ok_or_else(|| {
            DomainError::unauthorized("You must be signed in to access financial data")
        })?;
        if !is_same_user(actor, user) {
            return Err(DomainError::forbidden(
                "You can only access your own financial data",
            ));
        }
        self.find_account(user).await
    }

    async fn find_account(&self, user: &str) -> DomainResult<Account> {
        self.account_repository
            .get_account(&Account::normalize_username(user))
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))
    }
}

fn is_same_user(actor: &str, user: &str) -> bool {
    Account::normalize_username(actor) == Account::normalize_username(user)
}

async fn hash_password(password: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || {
        let salt: [u8; 16] = rand::thread_rng().gen();
        argon2::hash_encoded(password.as_bytes(), &salt, &argon2::Config::default())
            .map_err(|e| anyhow!("password hashing failed: {}", e))
    })
    .await?
}

async fn verify_password(hash: String, password: String) -> anyhow::Result<bool> {
    let valid = tokio::task::spawn_blocking(move || {
        argon2::verify_encoded(&hash, password.as_bytes()).unwrap_or(false)
    })
    .await?;
    Ok(valid)
}
