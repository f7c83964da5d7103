//! Account use-cases: login, signup and signed-in user lookup.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    LoginService, PasswordHasher, SignupService, UserPersistenceError, UserRegistration,
    UserRepository, UsersQuery,
};
use crate::domain::{
    Error, FieldErrors, FormOutcome, LoginCredentials, NewAccount, User, UserId,
};

/// Message shown when a signup picks a taken username.
pub const USERNAME_TAKEN: &str = "a user with that username already exists";

/// Implements the account driving ports.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl LoginService for AccountService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let Some(stored) = self.users.find_credentials(credentials.username()).await? else {
            warn!("login attempt for unknown username");
            return Err(Error::unauthorized("invalid credentials"));
        };
        if !self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .await?
        {
            warn!(user = %stored.user.id(), "login attempt with wrong password");
            return Err(Error::unauthorized("invalid credentials"));
        }
        Ok(stored.user.id().clone())
    }
}

#[async_trait]
impl SignupService for AccountService {
    async fn signup(&self, account: &NewAccount) -> Result<FormOutcome<User>, Error> {
        let username = account.username().as_ref();
        if self.users.find_by_username(username).await?.is_some() {
            return Ok(FormOutcome::Invalid(FieldErrors::single("username", USERNAME_TAKEN)));
        }

        let registration = UserRegistration {
            username: account.username().clone(),
            name: account.name().clone(),
            email: account.email().map(str::to_owned),
            password_hash: self.hasher.hash(account.password()).await?,
        };
        match self.users.create(&registration).await {
            Ok(user) => {
                info!(user = %user.id(), "account created");
                Ok(FormOutcome::Saved(user))
            }
            // Lost a race with a concurrent signup for the same name.
            Err(UserPersistenceError::DuplicateUsername { .. }) => {
                Ok(FormOutcome::Invalid(FieldErrors::single("username", USERNAME_TAKEN)))
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl UsersQuery for AccountService {
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error> {
        Ok(self.users.find_by_id(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockPasswordHasher, MockUserRepository, StoredCredentials};
    use crate::domain::repositories::test_support::user;
    use crate::domain::{ErrorCode, SignupRequest};
    use rstest::rstest;

    fn service(users: MockUserRepository, hasher: MockPasswordHasher) -> AccountService {
        AccountService::new(Arc::new(users), Arc::new(hasher))
    }

    fn account(username: &str) -> NewAccount {
        NewAccount::try_from_request(&SignupRequest {
            username,
            password1: "war-and-peace",
            password2: "war-and-peace",
            ..SignupRequest::default()
        })
        .expect("valid signup")
    }

    #[rstest]
    #[case(true, None)]
    #[case(false, Some(ErrorCode::Unauthorized))]
    #[tokio::test]
    async fn authenticate_checks_password(
        #[case] password_matches: bool,
        #[case] expected_error: Option<ErrorCode>,
    ) {
        let leo = user("leo");
        let leo_id = leo.id().clone();
        let mut users = MockUserRepository::new();
        users.expect_find_credentials().return_once(move |_| {
            Ok(Some(StoredCredentials {
                user: leo,
                password_hash: "$2b$hash".to_owned(),
            }))
        });
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_verify()
            .withf(|password, hash| password == "secret" && hash == "$2b$hash")
            .return_once(move |_, _| Ok(password_matches));

        let creds = LoginCredentials::try_from_parts("leo", "secret").expect("credentials");
        let result = service(users, hasher).authenticate(&creds).await;
        match expected_error {
            None => assert_eq!(result.expect("login succeeds"), leo_id),
            Some(code) => assert_eq!(result.expect_err("login fails").code(), code),
        }
    }

    #[tokio::test]
    async fn authenticate_rejects_unknown_user_without_hashing() {
        let mut users = MockUserRepository::new();
        users.expect_find_credentials().return_once(|_| Ok(None));
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().never();

        let creds = LoginCredentials::try_from_parts("ghost", "secret").expect("credentials");
        let err = service(users, hasher)
            .authenticate(&creds)
            .await
            .expect_err("unknown user");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn signup_stores_hash_not_password() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().return_once(|_| Ok(None));
        users
            .expect_create()
            .withf(|registration| {
                registration.password_hash == "hashed" && registration.username.as_ref() == "leo"
            })
            .return_once(|_| Ok(user("leo")));
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .withf(|password| password == "war-and-peace")
            .return_once(|_| Ok("hashed".to_owned()));

        let outcome = service(users, hasher)
            .signup(&account("leo"))
            .await
            .expect("signup resolves");
        assert!(matches!(outcome, FormOutcome::Saved(_)));
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    #[tokio::test]
    async fn signup_reports_taken_username(#[case] detected_up_front: bool) {
        let mut users = MockUserRepository::new();
        let mut hasher = MockPasswordHasher::new();
        if detected_up_front {
            users
                .expect_find_by_username()
                .return_once(|_| Ok(Some(user("leo"))));
            hasher.expect_hash().never();
        } else {
            users.expect_find_by_username().return_once(|_| Ok(None));
            hasher.expect_hash().return_once(|_| Ok("hashed".to_owned()));
            users
                .expect_create()
                .return_once(|_| Err(UserPersistenceError::duplicate_username("leo")));
        }

        let outcome = service(users, hasher)
            .signup(&account("leo"))
            .await
            .expect("signup resolves");
        match outcome {
            FormOutcome::Invalid(errors) => assert_eq!(errors.get("username"), [USERNAME_TAKEN]),
            FormOutcome::Saved(_) => panic!("duplicate username must not save"),
        }
    }
}
