use crate::{model::Id, util::lenient_int};
use serde::{Deserialize, Serialize};

pub const USERNAME_MAX_LEN: usize = 100;

pub const SIGNUP_MESSAGE: &str = "Signup complete";
pub const LOGIN_MESSAGE: &str = "Login successful";

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct UserMarker;

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct User {
    pub id: Id<UserMarker>,
    pub username: String,
}

/// Body of both `/signup/` and `/login/`.
///
/// The password is a plain integer and is stored and compared as-is.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
pub struct Credentials {
    pub username: String,
    #[serde(deserialize_with = "lenient_int::deserialize")]
    pub password: i64,
}

/// Reply to a successful signup.
///
/// `user_id` carries the *username*, not the numeric id. Existing clients read it that way.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize)]
pub struct SignupResponse {
    pub message: &'static str,
    pub user_id: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub user: String,
    pub user_id: Id<UserMarker>,
}

impl SignupResponse {
    #[must_use]
    pub fn new(user: User) -> Self {
        Self {
            message: SIGNUP_MESSAGE,
            user_id: user.username,
        }
    }
}

impl LoginResponse {
    #[must_use]
    pub fn new(user: User) -> Self {
        Self {
            message: LOGIN_MESSAGE,
            user: user.username,
            user_id: user.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::user::{Credentials, LoginResponse, SignupResponse, User};
    use serde_json::json;

    fn alice() -> User {
        User {
            id: 3.into(),
            username: "alice".to_owned(),
        }
    }

    #[test]
    fn credentials_coerce_numeric_password() {
        let credentials: Credentials =
            serde_json::from_value(json!({"username": "alice", "password": "123"})).unwrap();

        assert_eq!(
            credentials,
            Credentials {
                username: "alice".to_owned(),
                password: 123,
            }
        );
    }

    #[test]
    fn credentials_reject_wrong_shapes() {
        assert!(
            serde_json::from_value::<Credentials>(json!({"username": 1, "password": 123})).is_err()
        );
        assert!(serde_json::from_value::<Credentials>(json!({"username": "alice"})).is_err());
    }

    #[test]
    fn signup_response_reports_username_as_user_id() {
        let value = serde_json::to_value(SignupResponse::new(alice())).unwrap();

        assert_eq!(
            value,
            json!({"message": "Signup complete", "user_id": "alice"})
        );
    }

    #[test]
    fn login_response_reports_numeric_id() {
        let value = serde_json::to_value(LoginResponse::new(alice())).unwrap();

        assert_eq!(
            value,
            json!({"message": "Login successful", "user": "alice", "user_id": 3})
        );
    }
}
