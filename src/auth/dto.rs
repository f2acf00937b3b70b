use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date, OffsetDateTime};
use uuid::Uuid;

use crate::{
    auth::{repo_types::User, services::is_valid_email},
    error::FieldError,
};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Request bodies that need checks beyond what deserialization gives.
pub trait Validate {
    type Valid;

    fn validate(self) -> Result<Self::Valid, Vec<FieldError>>;
}

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub fullname: String,
    pub phone_number: String,
    pub birthday: String,
}

/// Registration that passed validation.
#[derive(Debug)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone_number: String,
    pub birthday: Date,
}

impl Validate for RegisterRequest {
    type Valid = Registration;

    fn validate(self) -> Result<Registration, Vec<FieldError>> {
        let mut errors = Vec::new();
        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "value is not a valid email address"));
        }
        let format = format_description!("[year]-[month]-[day]");
        let birthday = match Date::parse(&self.birthday, format) {
            Ok(d) => Some(d),
            Err(_) => {
                errors.push(FieldError::new("birthday", "expected a date as YYYY-MM-DD"));
                None
            }
        };

        match birthday {
            Some(birthday) if errors.is_empty() => Ok(Registration {
                email: self.email,
                password: self.password,
                full_name: self.fullname,
                phone_number: self.phone_number,
                birthday,
            }),
            _ => Err(errors),
        }
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    type Valid = LoginRequest;

    fn validate(self) -> Result<LoginRequest, Vec<FieldError>> {
        if is_valid_email(&self.email) {
            Ok(self)
        } else {
            Err(vec![FieldError::new("email", "value is not a valid email address")])
        }
    }
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub fullname: String,
    pub phone_number: String,
    #[serde(with = "iso_date")]
    pub birthday: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            fullname: user.full_name,
            phone_number: user.phone_number,
            birthday: user.birthday,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use super::*;

    fn register_request(email: &str, birthday: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            password: "testpassword123".into(),
            fullname: "Test User".into(),
            phone_number: "0812345678".into(),
            birthday: birthday.into(),
        }
    }

    #[test]
    fn valid_registration_parses_birthday() {
        let reg = register_request("test@example.com", "1990-01-01")
            .validate()
            .expect("valid");
        assert_eq!(reg.birthday, date!(1990 - 01 - 01));
        assert_eq!(reg.full_name, "Test User");
    }

    #[test]
    fn reports_every_bad_field() {
        let errors = register_request("not-an-email", "1990-13-40")
            .validate()
            .unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["email", "birthday"]);
    }

    #[test]
    fn login_requires_email_shape() {
        let bad = LoginRequest {
            email: "nope".into(),
            password: "p1".into(),
        };
        assert_eq!(bad.validate().unwrap_err()[0].field, "email");
    }

    #[test]
    fn public_user_hides_hash_and_formats_dates() {
        let user = User {
            id: Uuid::new_v4(),
            email: "test@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            full_name: "Test User".into(),
            phone_number: "0812345678".into(),
            birthday: date!(1990 - 01 - 01),
            created_at: datetime!(2024-05-06 07:08:09 UTC),
        };
        let json = serde_json::to_value(PublicUser::from(user)).unwrap();
        assert_eq!(json["email"], "test@example.com");
        assert_eq!(json["fullname"], "Test User");
        assert_eq!(json["birthday"], "1990-01-01");
        assert_eq!(json["created_at"], "2024-05-06T07:08:09Z");
        assert!(json.get("password_hash").is_none());
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn token_response_is_bearer() {
        let json = serde_json::to_value(TokenResponse::bearer("abc".into())).unwrap();
        assert_eq!(json["access_token"], "abc");
        assert_eq!(json["token_type"], "bearer");
    }
}
