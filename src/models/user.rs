use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip)]
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

// Request fields are optional so missing values surface as validation failures.
// Numbers and booleans are taken in their string form; arrays, objects and null
// count as missing.
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default, deserialize_with = "scalar_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "scalar_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateRequest {
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub authtoken: String,
    pub first_name: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub authtoken: String,
    pub user_name: String,
    pub user_email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub authtoken: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUser {
    pub id: String,
}

/// Token payload: `{"user": {"id": ..}, "iat": ..}`. Carries no `exp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user: TokenUser,
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_names_are_camel_case() {
        let response = LoginResponse {
            authtoken: "t".into(),
            user_name: "A".into(),
            user_email: "a@x.com".into(),
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "authtoken": "t", "userName": "A", "userEmail": "a@x.com" })
        );

        let req: RegisterRequest =
            serde_json::from_value(json!({ "email": "a@x.com", "firstName": "A" })).unwrap();
        assert_eq!(req.first_name.as_deref(), Some("A"));
        assert!(req.last_name.is_none());
    }

    #[test]
    fn scalar_values_are_read_as_strings() {
        let req: RegisterRequest = serde_json::from_value(json!({
            "email": "a@x.com",
            "firstName": 123,
            "lastName": true,
            "password": 1234567,
        }))
        .unwrap();
        assert_eq!(req.first_name.as_deref(), Some("123"));
        assert_eq!(req.last_name.as_deref(), Some("true"));
        assert_eq!(req.password.as_deref(), Some("1234567"));

        let req: LoginRequest =
            serde_json::from_value(json!({ "email": ["a@x.com"], "password": null })).unwrap();
        assert!(req.email.is_none());
        assert!(req.password.is_none());

        let req: UpdateRequest = serde_json::from_value(json!({ "name": { "first": "A" } })).unwrap();
        assert!(req.name.is_none());
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: 1,
            email: "a@x.com".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            password: "$argon2id$...".into(),
            created_at: Utc::now(),
            updated_at: None,
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["firstName"], "A");
    }
}
