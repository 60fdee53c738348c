use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    error::AppError,
    models::user::{Claims, TokenUser},
};

pub fn sign(user_id: i64, key: &EncodingKey) -> Result<String, AppError> {
    let claims = Claims {
        user: TokenUser {
            id: user_id.to_string(),
        },
        iat: chrono::Utc::now().timestamp() as usize,
    };

    let token = encode(&Header::new(Algorithm::HS256), &claims, key)?;
    Ok(token)
}

/// Decode a token signed by [`sign`]. Tokens carry no expiry, so none is required.
pub fn verify(token: &str, key: &DecodingKey) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims.clear();
    validation.validate_exp = false;

    let data = decode::<Claims>(token, key, &validation)?;
    Ok(data.claims)
}
