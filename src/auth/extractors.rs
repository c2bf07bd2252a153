use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use uuid::Uuid;

use super::claims::{Claims, Role};
use crate::state::AppState;

/// Extracts and validates the Bearer token, yielding the caller identity.
///
/// Tokens are issued elsewhere; this service only verifies them.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "missing Authorization header".into(),
            ))?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or((StatusCode::UNAUTHORIZED, "invalid auth scheme".into()))?;

        let cfg = &state.config.jwt;
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&cfg.audience));
        validation.set_issuer(std::slice::from_ref(&cfg.issuer));
        let decoding = DecodingKey::from_secret(cfg.secret.as_bytes());

        let data = decode::<Claims>(token, &decoding, &validation)
            .map_err(|_| (StatusCode::UNAUTHORIZED, "invalid or expired token".into()))?;

        Ok(AuthUser {
            id: data.claims.sub,
            role: data.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRequestParts;
    use axum::http::Request;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use time::OffsetDateTime;

    fn sign(state: &AppState, sub: Uuid, role: Role) -> String {
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        let claims = Claims {
            sub,
            iat: now,
            exp: now + 300,
            iss: state.config.jwt.issuer.clone(),
            aud: state.config.jwt.audience.clone(),
            role,
        };
        let key = EncodingKey::from_secret(state.config.jwt.secret.as_bytes());
        encode(&Header::default(), &claims, &key).expect("sign test token")
    }

    #[tokio::test]
    async fn extracts_id_and_role_from_valid_token() {
        let state = AppState::fake();
        let user_id = Uuid::new_v4();
        let token = sign(&state, user_id, Role::Admin);

        let req = Request::builder()
            .header("Authorization", format!("Bearer {token}"))
            .body(())
            .unwrap();
        let (mut parts, _) = req.into_parts();

        let auth = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .expect("valid token accepted");
        assert_eq!(auth.id, user_id);
        assert_eq!(auth.role, Role::Admin);
    }

    #[tokio::test]
    async fn rejects_missing_header() {
        let state = AppState::fake();
        let req = Request::builder().body(()).unwrap();
        let (mut parts, _) = req.into_parts();

        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejects_garbage_token() {
        let state = AppState::fake();
        let req = Request::builder()
            .header("Authorization", "Bearer not-a-jwt")
            .body(())
            .unwrap();
        let (mut parts, _) = req.into_parts();

        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::UNAUTHORIZED);
    }
}
