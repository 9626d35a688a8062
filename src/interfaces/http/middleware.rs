//! Authentication middleware for Axum

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::{DomainError, UserRole};
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenClaims, TokenKind};
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse};

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    WrongTokenType,
}

/// State for [`auth_middleware`]
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Caller identity taken from a verified access token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub email: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: TokenClaims) -> Option<Self> {
        Some(Self {
            user_id: claims.user_id()?,
            role: UserRole::parse(&claims.role)?,
            email: claims.email,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Reject non-admin callers with 403.
pub fn ensure_admin(user: &AuthenticatedUser) -> Result<(), ApiError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(domain_error(DomainError::Forbidden(
            "Admin role required".into(),
        )))
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Bearer JWT authentication. Only access tokens are accepted.
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return auth_error_response(AuthError::MissingToken);
    };

    let Some(token) = extract_token(auth_header) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    let claims = match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => claims,
        Err(e) => {
            use jsonwebtoken::errors::ErrorKind;
            return match e.kind() {
                ErrorKind::ExpiredSignature => auth_error_response(AuthError::ExpiredToken),
                _ => auth_error_response(AuthError::InvalidToken),
            };
        }
    };

    if claims.token_type != TokenKind::Access {
        return auth_error_response(AuthError::WrongTokenType);
    }

    let Some(user) = AuthenticatedUser::from_claims(claims) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    request.extensions_mut().insert(user);
    next.run(request).await
}

fn auth_error_response(error: AuthError) -> Response {
    let message = match error {
        AuthError::MissingToken => "Missing authentication token",
        AuthError::InvalidToken => "Invalid authentication token",
        AuthError::ExpiredToken => "Token has expired",
        AuthError::WrongTokenType => "Access token required",
    };

    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::error(message)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::{Extension, Router};
    use tower::Service;

    use crate::infrastructure::crypto::jwt::create_token;

    async fn whoami(Extension(user): Extension<AuthenticatedUser>) -> String {
        format!("{}:{}", user.user_id, user.role)
    }

    async fn call(auth: Option<String>) -> (StatusCode, String) {
        let state = AuthState {
            jwt_config: JwtConfig::default(),
        };
        let mut svc = Router::new()
            .route("/me", get(whoami))
            .layer(axum::middleware::from_fn_with_state(state, auth_middleware))
            .into_service();

        let mut req = Request::builder().uri("/me");
        if let Some(value) = auth {
            req = req.header(header::AUTHORIZATION, value);
        }
        let resp = svc.call(req.body(Body::empty()).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn token(kind: TokenKind) -> String {
        create_token(7, "ann@example.com", "admin", kind, &JwtConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn access_token_is_accepted() {
        let (status, body) = call(Some(format!("Bearer {}", token(TokenKind::Access)))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "7:admin");
    }

    #[tokio::test]
    async fn missing_malformed_and_refresh_tokens_are_rejected() {
        assert_eq!(call(None).await.0, StatusCode::UNAUTHORIZED);
        assert_eq!(call(Some("Token abc".into())).await.0, StatusCode::UNAUTHORIZED);
        assert_eq!(call(Some("Bearer nope".into())).await.0, StatusCode::UNAUTHORIZED);

        let (status, body) = call(Some(format!("Bearer {}", token(TokenKind::Refresh)))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Access token required"));
    }

    #[test]
    fn only_admins_pass_ensure_admin() {
        let mut user = AuthenticatedUser {
            user_id: 1,
            email: "a@b.c".into(),
            role: UserRole::User,
        };
        assert_eq!(ensure_admin(&user).unwrap_err().0, StatusCode::FORBIDDEN);
        user.role = UserRole::Admin;
        assert!(ensure_admin(&user).is_ok());
    }
}
