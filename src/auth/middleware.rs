//! Token authentication middleware implementation.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tower::{Layer, Service};

use crate::token::Token;

/// Layer that authenticates requests against an ephemeral [`Token`].
///
/// Every request is checked with [`Token::verify`], so once the token
/// expires all requests are rejected.
///
/// # Example
///
/// ```rust,ignore
/// use ephemeral_token::{CreateOptions, Token, TokenAuthLayer};
///
/// let token = Token::create(CreateOptions::default()).await?;
/// println!("link: https://example.test/api?token={token}");
///
/// let router = Router::new()
///     .route("/api", get(handler))
///     .layer(TokenAuthLayer::new(token));
/// ```
#[derive(Clone)]
pub struct TokenAuthLayer {
    token: Arc<Token>,
    realm: Arc<str>,
}

impl TokenAuthLayer {
    /// Create a new token auth layer with the given token.
    pub fn new(token: Token) -> Self {
        Self::with_realm(token, "ephemeral-token".to_string())
    }

    /// Create a new token auth layer with a custom realm.
    pub fn with_realm(token: Token, realm: String) -> Self {
        Self {
            token: Arc::new(token),
            realm: Arc::from(realm),
        }
    }
}

impl<S> Layer<S> for TokenAuthLayer {
    type Service = TokenAuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TokenAuthService {
            inner,
            token: self.token.clone(),
            realm: self.realm.clone(),
        }
    }
}

/// Service that validates token authentication.
///
/// Accepts authentication via:
/// - Bearer token: `Authorization: Bearer <token>`
/// - Basic Auth: Any username with token as password
#[derive(Clone)]
pub struct TokenAuthService<S> {
    inner: S,
    token: Arc<Token>,
    realm: Arc<str>,
}

impl<S> Service<Request<Body>> for TokenAuthService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let token = self.token.clone();
        let realm = self.realm.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let presented = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(presented_credential);

            match presented {
                Some(candidate) if token.verify(&candidate) => return inner.call(req).await,
                Some(_) if token.is_expired() => {
                    tracing::debug!(uri = %req.uri(), "rejected request: token expired");
                }
                Some(_) => tracing::debug!(uri = %req.uri(), "rejected request: token mismatch"),
                None => tracing::debug!(uri = %req.uri(), "rejected request: no credentials"),
            }

            Ok(unauthorized(&realm))
        })
    }
}

/// Extract the presented token from an `Authorization` header value.
fn presented_credential(auth: &str) -> Option<String> {
    if let Some(bearer) = auth.strip_prefix("Bearer ") {
        return Some(bearer.to_string());
    }

    // Any username, token as password
    let encoded = auth.strip_prefix("Basic ")?;
    let decoded = String::from_utf8(STANDARD.decode(encoded.trim()).ok()?).ok()?;
    let (_username, password) = decoded.split_once(':')?;
    Some(password.to_string())
}

fn unauthorized(realm: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(
            header::WWW_AUTHENTICATE,
            format!("Bearer, Basic realm=\"{realm}\""),
        )],
        "Unauthorized",
    )
        .into_response()
}
