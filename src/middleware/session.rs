use std::fmt;
use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, HttpResponse};
use futures_util::future::LocalBoxFuture;
use log::{debug, error};
use uuid::Uuid;

use crate::cookies::{find_cookie, set_response_cookie, CookiePolicy};

/// Opaque per-browser correlation token.
///
/// The value is whatever the session cookie holds; it is never validated
/// and carries no authorization meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Mint a new random identifier (UUID v4)
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extracts the session id resolved by [`SessionIdentity`].
///
/// Fails with 500 when the middleware is not installed on the route.
impl FromRequest for SessionId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(req.extensions().get::<SessionId>().cloned().ok_or_else(|| {
            error!("Session id requested on a route without session identity middleware");
            actix_web::error::ErrorInternalServerError("session identity unavailable")
        }))
    }
}

/// Guarantees every request carries a session identifier.
///
/// First contact (no session cookie) mints a new id and sets it as a cookie
/// on the response. A request whose cookies cannot be read at all is
/// answered with 500 and never reaches the wrapped service.
#[derive(Clone)]
pub struct SessionIdentity {
    policy: Rc<CookiePolicy>,
}

impl SessionIdentity {
    #[must_use]
    pub fn new(policy: CookiePolicy) -> Self {
        Self {
            policy: Rc::new(policy),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionIdentity
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = SessionIdentityMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionIdentityMiddleware {
            service,
            policy: Rc::clone(&self.policy),
        }))
    }
}

pub struct SessionIdentityMiddleware<S> {
    service: S,
    policy: Rc<CookiePolicy>,
}

impl<S, B> Service<ServiceRequest> for SessionIdentityMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let session_cookie = self.policy.session_cookie_name();

        let existing = match find_cookie(req.request(), session_cookie) {
            Ok(existing) => existing,
            Err(e) => {
                error!("unrecognized cookie error: {e}");
                let res = req
                    .into_response(HttpResponse::InternalServerError().finish())
                    .map_into_right_body();
                return Box::pin(ready(Ok(res)));
            }
        };

        let (session_id, minted) = match existing {
            Some(cookie) => (SessionId(cookie.value().to_owned()), None),
            None => {
                let session_id = SessionId::generate();
                debug!("Issuing new session id {session_id}");
                let cookie = self.policy.issue(session_cookie, session_id.as_str());
                (session_id, Some(cookie))
            }
        };

        req.extensions_mut().insert(session_id);
        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            if let Some(cookie) = minted {
                set_response_cookie(res.response_mut(), &cookie);
            }
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_are_unique() {
        let ids: HashSet<SessionId> = (0..1000).map(|_| SessionId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_generated_id_is_uuid() {
        let id = SessionId::generate();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
        assert_eq!(id.as_str().len(), 36);
    }

    #[test]
    fn test_display_is_raw_value() {
        let id = SessionId::from("opaque-token".to_string());
        assert_eq!(id.to_string(), "opaque-token");
        assert_eq!(id.into_inner(), "opaque-token");
    }
}
