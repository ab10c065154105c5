use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::cookie::Cookie;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpResponse};
use futures_util::future::LocalBoxFuture;
use log::debug;

use crate::cookies::{request_cookies, response_cookie_names, set_response_cookie, CookiePolicy};

/// Keeps every cookie the browser sends alive.
///
/// Each cookie on the incoming request is re-emitted on the response with
/// the standard max-age, whatever its name. Cookies that an inner layer
/// already wrote on the response (a new currency, a logout expiry) are left
/// alone so that the handler's decision is the only `Set-Cookie` for them.
#[derive(Clone)]
pub struct CookieRenewal {
    policy: Rc<CookiePolicy>,
}

impl CookieRenewal {
    #[must_use]
    pub fn new(policy: CookiePolicy) -> Self {
        Self {
            policy: Rc::new(policy),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CookieRenewal
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = CookieRenewalMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CookieRenewalMiddleware {
            service,
            policy: Rc::clone(&self.policy),
        }))
    }
}

pub struct CookieRenewalMiddleware<S> {
    service: S,
    policy: Rc<CookiePolicy>,
}

impl<S, B> Service<ServiceRequest> for CookieRenewalMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Unreadable cookies are the session layer's problem; nothing to renew here.
        let observed = request_cookies(req.request()).unwrap_or_else(|e| {
            debug!("Skipping cookie renewal, request cookies unreadable: {e}");
            Vec::new()
        });
        let policy = Rc::clone(&self.policy);
        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            renew_observed(res.response_mut(), &observed, &policy);
            Ok(res)
        })
    }
}

fn renew_observed<B>(res: &mut HttpResponse<B>, observed: &[Cookie<'static>], policy: &CookiePolicy) {
    if observed.is_empty() {
        return;
    }

    let already_set = response_cookie_names(res);
    for cookie in observed.iter().filter(|c| !already_set.contains(c.name())) {
        set_response_cookie(res, &policy.renew(cookie));
    }
}
