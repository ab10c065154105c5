use actix_web::cookie::Cookie;
use actix_web::http::header;
use actix_web::HttpResponse;

pub struct ResponseBuilder;

impl ResponseBuilder {
    /// Create a `302 Found` redirect response carrying the given cookies
    #[must_use]
    pub fn redirect(location: &str, cookies: Vec<Cookie<'_>>) -> HttpResponse {
        let mut builder = HttpResponse::Found();

        for cookie in cookies {
            builder.cookie(cookie);
        }

        builder
            .insert_header((header::LOCATION, location))
            .finish()
    }
}
