use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header, Error, FromRequest, HttpRequest};

/// Who is looking at the page. Token verification belongs to the identity
/// provider and the backend; here a bearer token only marks the viewer as
/// signed in and is forwarded on submission.
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    pub token: Option<String>,
}

impl Viewer {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

fn bearer_from(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

impl FromRequest for Viewer {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(Viewer {
            token: bearer_from(req),
        }))
    }
}
