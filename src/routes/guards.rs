use std::convert::Infallible;
use async_trait::async_trait;
use log::debug;
use rocket::http::Status;
use rocket::outcome::try_outcome;
use rocket::request::{FromRequest, Outcome};
use rocket::{Request, State};

/// Optional `If-Match` and `If-None-Match` values of a request.
#[derive(Debug)]
pub struct Preconditions<'r> {
    pub if_match: Option<&'r str>,
    pub if_none_match: Option<&'r str>,
}

#[async_trait]
impl<'r> FromRequest<'r> for Preconditions<'r> {
    type Error = Infallible;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let headers = request.headers();
        Outcome::Success(
            Preconditions {
                if_match: headers.get_one("If-Match"),
                if_none_match: headers.get_one("If-None-Match"),
            }
        )
    }
}

/// Configured origin for the links handed out to clients.
#[derive(Clone, Debug, Default)]
pub struct PublicHostConfig(pub Option<String>);

/// Origin without a trailing slash, e.g. `https://jot.example`.
#[derive(Debug)]
pub struct PublicHost(String);

impl PublicHost {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl<'r> FromRequest<'r> for PublicHost {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let config = try_outcome!(request.guard::<&State<PublicHostConfig>>().await);
        if let Some(ref host) = config.0 {
            return Outcome::Success(PublicHost(host.trim_end_matches('/').to_owned()));
        }
        match request.host() {
            Some(host) => Outcome::Success(PublicHost(format!("http://{host}"))),
            None => {
                debug!("no public host configured and no Host header in the request");
                Outcome::Error((Status::BadRequest, ()))
            },
        }
    }
}
