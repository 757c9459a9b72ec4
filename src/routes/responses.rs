use log::{debug, error};
use rocket::http::{ContentType, Header, Status};
use rocket::response::{self, Responder, Response};
use rocket::Request;
use crate::pipeline::{CreatedNote, JotError, ReadOutcome};
use crate::routes::guards::PublicHost;

pub const JOT_PASSWORD_HEADER: &str = "Jot-Password";
pub const ETAG_HEADER: &str = "ETag";

pub struct JotPassword(String);

impl From<JotPassword> for Header<'static> {
    fn from(value: JotPassword) -> Self {
        Header::new(JOT_PASSWORD_HEADER, value.0)
    }
}

#[derive(Responder)]
#[response(status = 201)]
pub struct CreatedResponse {
    link: String,
    password: JotPassword,
}

impl CreatedResponse {
    pub fn new(host: &PublicHost, created: CreatedNote) -> Self {
        CreatedResponse {
            link: format!("{}/{}", host.as_str(), created.key),
            password: JotPassword(created.password),
        }
    }
}

impl<'r> Responder<'r, 'static> for ReadOutcome {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        match self {
            ReadOutcome::NotModified { etag } => Response::build()
                .status(Status::NotModified)
                .raw_header(ETAG_HEADER, etag.into_string())
                .ok(),
            ReadOutcome::Loaded { etag, content } => Response::build()
                .header(ContentType::Text)
                .raw_header(ETAG_HEADER, etag.into_string())
                .streamed_body(content.reader)
                .ok(),
        }
    }
}

impl<'r> Responder<'r, 'static> for JotError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        match &self {
            JotError::Unknown { message, cause } => error!(
                "{} {} failed: {message}: {cause}",
                request.method(),
                request.uri(),
            ),
            e => debug!("{} {} rejected: {e}", request.method(), request.uri()),
        }
        Response::build_from(self.public_message().respond_to(request)?)
            .status(self.status())
            .ok()
    }
}
