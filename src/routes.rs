mod guards;
mod responses;

use std::pin::Pin;
use rocket::data::{ByteUnit, DataStream};
use async_trait::async_trait;
use rocket::http::{Method, Status};
use rocket::response::Redirect;
use rocket::route::{self, Handler, Route};
use rocket::{catch, catchers, delete, get, post, put, routes, uri};
use rocket::{Build, Data, Request, Rocket, State};
use crate::pipeline::{Jot, JotError, ReadOutcome, ReadRequest, WriteRequest};
use crate::usage::render_usage;

pub use guards::{Preconditions, PublicHost, PublicHostConfig};
pub use responses::{CreatedResponse, ETAG_HEADER, JOT_PASSWORD_HEADER};

#[get("/")]
fn usage(host: PublicHost) -> String {
    render_usage(host.as_str())
}

#[post("/", data = "<body>")]
async fn create_note(
    jot: &State<Jot>,
    host: PublicHost,
    body: Data<'_>,
) -> Result<CreatedResponse, JotError> {
    let mut body = open_body(body);
    let created = jot.create(&mut body).await?;
    Ok(CreatedResponse::new(&host, created))
}

#[get("/<key>")]
async fn read_note(
    jot: &State<Jot>,
    key: &str,
    preconditions: Preconditions<'_>,
) -> Result<ReadOutcome, JotError> {
    jot.read(
        ReadRequest {
            key,
            if_none_match: preconditions.if_none_match,
        }
    ).await
}

#[put("/<key>?<password>", data = "<body>")]
async fn update_note(
    jot: &State<Jot>,
    key: &str,
    password: Option<&str>,
    preconditions: Preconditions<'_>,
    body: Data<'_>,
) -> Result<Redirect, JotError> {
    let mut body = open_body(body);
    jot.update(
        WriteRequest {
            key,
            password: password.unwrap_or_default(),
            if_match: preconditions.if_match,
        },
        &mut body,
    ).await?;
    Ok(Redirect::to(uri!(read_note(key))))
}

#[delete("/<key>?<password>")]
async fn delete_note(
    jot: &State<Jot>,
    key: &str,
    password: Option<&str>,
    preconditions: Preconditions<'_>,
) -> Result<Status, JotError> {
    jot.delete(
        WriteRequest {
            key,
            password: password.unwrap_or_default(),
            if_match: preconditions.if_match,
        }
    ).await?;
    Ok(Status::NoContent)
}

/// Answers every method/path pair the api has no operation for.
#[derive(Clone)]
struct NotImplementedHandler;

#[async_trait]
impl Handler for NotImplementedHandler {
    async fn handle<'r>(&self, request: &'r Request<'_>, _: Data<'r>) -> route::Outcome<'r> {
        route::Outcome::from(request, JotError::NotImplemented)
    }
}

const UNSUPPORTED_ROUTES: &[(Method, &str)] = &[
    (Method::Post, "/<key>"),
    (Method::Put, "/"),
    (Method::Delete, "/"),
    (Method::Head, "/"),
    (Method::Head, "/<key>"),
    (Method::Patch, "/"),
    (Method::Patch, "/<key>"),
    (Method::Options, "/"),
    (Method::Options, "/<key>"),
    (Method::Trace, "/"),
    (Method::Trace, "/<key>"),
    (Method::Connect, "/"),
    (Method::Connect, "/<key>"),
];

fn unsupported_routes() -> Vec<Route> {
    UNSUPPORTED_ROUTES
        .iter()
        .map(|&(method, path)| Route::new(method, path, NotImplementedHandler))
        .collect()
}

#[catch(default)]
fn plain_catcher(status: Status, _: &Request<'_>) -> String {
    status.reason_lossy().to_lowercase()
}

// size limits are enforced by the backend
fn open_body(body: Data<'_>) -> Pin<Box<DataStream<'_>>> {
    Box::pin(body.open(ByteUnit::max_value()))
}

pub trait JotRocketBuildExt {
    fn install_jot(self, jot: Jot, public_host: Option<String>) -> Self;
}

impl JotRocketBuildExt for Rocket<Build> {
    fn install_jot(self, jot: Jot, public_host: Option<String>) -> Self {
        self
            .manage(jot)
            .manage(PublicHostConfig(public_host))
            .mount(
                "/",
                routes![
                    usage,
                    create_note,
                    read_note,
                    update_note,
                    delete_note,
                ]
            )
            .mount("/", unsupported_routes())
            .register("/", catchers![plain_catcher])
    }
}
