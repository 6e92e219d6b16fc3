//! The error type shared across all NeoFS crates.
//!
//! `BadRequest`, `NotFound` and `InsufficientNodes` are surfaced to
//! callers with a specific HTTP status; everything else collapses to a
//! 500 and is logged by the caller.

use err_derive::Error;
use hyper::StatusCode;

#[derive(Debug, Error)]
pub enum Error {
	#[error(display = "Bad request: {}", _0)]
	BadRequest(String),

	#[error(display = "Not found: {}", _0)]
	NotFound(String),

	#[error(
		display = "Insufficient nodes: requested replication factor {}, only {} alive",
		requested,
		alive
	)]
	InsufficientNodes { requested: usize, alive: usize },

	#[error(display = "Node unreachable: {}", _0)]
	NodeUnreachable(String),

	#[error(display = "{}", _0)]
	Message(String),

	#[error(display = "IO error: {}", _0)]
	Io(#[error(source)] std::io::Error),

	#[error(display = "JSON error: {}", _0)]
	Json(#[error(source)] serde_json::Error),

	#[error(display = "HTTP error: {}", _0)]
	Http(#[error(source)] http::Error),

	#[error(display = "Hyper error: {}", _0)]
	Hyper(#[error(source)] hyper::Error),

	#[error(display = "HTTP client error: {}", _0)]
	Reqwest(#[error(source)] reqwest::Error),

	#[error(display = "Background task panicked: {}", _0)]
	TaskJoin(#[error(source)] tokio::task::JoinError),
}

impl Error {
	/// Status code to use when this error is the outcome of handling an
	/// incoming coordinator or storage-node request (§6, §7).
	pub fn http_status_code(&self) -> StatusCode {
		match self {
			Error::BadRequest(_) => StatusCode::BAD_REQUEST,
			Error::NotFound(_) => StatusCode::NOT_FOUND,
			Error::InsufficientNodes { .. } => StatusCode::INTERNAL_SERVER_ERROR,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	pub fn message<S: Into<String>>(s: S) -> Self {
		Error::Message(s.into())
	}
}

pub trait OkOrMessage<T> {
	fn ok_or_message<S: Into<String>>(self, s: S) -> Result<T, Error>;
}

impl<T> OkOrMessage<T> for Option<T> {
	fn ok_or_message<S: Into<String>>(self, s: S) -> Result<T, Error> {
		self.ok_or_else(|| Error::Message(s.into()))
	}
}
