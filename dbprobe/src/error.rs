// Copyright (c) 2020-present, UMD Database Group.
//
// This program is free software: you can use, redistribute, and/or modify
// it under the terms of the GNU Affero General Public License, version 3
// or later ("AGPL"), as published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! dbprobe error types

use std::error;
use std::fmt::{Display, Formatter};
use std::result;

/// Result type for operations that could result in an [ProbeError]
pub type Result<T> = result::Result<T, ProbeError>;

/// dbprobe error
#[derive(Debug)]
pub enum ProbeError {
    /// The environment variable carrying the connection string is not set.
    /// Holds the variable name.
    MissingUrl(String),
    /// The connection string was rejected before any connection attempt.
    InvalidUrl(String),
    /// Error returned while establishing a session with the database server,
    /// including refused connections, authentication failures and timeouts.
    Connection(String),
    /// Error returned by the driver on an already established session.
    Driver(String),
    /// Error returned when serde_json failed to serialize or deserialize data.
    SerdeJson(serde_json::Error),
    /// Error returned as a consequence of an error in dbprobe.
    /// This error should not happen in normal usage of dbprobe.
    Internal(String),
}

impl ProbeError {
    /// The error kind reported to callers in the `type` field of a failure
    /// response.
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::MissingUrl(_) | ProbeError::InvalidUrl(_) | ProbeError::Connection(_) => {
                "ConnectionFailure"
            }
            ProbeError::Driver(_) => "DriverError",
            ProbeError::SerdeJson(_) => "SerializationError",
            ProbeError::Internal(_) => "InternalError",
        }
    }
}

impl From<serde_json::Error> for ProbeError {
    fn from(e: serde_json::Error) -> Self {
        ProbeError::SerdeJson(e)
    }
}

impl From<tokio_postgres::Error> for ProbeError {
    fn from(e: tokio_postgres::Error) -> Self {
        ProbeError::Driver(e.to_string())
    }
}

impl From<tokio::task::JoinError> for ProbeError {
    fn from(e: tokio::task::JoinError) -> Self {
        ProbeError::Internal(format!("connection task failed: {}", e))
    }
}

impl From<&str> for ProbeError {
    fn from(e: &str) -> Self {
        ProbeError::Internal(e.to_string())
    }
}

impl Display for ProbeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            ProbeError::MissingUrl(ref name) => {
                write!(f, "Connection error: environment variable {} is not set", name)
            }
            ProbeError::InvalidUrl(ref desc) => write!(f, "Invalid connection string: {}", desc),
            ProbeError::Connection(ref desc) => write!(f, "Connection error: {}", desc),
            ProbeError::Driver(ref desc) => write!(f, "Driver error: {}", desc),
            ProbeError::SerdeJson(ref desc) => write!(f, "serde_json error: {}", desc),
            ProbeError::Internal(ref desc) => write!(
                f,
                "Internal error: {}. This was likely caused by a bug in dbprobe's \
                    code and we would welcome that you file a bug report in our issue tracker",
                desc
            ),
        }
    }
}

impl error::Error for ProbeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_group_connection_errors() {
        let errors = vec![
            ProbeError::MissingUrl("DATABASE_URL".to_owned()),
            ProbeError::InvalidUrl("invalid port".to_owned()),
            ProbeError::Connection("connection refused".to_owned()),
        ];
        for e in errors {
            assert_eq!("ConnectionFailure", e.kind());
        }
        assert_eq!("DriverError", ProbeError::Driver("closed".to_owned()).kind());
        assert_eq!("InternalError", ProbeError::from("oops").kind());
    }

    #[test]
    fn internal_error_asks_for_a_report() {
        let message = ProbeError::Internal("connection task vanished".to_owned()).to_string();
        assert!(message.starts_with("Internal error: connection task vanished."));
        assert!(message.contains("file a bug report"));
    }

    #[test]
    fn missing_url_names_the_variable() {
        let e = ProbeError::MissingUrl("DATABASE_URL".to_owned());
        assert_eq!(
            "Connection error: environment variable DATABASE_URL is not set",
            e.to_string()
        );
    }
}
