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

//! Test doubles for the database seam.

use crate::database::*;
use crate::error::{ProbeError, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// A connector that must never be reached.
pub struct UnreachableConnector;

#[async_trait]
impl Connector for UnreachableConnector {
    async fn connect(&self, _: Option<&str>) -> Result<Box<dyn Connection>> {
        panic!("the database must not be touched");
    }
}

/// Where a [`FakeConnector`] fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Everything succeeds.
    Nowhere,
    /// `Connector::connect` is refused.
    Connect,
    /// `Connection::cursor` fails.
    Cursor,
    /// `Connection::parameters` fails.
    Parameters,
    /// `Connection::close` fails.
    Close,
}

/// A connector handing out in-memory connections and recording every call.
#[derive(Clone)]
pub struct FakeConnector {
    failure:   Failure,
    needs_url: bool,
    calls:     Arc<Mutex<Vec<String>>>,
}

impl FakeConnector {
    /// Creates a connector failing at the given step.
    pub fn new(failure: Failure) -> Self {
        FakeConnector {
            failure,
            needs_url: true,
            calls: Arc::new(Mutex::new(vec![])),
        }
    }

    /// Creates a connector that falls back to driver defaults when no
    /// connection string is given, as libpq does.
    pub fn with_driver_defaults() -> Self {
        FakeConnector {
            needs_url: false,
            ..FakeConnector::new(Failure::Nowhere)
        }
    }

    /// The calls seen so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_owned());
    }
}

#[async_trait]
impl Connector for FakeConnector {
    async fn connect(&self, url: Option<&str>) -> Result<Box<dyn Connection>> {
        self.record(&format!("connect {}", url.unwrap_or("-")));
        match (url, self.failure) {
            (None, _) if self.needs_url => Err(ProbeError::MissingUrl("DATABASE_URL".to_owned())),
            (_, Failure::Connect) => Err(ProbeError::Connection(
                "could not connect to server: Connection refused".to_owned(),
            )),
            _ => Ok(Box::new(FakeConnection {
                connector: self.clone(),
            })),
        }
    }
}

/// An in-memory connection.
pub struct FakeConnection {
    connector: FakeConnector,
}

impl Introspect for FakeConnection {
    fn repr(&self) -> String {
        format!("<connection object at {:p}; closed: 0>", self)
    }

    fn type_name(&self) -> &'static str {
        short_type_name::<Self>()
    }
}

#[async_trait]
impl Connection for FakeConnection {
    fn cursor(&self) -> Result<Box<dyn Cursor + '_>> {
        self.connector.record("cursor");
        if self.connector.failure == Failure::Cursor {
            return Err(ProbeError::Driver("cursor refused".to_owned()));
        }
        Ok(Box::new(FakeCursor { connection: self }))
    }

    fn parameters(&self) -> Result<ConnectionParams> {
        self.connector.record("parameters");
        if self.connector.failure == Failure::Parameters {
            return Err(ProbeError::Driver("parameters unavailable".to_owned()));
        }
        let mut params = ConnectionParams::new();
        params.insert("user".to_owned(), "app".to_owned());
        params.insert("dbname".to_owned(), "orders".to_owned());
        params.insert("host".to_owned(), "db.internal".to_owned());
        params.insert("port".to_owned(), "5432".to_owned());
        Ok(params)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.connector.record("connection.close");
        if self.connector.failure == Failure::Close {
            return Err(ProbeError::Driver("server closed the connection".to_owned()));
        }
        Ok(())
    }
}

/// An in-memory cursor.
pub struct FakeCursor<'a> {
    connection: &'a FakeConnection,
}

impl Introspect for FakeCursor<'_> {
    fn repr(&self) -> String {
        format!("<cursor object at {:p}; closed: 0>", self)
    }

    fn type_name(&self) -> &'static str {
        short_type_name::<Self>()
    }
}

impl Cursor for FakeCursor<'_> {
    fn close(self: Box<Self>) {
        self.connection.connector.record("cursor.close");
    }
}
