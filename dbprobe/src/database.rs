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

//! The seam between the request handler and a database driver.
//!
//! A [`Connector`] opens a [`Connection`] from a connection string; a
//! connection hands out [`Cursor`]s borrowing it. Both are only introspected:
//! nothing is ever executed through them. Connections are never pooled and
//! must be closed explicitly with [`Connection::close`].

use crate::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Driver-resolved parameters of an open connection, keyed by their libpq
/// names (`user`, `dbname`, `host`, `port`, ...). Never contains the password.
///
/// Unlike libpq, which reports the host a session actually reached, a
/// connection string naming several hosts yields all of them, joined by
/// commas, in `host` and `port`.
pub type ConnectionParams = BTreeMap<String, String>;

/// Human-readable description of a driver object.
pub trait Introspect {
    /// A representation of the object in the classic
    /// `<kind object at 0x...; ...>` form. The content is implementation
    /// defined and may contain addresses.
    fn repr(&self) -> String;

    /// The declared name of the object's type, without its module path.
    fn type_name(&self) -> &'static str;
}

/// A handle derived from a connection.
pub trait Cursor: Introspect + Send {
    /// Releases the cursor.
    fn close(self: Box<Self>);
}

/// An open database session.
#[async_trait]
pub trait Connection: Introspect + Send + Sync {
    /// Derives a cursor from the connection.
    fn cursor(&self) -> Result<Box<dyn Cursor + '_>>;

    /// Returns the connection parameters as resolved by the driver.
    fn parameters(&self) -> Result<ConnectionParams>;

    /// Terminates the session.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Opens connections.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connects with the given connection string. `None` means the
    /// connection string is not configured.
    async fn connect(&self, url: Option<&str>) -> Result<Box<dyn Connection>>;
}

/// Returns the name of `T` without its module path or generic arguments.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let name = std::any::type_name::<T>();
    let name = name.split('<').next().unwrap_or(name);
    name.rsplit("::").next().unwrap_or(name)
}
