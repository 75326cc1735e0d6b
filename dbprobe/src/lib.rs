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

#![warn(missing_docs, clippy::needless_borrow)]

//! `dbprobe` debugs a PostgreSQL connection from a serverless function: it
//! opens a connection from the connection string in the environment,
//! introspects it, and reports the result as an HTTP-like JSON response.

pub mod configs;
pub mod database;
pub mod env;
pub mod error;
pub mod event;
pub mod handler;
pub mod postgres;
pub mod prelude;
#[cfg(test)]
pub mod test_util;
