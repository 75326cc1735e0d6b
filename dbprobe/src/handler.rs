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

//! The request handler: CORS preflight, path dispatch and the three
//! introspection endpoints.

use crate::configs::{DBPROBE_DATABASE_URL_ENV, DBPROBE_UNSET_PLACEHOLDER};
use crate::database::{Connection, Connector};
use crate::env::Environment;
use crate::error::Result;
use crate::event::{Request, Response};
use log::{error, info};
use serde_json::{json, Value};

/// The values accepted by the `path` query parameter.
pub const AVAILABLE_PATHS: [&str; 3] = ["conn", "cursor", "info"];

/// Debugs the database connection configured in the environment.
///
/// Every call opens its own connection and closes it before returning,
/// whether the introspection succeeded or not.
pub struct DebugHandler<C, E> {
    connector: C,
    env:       E,
}

impl<C: Connector, E: Environment> DebugHandler<C, E> {
    /// Creates a handler connecting through `connector` with the connection
    /// string found in `env`.
    pub fn new(connector: C, env: E) -> Self {
        DebugHandler { connector, env }
    }

    /// Handles a request. Failures are reported in the response; this never
    /// fails.
    pub async fn handle(&self, request: &Request) -> Response {
        if request.method() == "OPTIONS" {
            return Response::preflight();
        }

        let path = request.query("path").unwrap_or_default();
        match self.dispatch(path).await {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to serve path {:?}: {}", path, e);
                Response::json(500, &json!({ "error": e.to_string(), "type": e.kind() }))
            }
        }
    }

    async fn dispatch(&self, path: &str) -> Result<Response> {
        let body = match path {
            "conn" => self.conn().await?,
            "cursor" => self.cursor().await?,
            "info" => self.info().await?,
            _ => {
                info!("Rejecting unknown path {:?}", path);
                return Ok(Response::json(
                    400,
                    &json!({ "error": "Invalid path", "available_paths": AVAILABLE_PATHS }),
                ));
            }
        };
        Ok(Response::json(200, &body))
    }

    /// Describes the connection object itself.
    async fn conn(&self) -> Result<Value> {
        let (result, type_name) = self
            .with_connection(|conn| Ok((conn.repr(), conn.type_name())))
            .await?;
        Ok(json!({ "endpoint": "/conn", "result": result, "type": type_name }))
    }

    /// Describes a cursor derived from the connection.
    async fn cursor(&self) -> Result<Value> {
        let (result, type_name) = self
            .with_connection(|conn| {
                let cursor = conn.cursor()?;
                let described = (cursor.repr(), cursor.type_name());
                cursor.close();
                Ok(described)
            })
            .await?;
        Ok(json!({ "endpoint": "/cursor", "result": result, "type": type_name }))
    }

    /// Reports the raw connection string, the environment variable names and
    /// the parameters the driver resolved.
    async fn info(&self) -> Result<Value> {
        let db_url = self
            .env
            .var(&DBPROBE_DATABASE_URL_ENV)
            .unwrap_or_else(|| DBPROBE_UNSET_PLACEHOLDER.to_string());
        let env_keys = self.env.keys();
        let connection_params = self.with_connection(|conn| conn.parameters()).await?;
        Ok(json!({
            "endpoint": "/info",
            "db_url": db_url,
            "env_keys": env_keys,
            "connection_params": connection_params,
        }))
    }

    /// Opens a connection, runs `introspect` on it and closes it again. The
    /// connection is closed even if `introspect` fails; its error wins over
    /// a close error.
    async fn with_connection<T, F>(&self, introspect: F) -> Result<T>
    where
        T: Send,
        F: FnOnce(&dyn Connection) -> Result<T> + Send,
    {
        let url = self.env.var(&DBPROBE_DATABASE_URL_ENV);
        let connection = self.connector.connect(url.as_deref()).await?;
        let outcome = introspect(connection.as_ref());
        let closed = connection.close().await;
        let value = outcome?;
        closed?;
        Ok(value)
    }
}
