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

//! PostgreSQL driver built on `tokio-postgres`.

use crate::configs::{DBPROBE_CONNECT_TIMEOUT, DBPROBE_DATABASE_URL_ENV};
use crate::database::*;
use crate::error::{ProbeError, Result};
use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_postgres::config::{Config, Host};
use tokio_postgres::Client;
use tokio_postgres_rustls::MakeRustlsConnect;

/// The port libpq assumes when the connection string names none.
const DEFAULT_PORT: u16 = 5432;

/// Opens sessions with a PostgreSQL server over TCP or a Unix socket. TLS is
/// negotiated according to the `sslmode` of the connection string: `require`
/// insists on it, `prefer` falls back to plain TCP when the server declines.
#[derive(Debug, Clone)]
pub struct PgConnector {
    /// Applied when the connection string carries no `connect_timeout`.
    connect_timeout: Duration,
}

impl PgConnector {
    /// Creates a connector with the given default connect timeout.
    pub fn new(connect_timeout: Duration) -> Self {
        PgConnector { connect_timeout }
    }
}

impl Default for PgConnector {
    fn default() -> Self {
        PgConnector::new(*DBPROBE_CONNECT_TIMEOUT)
    }
}

#[async_trait]
impl Connector for PgConnector {
    async fn connect(&self, url: Option<&str>) -> Result<Box<dyn Connection>> {
        let url = url.ok_or_else(|| ProbeError::MissingUrl(DBPROBE_DATABASE_URL_ENV.to_string()))?;
        let mut config = url
            .parse::<Config>()
            .map_err(|e| ProbeError::InvalidUrl(e.to_string()))?;
        if config.get_connect_timeout().is_none() {
            config.connect_timeout(self.connect_timeout);
        }

        let dsn = dsn(&config);
        debug!("Connecting to {}", dsn);
        let (client, connection) = config
            .connect(tls_connector()?)
            .await
            .map_err(|e| ProbeError::Connection(e.to_string()))?;

        Ok(Box::new(PgConnection {
            client,
            driver: tokio::spawn(connection),
            dsn,
            params: parameters(&config),
        }))
    }
}

/// Builds the TLS connector, trusting the platform's root certificates.
fn tls_connector() -> Result<MakeRustlsConnect> {
    let mut roots = rustls::RootCertStore::empty();
    match rustls_native_certs::load_native_certs() {
        Ok(certs) => {
            let (added, ignored) = roots.add_parsable_certificates(certs);
            debug!("Loaded {} platform certificates ({} ignored)", added, ignored);
        }
        Err(e) => warn!("Could not load platform certificates: {}", e),
    }

    let config = rustls::ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .map_err(|e| ProbeError::Internal(format!("invalid TLS configuration: {}", e)))?
    .with_root_certificates(roots)
    .with_no_client_auth();

    Ok(MakeRustlsConnect::new(config))
}

/// An open session. The connection future runs on its own task until the
/// client is dropped.
pub struct PgConnection {
    client: Client,
    driver: JoinHandle<std::result::Result<(), tokio_postgres::Error>>,
    dsn:    String,
    params: ConnectionParams,
}

impl PgConnection {
    fn ensure_open(&self) -> Result<()> {
        if self.client.is_closed() {
            return Err(ProbeError::Driver("connection already closed".to_owned()));
        }
        Ok(())
    }
}

impl Introspect for PgConnection {
    fn repr(&self) -> String {
        format!(
            "<connection object at {:p}; dsn: '{}', closed: {}>",
            self,
            self.dsn,
            self.client.is_closed() as u8
        )
    }

    fn type_name(&self) -> &'static str {
        short_type_name::<Self>()
    }
}

#[async_trait]
impl Connection for PgConnection {
    fn cursor(&self) -> Result<Box<dyn Cursor + '_>> {
        self.ensure_open()?;
        Ok(Box::new(PgCursor { connection: self }))
    }

    fn parameters(&self) -> Result<ConnectionParams> {
        self.ensure_open()?;
        Ok(self.params.clone())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let PgConnection { client, driver, .. } = *self;
        // Dropping the last client makes the connection send `Terminate` and
        // resolve.
        drop(client);
        driver.await??;
        debug!("Connection closed");
        Ok(())
    }
}

/// A cursor borrowing a [`PgConnection`]. It never declares a portal on the
/// server.
pub struct PgCursor<'a> {
    connection: &'a PgConnection,
}

impl Introspect for PgCursor<'_> {
    fn repr(&self) -> String {
        format!(
            "<cursor object at {:p}; closed: {}>",
            self,
            self.connection.client.is_closed() as u8
        )
    }

    fn type_name(&self) -> &'static str {
        short_type_name::<Self>()
    }
}

impl Cursor for PgCursor<'_> {
    fn close(self: Box<Self>) {
        debug!("Cursor released");
    }
}

/// Resolves the parameters of a parsed connection string the way libpq
/// reports them, filling in the defaults the driver applies. The driver does
/// not tell which of several hosts it reached, so all of them are listed.
fn parameters(config: &Config) -> ConnectionParams {
    let mut params = ConnectionParams::new();
    let user = config.get_user().unwrap_or_default();
    params.insert("user".to_owned(), user.to_owned());
    params.insert(
        "dbname".to_owned(),
        config.get_dbname().unwrap_or(user).to_owned(),
    );
    params.insert("host".to_owned(), hosts(config));
    params.insert("port".to_owned(), ports(config));
    if let Some(options) = config.get_options() {
        params.insert("options".to_owned(), options.to_owned());
    }
    if let Some(name) = config.get_application_name() {
        params.insert("application_name".to_owned(), name.to_owned());
    }
    if let Some(timeout) = config.get_connect_timeout() {
        params.insert("connect_timeout".to_owned(), timeout.as_secs().to_string());
    }
    params.insert(
        "sslmode".to_owned(),
        format!("{:?}", config.get_ssl_mode()).to_lowercase(),
    );
    params
}

fn hosts(config: &Config) -> String {
    if config.get_hosts().is_empty() {
        return "localhost".to_owned();
    }
    config
        .get_hosts()
        .iter()
        .map(|host| match host {
            Host::Tcp(name) => name.clone(),
            #[cfg(unix)]
            Host::Unix(path) => path.display().to_string(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn ports(config: &Config) -> String {
    if config.get_ports().is_empty() {
        return DEFAULT_PORT.to_string();
    }
    config
        .get_ports()
        .iter()
        .map(|port| port.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// The connection string in key/value form with the password masked.
fn dsn(config: &Config) -> String {
    let params = parameters(config);
    let mut parts = vec![];
    for key in [
        "user",
        "dbname",
        "host",
        "port",
        "options",
        "application_name",
        "connect_timeout",
        "sslmode",
    ] {
        if let Some(value) = params.get(key) {
            parts.push(format!("{}={}", key, value));
        }
        if key == "user" && config.get_password().is_some() {
            parts.push("password=xxx".to_owned());
        }
    }
    parts.join(" ")
}
