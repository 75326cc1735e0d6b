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

//! This module provides the default configurations for dbprobe.

mod dbprobe;
pub use self::dbprobe::DBPROBE_CONF;
use lazy_static::lazy_static;
use std::time::Duration;

lazy_static! {
    /// CORS: origins allowed to read the responses.
    pub static ref DBPROBE_CORS_ALLOW_ORIGIN: String = DBPROBE_CONF["cors"]["allow_origin"].to_string();
    /// CORS: methods announced in the preflight response.
    pub static ref DBPROBE_CORS_ALLOW_METHODS: String = DBPROBE_CONF["cors"]["allow_methods"].to_string();
    /// CORS: request headers announced in the preflight response.
    pub static ref DBPROBE_CORS_ALLOW_HEADERS: String = DBPROBE_CONF["cors"]["allow_headers"].to_string();
    /// CORS: how long (in seconds) a preflight response may be cached.
    pub static ref DBPROBE_CORS_MAX_AGE: String = DBPROBE_CONF["cors"]["max_age"].to_string();

    /// Name of the environment variable carrying the connection string.
    pub static ref DBPROBE_DATABASE_URL_ENV: String = DBPROBE_CONF["database"]["url_env"].to_string();
    /// Reported in place of the connection string when it is unset.
    pub static ref DBPROBE_UNSET_PLACEHOLDER: String = DBPROBE_CONF["database"]["unset_placeholder"].to_string();
    /// Connect timeout used when the connection string has none.
    pub static ref DBPROBE_CONNECT_TIMEOUT: Duration = Duration::from_secs(DBPROBE_CONF["database"]["connect_timeout"].parse::<u64>().unwrap());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_settings() {
        assert_eq!("86400", DBPROBE_CORS_MAX_AGE.as_str());
        assert_eq!("DATABASE_URL", DBPROBE_DATABASE_URL_ENV.as_str());
        assert_eq!(Duration::from_secs(10), *DBPROBE_CONNECT_TIMEOUT);
    }
}
