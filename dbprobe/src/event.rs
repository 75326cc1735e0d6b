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

//! The HTTP-like events exchanged with the API gateway in front of the
//! function.

use crate::configs::*;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// An API gateway proxy request. Only the fields the function looks at are
/// modelled; everything else in the event is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// The HTTP method. Treated as `GET` when absent.
    #[serde(default)]
    pub http_method:             Option<String>,
    /// The query string parameters. The gateway sends `null` when the URL
    /// has no query string; a single parameter may be `null` as well.
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, Option<String>>>,
}

impl Request {
    /// Creates a request with the given method and no query string.
    pub fn new(method: &str) -> Self {
        Request {
            http_method:             Some(method.to_owned()),
            query_string_parameters: None,
        }
    }

    /// Adds a query string parameter.
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query_string_parameters
            .get_or_insert_with(HashMap::new)
            .insert(key.to_owned(), Some(value.to_owned()));
        self
    }

    /// Returns the HTTP method of the request.
    pub fn method(&self) -> &str {
        self.http_method.as_deref().unwrap_or("GET")
    }

    /// Returns the value of a query string parameter. A `null` value reads
    /// as absent.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|params| params.get(key))
            .and_then(|value| value.as_deref())
    }
}

/// An API gateway proxy response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// The HTTP status code.
    pub status_code:       u16,
    /// The response headers.
    pub headers:           HashMap<String, String>,
    /// The response body, a JSON document or empty.
    pub body:              String,
    /// Always false: bodies are UTF-8 text.
    pub is_base64_encoded: bool,
}

impl Response {
    /// The response to a CORS preflight request.
    pub fn preflight() -> Self {
        let headers = vec![
            ("Access-Control-Allow-Origin", DBPROBE_CORS_ALLOW_ORIGIN.as_str()),
            ("Access-Control-Allow-Methods", DBPROBE_CORS_ALLOW_METHODS.as_str()),
            ("Access-Control-Allow-Headers", DBPROBE_CORS_ALLOW_HEADERS.as_str()),
            ("Access-Control-Max-Age", DBPROBE_CORS_MAX_AGE.as_str()),
        ];
        Response {
            status_code:       200,
            headers:           to_headers(headers),
            body:              String::new(),
            is_base64_encoded: false,
        }
    }

    /// A response carrying a JSON body.
    pub fn json(status_code: u16, body: &Value) -> Self {
        let headers = vec![
            ("Content-Type", "application/json"),
            ("Access-Control-Allow-Origin", DBPROBE_CORS_ALLOW_ORIGIN.as_str()),
        ];
        Response {
            status_code,
            headers: to_headers(headers),
            body: body.to_string(),
            is_base64_encoded: false,
        }
    }

    /// Parses the body back into a JSON value.
    pub fn body_json(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

fn to_headers(pairs: Vec<(&str, &str)>) -> HashMap<String, String> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect()
}
