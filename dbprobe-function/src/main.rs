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

//! The main entry point for the database debugging lambda function.

use dbprobe::prelude::*;
use lambda_runtime::{service_fn, LambdaEvent};
use log::info;

#[cfg(feature = "snmalloc")]
#[global_allocator]
static ALLOC: snmalloc_rs::SnMalloc = snmalloc_rs::SnMalloc;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static ALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

type Error = lambda_runtime::Error;

async fn handler(event: LambdaEvent<Request>) -> std::result::Result<Response, Error> {
    let request = event.payload;
    info!(
        "Request {}: {} path={:?}",
        event.context.request_id,
        request.method(),
        request.query("path")
    );

    // The connection string is looked up on every invocation.
    let handler = DebugHandler::new(PgConnector::default(), ProcessEnvironment);
    let response = handler.handle(&request).await;

    info!("Request {}: status {}", event.context.request_id, response.status_code);
    Ok(response)
}

#[tokio::main]
async fn main() -> std::result::Result<(), Error> {
    env_logger::init();
    lambda_runtime::run(service_fn(handler)).await?;
    Ok(())
}
