//! Raw request command implementation.

use anyhow::{Context as _, Result};
use clap::Args;

use studio_http::{ApiRequest, Method};

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE)
    pub method: String,

    /// Path relative to the API URL, e.g. /api/admin/photos
    pub path: String,

    /// JSON request body
    #[arg(long)]
    pub body: Option<String>,

    /// Query parameter as key=value (repeatable)
    #[arg(long = "query", value_name = "KEY=VALUE")]
    pub query: Vec<String>,
}

pub async fn run(args: RequestArgs, ctx: &Context) -> Result<()> {
    let method = Method::from_bytes(args.method.to_ascii_uppercase().as_bytes())
        .context("Invalid HTTP method")?;
    let mut request = ApiRequest::new(method, args.path);

    for pair in &args.query {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("Query parameter '{}' is not key=value", pair))?;
        request = request.query(key, value);
    }
    if let Some(body) = &args.body {
        let body: serde_json::Value =
            serde_json::from_str(body).context("Request body is not valid JSON")?;
        request = request.json(body);
    }

    let response = ctx.client.send(request).await.context("Request failed")?;

    output::field("Status", &response.status().to_string());
    match response.json_value() {
        Ok(serde_json::Value::Null) => {}
        Ok(value) => output::json_pretty(&value)?,
        Err(_) => println!("{}", response.text()),
    }
    Ok(())
}
