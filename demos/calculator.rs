//! Calculator service - line-delimited JSON-RPC over stdio.
//!
//! This example demonstrates:
//! - Exposing methods of a service struct through a registry
//! - Positional and named arguments with defaults
//! - Feeding raw request text to the dispatcher
//!
//! # Running
//!
//! ```sh
//! echo '{"jsonrpc":"2.0","method":"calc.add","params":[5],"id":1}' \
//!     | cargo run --example calculator
//! # {"jsonrpc":"2.0","result":15,"id":1}
//! ```

use std::sync::Arc;

use jsonrpc_binder::handler::{MethodDescriptor, MethodRegistry, ParamType};
use jsonrpc_binder::{BinderError, BoxError, Dispatcher};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// The service being exposed.
struct Calculator {
    precision: u32,
}

impl Calculator {
    fn divide(&self, a: f64, b: f64) -> Result<f64, BoxError> {
        if b == 0.0 {
            return Err("division by zero".into());
        }
        let factor = 10f64.powi(self.precision as i32);
        Ok((a / b * factor).round() / factor)
    }
}

fn build_registry(calc: Arc<Calculator>) -> Result<MethodRegistry, BinderError> {
    MethodRegistry::builder()
        .define(
            MethodDescriptor::builder("add")
                .required("a", ParamType::Integer)
                .optional("b", ParamType::Integer, json!(10))
                .returns(ParamType::Integer)
                .handler_sync(|(a, b): (i64, i64)| {
                    a.checked_add(b).ok_or_else(|| BoxError::from("integer overflow"))
                }),
        )
        .define(
            MethodDescriptor::builder("divide")
                .required("a", ParamType::Number)
                .required("b", ParamType::Number)
                .returns(ParamType::Number)
                .handler_with(calc, |calc: Arc<Calculator>, (a, b): (f64, f64)| async move {
                    calc.divide(a, b)
                }),
        )
        .define(
            MethodDescriptor::builder("sum")
                .required("values", ParamType::array(ParamType::Number))
                .returns(ParamType::Number)
                .handler_sync(|(values,): (Vec<f64>,)| Ok::<_, BoxError>(values.iter().sum::<f64>())),
        )
        .build()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = build_registry(Arc::new(Calculator { precision: 4 }))?;

    for method in registry.iter() {
        eprintln!("registered: {}", method);
    }

    let dispatcher = Dispatcher::builder(registry)
        .prefix("calc.")
        .expose_internal_errors(true)
        .build();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = dispatcher.process(&line).await;
        stdout.write_all(response.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    Ok(())
}
