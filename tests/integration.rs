//! Integration tests for jsonrpc-binder.
//!
//! These tests drive a whole service through the public API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use jsonrpc_binder::handler::{MethodDescriptor, MethodRegistry, ParamType};
use jsonrpc_binder::protocol::{error_codes, JsonRpcRequest, Params, RequestId};
use jsonrpc_binder::{BinderError, BoxError, Dispatcher};
use serde_json::{json, Value};

/// Key-value store exposed as an RPC service.
#[derive(Default)]
struct KvStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl KvStore {
    fn put(&self, key: String, value: Value) -> Option<Value> {
        self.entries.lock().unwrap().insert(key, value)
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn remove(&self, key: &str) -> Result<Value, BoxError> {
        self.entries
            .lock()
            .unwrap()
            .remove(key)
            .ok_or_else(|| format!("no entry for {}", key).into())
    }
}

fn kv_registry(store: Arc<KvStore>) -> MethodRegistry {
    MethodRegistry::builder()
        .define(
            MethodDescriptor::builder("put")
                .required("key", ParamType::String)
                .required("value", ParamType::Any)
                .returns(ParamType::Any)
                .handler_with(store.clone(), |kv: Arc<KvStore>, (key, value): (String, Value)| async move {
                    Ok::<_, BoxError>(kv.put(key, value))
                }),
        )
        .define(
            MethodDescriptor::builder("get")
                .required("key", ParamType::String)
                .optional("fallback", ParamType::Any, Value::Null)
                .returns(ParamType::Any)
                .handler_with(store.clone(), |kv: Arc<KvStore>, (key, fallback): (String, Value)| async move {
                    Ok::<_, BoxError>(kv.get(&key).unwrap_or(fallback))
                }),
        )
        .define(
            MethodDescriptor::builder("remove")
                .required("key", ParamType::String)
                .returns(ParamType::Any)
                .handler_with(store.clone(), |kv: Arc<KvStore>, (key,): (String,)| async move {
                    kv.remove(&key)
                }),
        )
        .define(
            MethodDescriptor::builder("clear")
                .handler_with(store, |kv: Arc<KvStore>, (): ()| async move {
                    kv.entries.lock().unwrap().clear();
                    Ok::<_, BoxError>(())
                }),
        )
        .build()
        .unwrap()
}

fn kv_dispatcher() -> Dispatcher {
    Dispatcher::builder(kv_registry(Arc::new(KvStore::default())))
        .prefix("kv.")
        .build()
}

async fn roundtrip(dispatcher: &Dispatcher, request: Value) -> Value {
    let output = dispatcher.process(&request.to_string()).await;
    serde_json::from_str(&output).unwrap()
}

/// Unknown method yields -32601 and echoes the request id.
#[tokio::test]
async fn test_unknown_method() {
    let dispatcher = Dispatcher::new(MethodRegistry::builder().build().unwrap());

    let response = roundtrip(
        &dispatcher,
        json!({"jsonrpc": "2.0", "method": "foobar_foobaz", "id": 1}),
    )
    .await;

    assert_eq!(
        response,
        json!({
            "jsonrpc": "2.0",
            "error": {"code": -32601, "message": "Method not found"},
            "id": 1
        })
    );
}

/// Store and read back through both calling conventions.
#[tokio::test]
async fn test_service_positional_and_named() {
    let dispatcher = kv_dispatcher();

    let response = roundtrip(
        &dispatcher,
        json!({"jsonrpc": "2.0", "method": "kv.put", "params": ["color", "blue"], "id": 1}),
    )
    .await;
    assert_eq!(response["result"], Value::Null);

    let response = roundtrip(
        &dispatcher,
        json!({"jsonrpc": "2.0", "method": "kv.get", "params": {"key": "color"}, "id": 2}),
    )
    .await;
    assert_eq!(response["result"], "blue");
    assert_eq!(response["id"], 2);

    let response = roundtrip(
        &dispatcher,
        json!({"jsonrpc": "2.0", "method": "kv.get", "params": ["shape", "circle"], "id": 3}),
    )
    .await;
    assert_eq!(response["result"], "circle");
}

/// Methods without a return type answer with a null result.
#[tokio::test]
async fn test_unit_method() {
    let dispatcher = kv_dispatcher();

    let response = roundtrip(&dispatcher, json!({"jsonrpc": "2.0", "method": "kv.clear", "id": "c"})).await;

    assert_eq!(response, json!({"jsonrpc": "2.0", "result": null, "id": "c"}));
}

/// Binding errors are reported as -32602 with a message naming the problem.
#[tokio::test]
async fn test_invalid_params() {
    let dispatcher = kv_dispatcher();

    let cases = [
        (json!([]), "expected at least 1 arguments, got 0"),
        (json!(["k", 1, 2]), "expected at most 2 arguments, got 3"),
        (json!([7]), "parameter key must be a string, got integer"),
        (json!([null]), "parameter key must be a string, which does not accept null"),
        (json!({"fallback": 1}), "parameter key is required and not specified"),
    ];

    for (params, message) in cases {
        let response = roundtrip(
            &dispatcher,
            json!({"jsonrpc": "2.0", "method": "kv.get", "params": params, "id": 1}),
        )
        .await;

        assert_eq!(response["error"]["code"], error_codes::INVALID_PARAMS);
        assert_eq!(response["error"]["message"], message);
    }
}

/// Method body failures are internal errors, distinct from bad params.
#[tokio::test]
async fn test_invocation_failure() {
    let dispatcher = kv_dispatcher();

    let response = roundtrip(
        &dispatcher,
        json!({"jsonrpc": "2.0", "method": "kv.remove", "params": ["missing"], "id": 5}),
    )
    .await;

    assert_eq!(response["error"]["code"], error_codes::INTERNAL_ERROR);
    assert_eq!(response["error"]["message"], "Internal error");
    assert!(response["error"].get("data").is_none());
    assert_eq!(response["id"], 5);
}

/// Same arguments through either convention bind to the same sequence.
#[test]
fn test_positional_named_equivalence() {
    let registry = kv_registry(Arc::new(KvStore::default()));
    let get = registry.lookup("get").unwrap();

    let positional = get.bind(Some(Params::Positional(vec![json!("k")]))).unwrap();
    let named = get
        .bind(Some(Params::Named(
            json!({"key": "k"}).as_object().unwrap().clone(),
        )))
        .unwrap();
    assert_eq!(positional, named);

    let positional = get
        .bind(Some(Params::Positional(vec![json!("k"), json!(0)])))
        .unwrap();
    let named = get
        .bind(Some(Params::Named(
            json!({"fallback": 0, "key": "k"}).as_object().unwrap().clone(),
        )))
        .unwrap();
    assert_eq!(positional, named);
}

/// Every registered method keeps optional parameters in a trailing suffix.
#[test]
fn test_required_count_invariant() {
    let registry = kv_registry(Arc::new(KvStore::default()));

    for method in registry.iter() {
        assert!(method.required_count() <= method.parameter_count());
        assert!(method
            .parameters()
            .skip(method.required_count())
            .all(|p| p.is_optional()));
        assert!(method
            .parameters()
            .take(method.required_count())
            .all(|p| !p.is_optional()));
    }
}

/// Misconfigured services fail when the registry is built.
#[test]
fn test_registration_failures() {
    let duplicate = MethodRegistry::builder()
        .define(
            MethodDescriptor::builder("x").handler_sync(|(): ()| Ok::<_, BoxError>(())),
        )
        .define(
            MethodDescriptor::builder("x").handler_sync(|(): ()| Ok::<_, BoxError>(())),
        )
        .build();
    assert!(matches!(duplicate, Err(BinderError::Registration(_))));

    let misordered = MethodRegistry::builder()
        .define(
            MethodDescriptor::builder("y")
                .optional("a", ParamType::Integer, json!(0))
                .required("b", ParamType::Integer)
                .handler_sync(|_: Vec<Value>| Ok::<_, BoxError>(())),
        )
        .build();
    assert!(matches!(misordered, Err(BinderError::Registration(_))));
}

/// Concurrent requests share one dispatcher without locking the registry.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_dispatch() {
    let dispatcher = Arc::new(kv_dispatcher());

    let mut tasks = Vec::new();
    for i in 0..64i64 {
        let dispatcher = dispatcher.clone();
        tasks.push(tokio::spawn(async move {
            let key = format!("key-{}", i);
            let put = JsonRpcRequest::new(
                "kv.put",
                Some(Params::Positional(vec![json!(key), json!(i)])),
                RequestId::from(i),
            );
            let response = dispatcher.dispatch(put).await;
            assert!(!response.is_error());

            let get = JsonRpcRequest::new(
                "kv.get",
                Some(Params::Positional(vec![json!(key)])),
                RequestId::from(1000 + i),
            );
            let response = dispatcher.dispatch(get).await;
            assert_eq!(response.id, RequestId::from(1000 + i));
            response.result
        }));
    }

    for (i, task) in tasks.into_iter().enumerate() {
        assert_eq!(task.await.unwrap(), Some(json!(i)));
    }
}

/// Introspection reflects declared signatures.
#[test]
fn test_schema() {
    let registry = kv_registry(Arc::new(KvStore::default()));
    let schema = serde_json::to_value(registry.schema()).unwrap();

    assert_eq!(
        schema["methods"]["get"],
        json!({
            "params": [
                {"name": "key", "type": "string", "optional": false},
                {"name": "fallback", "type": "any", "optional": true, "default": null}
            ],
            "returns": "any"
        })
    );
    assert_eq!(schema["methods"]["clear"]["returns"], Value::Null);
    assert_eq!(registry.lookup("get").unwrap().to_string(), "any get(string key, any fallback = null)");
}
