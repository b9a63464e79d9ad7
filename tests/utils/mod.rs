#![allow(dead_code)]

use {
    bytes::*,
    http::{header::*, *},
    http_body_util::*,
    std::{
        collections::*,
        pin::*,
        result::Result,
        sync::{atomic::*, *},
        task::*,
        time::*,
    },
    tower::{BoxError, Service},
    tower_http_offline_cache::{
        cache::{implementation::memory::*, *},
        worker::*,
    },
    tracing_subscriber::{EnvFilter, fmt},
    url::Url,
};

pub const ORIGIN: &str = "https://app.kibray.example";

/// Initialize tracing once per test binary.
///
/// Set `RUST_LOG` to see the worker's decisions.
pub fn init_tracing() {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn origin() -> Url {
    Url::parse(ORIGIN).expect("origin")
}

/// Configuration with a small manifest that does not include the dashboard.
pub fn configuration() -> WorkerConfiguration {
    WorkerConfiguration::default()
        .origin(origin())
        .precache(["/", "/static/css/main.css"])
}

pub type TestWorker = OfflineWorker<MockNetwork, ()>;

pub type TestResponse = Response<OfflineBody<Full<Bytes>>>;

/// Installed and activated worker.
pub async fn activated(network: &MockNetwork, configuration: WorkerConfiguration) -> TestWorker {
    let worker = OfflineWorker::new(configuration, network.clone(), MemoryCacheStorage::default());
    worker.install().await.expect("install");
    worker.activate().await.expect("activate");
    worker
}

//
// Requests
//

pub fn get(uri: &str) -> Request<()> {
    Request::get(uri).body(()).expect("request")
}

pub fn navigate(uri: &str) -> Request<()> {
    Request::get(uri)
        .header("Sec-Fetch-Mode", "navigate")
        .header("Sec-Fetch-Dest", "document")
        .header(ACCEPT, "text/html")
        .body(())
        .expect("request")
}

pub fn load(uri: &str, destination: &str) -> Request<()> {
    Request::get(uri)
        .header("Sec-Fetch-Mode", "no-cors")
        .header("Sec-Fetch-Dest", destination)
        .body(())
        .expect("request")
}

pub async fn body_string(response: TestResponse) -> String {
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    String::from_utf8(bytes.to_vec()).expect("UTF-8")
}

//
// MockNetwork
//

/// Upstream that serves canned responses by path and query.
///
/// Unknown paths are 404. Clones share the state.
#[derive(Clone, Default)]
pub struct MockNetwork {
    state: Arc<MockNetworkState>,
}

#[derive(Default)]
struct MockNetworkState {
    responses: Mutex<HashMap<String, Response<Bytes>>>,
    requests: Mutex<Vec<(Method, String)>>,
    delays: Mutex<HashMap<String, Duration>>,
    offline: AtomicBool,
}

impl MockNetwork {
    /// Serve a 200 with a body.
    pub fn serve(&self, path: &str, body: &'static str) -> &Self {
        self.respond(path, Response::new(Bytes::from_static(body.as_bytes())))
    }

    /// Serve a response.
    pub fn respond(&self, path: &str, response: Response<Bytes>) -> &Self {
        self.state.responses.lock().expect("lock").insert(path.into(), response);
        self
    }

    /// Delay the responses for a path.
    pub fn delay(&self, path: &str, delay: Duration) -> &Self {
        self.state.delays.lock().expect("lock").insert(path.into(), delay);
        self
    }

    /// Fail every request with a network error.
    pub fn set_offline(&self, offline: bool) {
        self.state.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of requests that reached the network for a path.
    pub fn hits(&self, path: &str) -> usize {
        self.state
            .requests
            .lock()
            .expect("lock")
            .iter()
            .filter(|(_, requested)| requested == path)
            .count()
    }

    /// Methods of the requests that reached the network.
    pub fn methods(&self) -> Vec<Method> {
        self.state
            .requests
            .lock()
            .expect("lock")
            .iter()
            .map(|(method, _)| method.clone())
            .collect()
    }
}

impl Service<Request<()>> for MockNetwork {
    type Response = Response<Full<Bytes>>;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _context: &mut Context) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<()>) -> Self::Future {
        let state = self.state.clone();

        Box::pin(async move {
            let uri = request.uri();
            let path = uri.path_and_query().map(|path| path.as_str()).unwrap_or("/").to_string();

            state.requests.lock().expect("lock").push((request.method().clone(), path.clone()));

            let delay = state.delays.lock().expect("lock").get(&path).cloned();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            if state.offline.load(Ordering::SeqCst) {
                return Err("network unreachable".into());
            }

            let response = state.responses.lock().expect("lock").get(&path).cloned();
            Ok(match response {
                Some(response) => response.map(Full::new),

                None => Response::builder()
                    .status(StatusCode::NOT_FOUND)
                    .body(Full::new(Bytes::from_static(b"Not Found")))
                    .expect("response"),
            })
        })
    }
}

/// Network with the default manifest and a few application endpoints.
pub fn network() -> MockNetwork {
    let network = MockNetwork::default();
    network
        .serve("/", "home")
        .serve("/dashboard/", "dashboard")
        .serve("/static/css/main.css", "body{}")
        .serve("/static/js/main.js", "main()")
        .serve("/static/manifest.json", "{}")
        .serve("/offline/", "offline page")
        .serve("/api/v1/projects/", r#"[{"id":1}]"#)
        .serve("/static/img/logo.png", "logo");
    network
}
