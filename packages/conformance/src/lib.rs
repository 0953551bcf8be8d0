//! Shared helpers for the gateway conformance test suite.
//!
//! Provides [`spawn_gateway`], which starts two things in the background:
//!
//! - a [`FakeEngine`] speaking the engine frame protocol on a fresh Unix
//!   socket in the temp directory, and
//! - the real gateway router, bound to an ephemeral TCP port and talking to
//!   that socket through `SocketEngine`.
//!
//! Tests drive the gateway over real HTTP and can inspect or seed the fake
//! engine's state through the returned handle.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use flowgate::FlexValue;
use flowgate_engine_api::{
    read_frame, write_frame, EdgeAdded, EdgeDetails, EngineReply, EngineRequest, EngineResponse,
    Io, Node, NodeSummary, PackageDetails,
};
use flowgate_gateway::{build_router, Engine, GatewayConfig, SocketEngine};
use tokio::net::UnixListener;

/// In-memory stand-in for the flow engine.
///
/// Every node type has inputs `a` and `b` and output `out`, all starting at
/// `Uint(0)`. Failures are reported as plain strings, as the engine does.
#[derive(Debug)]
pub struct FakeEngine {
    pub packages: Vec<PackageDetails>,
    pub nodes: Vec<Node>,
    pub edges: BTreeMap<u32, EdgeDetails>,
    next_instance: u32,
    next_edge: u32,
    /// Every request received, in arrival order.
    pub requests: Vec<EngineRequest>,
}

impl Default for FakeEngine {
    fn default() -> Self {
        Self {
            packages: vec![
                PackageDetails {
                    package_id: 1,
                    package_name: "math".into(),
                    package_version: "1.0.0".into(),
                },
                PackageDetails {
                    package_id: 2,
                    package_name: "io".into(),
                    package_version: "0.3.1".into(),
                },
            ],
            nodes: Vec::new(),
            edges: BTreeMap::new(),
            next_instance: 1,
            next_edge: 1,
            requests: Vec::new(),
        }
    }
}

fn node_type_name(package: &str, node_id: u32) -> String {
    match (package, node_id) {
        ("math", 1) => "Add".into(),
        ("math", 2) => "Mul".into(),
        ("io", 1) => "Print".into(),
        (pkg, id) => format!("{pkg}.{id}"),
    }
}

fn slot(name: &str) -> Io {
    Io {
        name: name.into(),
        value: FlexValue::Uint(0),
        overridden: false,
    }
}

impl FakeEngine {
    /// Apply one request to the in-memory graph.
    pub fn handle(&mut self, request: EngineRequest) -> Result<EngineResponse, String> {
        self.requests.push(request.clone());
        match request {
            EngineRequest::AddNode(details) => {
                let package = self
                    .packages
                    .iter()
                    .find(|p| p.package_id == details.package_id)
                    .ok_or_else(|| format!("unknown package {}", details.package_id))?;
                let name = node_type_name(&package.package_name, details.node_id);
                let instance_id = self.next_instance;
                self.next_instance += 1;
                self.nodes.push(Node {
                    instance_id,
                    node_name: name.clone(),
                    inputs: vec![slot("a"), slot("b")],
                    outputs: vec![slot("out")],
                });
                Ok(EngineResponse::NodeAdded(NodeSummary { instance_id, name }))
            }
            EngineRequest::UpdateNode(position) => {
                let node = self.node(position.instance_id)?;
                Ok(EngineResponse::NodeUpdated(NodeSummary {
                    instance_id: node.instance_id,
                    name: node.node_name.clone(),
                }))
            }
            EngineRequest::RemoveNode { instance_id } => {
                self.node(instance_id)?;
                self.nodes.retain(|n| n.instance_id != instance_id);
                self.edges.retain(|_, e| {
                    e.from_instance_id != instance_id && e.to_instance_id != instance_id
                });
                Ok(EngineResponse::NodeRemoved { instance_id })
            }
            EngineRequest::GetAllValues => Ok(EngineResponse::AllValues {
                nodes: self.nodes.clone(),
            }),
            EngineRequest::SetDefault(update) | EngineRequest::SetFallback(update) => {
                let io = self.slot_mut(update.instance_id, &update.name, None)?;
                if let Some(value) = update.value {
                    io.value = value;
                }
                Ok(EngineResponse::ValueSet)
            }
            EngineRequest::SetOverride(update) => {
                let io = self.slot_mut(update.instance_id, &update.name, Some(update.input))?;
                if let Some(value) = update.value {
                    io.value = value;
                }
                io.overridden = update.active;
                Ok(EngineResponse::ValueSet)
            }
            EngineRequest::AddEdge(edge) => {
                self.node(edge.from_instance_id)?;
                self.node(edge.to_instance_id)?;
                let edge_id = self.next_edge;
                self.next_edge += 1;
                self.edges.insert(edge_id, edge);
                Ok(EngineResponse::EdgeAdded(EdgeAdded {
                    edge_id,
                    data_only: false,
                }))
            }
            EngineRequest::RemoveEdge { edge_id } => self
                .edges
                .remove(&edge_id)
                .map(|_| EngineResponse::EdgeRemoved { edge_id })
                .ok_or_else(|| format!("edge {edge_id} not found")),
            EngineRequest::GetAvailablePackages => Ok(EngineResponse::AvailablePackages {
                packages: self.packages.clone(),
            }),
            EngineRequest::GetPackageJson { package_id } => {
                let package = self
                    .packages
                    .iter()
                    .find(|p| p.package_id == package_id)
                    .ok_or_else(|| format!("unknown package {package_id}"))?;
                let nodes: Vec<_> = [1u32, 2]
                    .iter()
                    .map(|&id| {
                        serde_json::json!({
                            "id": id,
                            "name": node_type_name(&package.package_name, id),
                        })
                    })
                    .collect();
                let json_data = serde_json::json!({
                    "name": package.package_name,
                    "version": package.package_version,
                    "nodes": nodes,
                })
                .to_string();
                Ok(EngineResponse::PackageJson { json_data })
            }
            EngineRequest::GetFlowJson => {
                let nodes: Vec<_> = self
                    .nodes
                    .iter()
                    .map(|n| serde_json::json!({ "id": n.instance_id, "type": n.node_name }))
                    .collect();
                let edges: Vec<_> = self
                    .edges
                    .iter()
                    .map(|(id, e)| {
                        serde_json::json!({
                            "id": id,
                            "from": [e.from_instance_id, e.out_name],
                            "to": [e.to_instance_id, e.in_name],
                        })
                    })
                    .collect();
                let json_data = serde_json::json!({ "nodes": nodes, "edges": edges }).to_string();
                Ok(EngineResponse::FlowJson { json_data })
            }
        }
    }

    fn node(&self, instance_id: u32) -> Result<&Node, String> {
        self.nodes
            .iter()
            .find(|n| n.instance_id == instance_id)
            .ok_or_else(|| format!("node {instance_id} not found"))
    }

    /// Find a slot by name. `input` restricts the search to inputs (`true`)
    /// or outputs (`false`); `None` searches inputs first, then outputs.
    fn slot_mut(&mut self, instance_id: u32, name: &str, input: Option<bool>) -> Result<&mut Io, String> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.instance_id == instance_id)
            .ok_or_else(|| format!("node {instance_id} not found"))?;
        let found = match input {
            Some(true) => node.inputs.iter_mut().find(|io| io.name == name),
            Some(false) => node.outputs.iter_mut().find(|io| io.name == name),
            None => node
                .inputs
                .iter_mut()
                .chain(node.outputs.iter_mut())
                .find(|io| io.name == name),
        };
        found.ok_or_else(|| format!("node {instance_id} has no slot {name:?}"))
    }
}

/// A running gateway plus the fake engine behind it.
pub struct TestGateway {
    /// e.g. `http://127.0.0.1:51234`
    pub base_url: String,
    pub engine: Arc<Mutex<FakeEngine>>,
    pub socket_path: PathBuf,
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

/// A socket path that no other test run will pick.
pub fn unique_socket_path() -> PathBuf {
    std::env::temp_dir().join(format!("flowgate-{}.sock", uuid::Uuid::now_v7()))
}

/// Serve `engine` on a new Unix socket, one request per connection.
///
/// # Panics
///
/// Panics if the socket cannot be bound.
pub fn spawn_fake_engine(engine: Arc<Mutex<FakeEngine>>) -> PathBuf {
    let path = unique_socket_path();
    let listener = UnixListener::bind(&path).expect("bind fake engine socket");
    tokio::spawn(async move {
        while let Ok((mut conn, _)) = listener.accept().await {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                let Ok(request) = read_frame::<_, EngineRequest>(&mut conn).await else {
                    return;
                };
                let reply = EngineReply::from(engine.lock().expect("fake engine lock").handle(request));
                let _ = write_frame(&mut conn, &reply).await;
            });
        }
    });
    path
}

/// Start a fake engine and a gateway in front of it.
///
/// # Panics
///
/// Panics if the TCP listener or the engine socket cannot be bound.
pub async fn spawn_gateway() -> TestGateway {
    spawn_gateway_with(GatewayConfig::default()).await
}

/// Like [`spawn_gateway`], with a caller-supplied base config. The bind
/// address, engine socket, and public URL are overwritten.
pub async fn spawn_gateway_with(mut config: GatewayConfig) -> TestGateway {
    let engine = Arc::new(Mutex::new(FakeEngine::default()));
    let socket_path = spawn_fake_engine(Arc::clone(&engine));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");
    let base_url = format!("http://{addr}");

    config.bind_addr = addr;
    config.engine_socket = socket_path.clone();
    config.public_url = base_url.clone();

    let client: Arc<dyn Engine> =
        Arc::new(SocketEngine::new(socket_path.clone()).with_timeout(config.engine_timeout));
    let router = build_router(client, config);

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("conformance gateway error");
    });

    TestGateway {
        base_url,
        engine,
        socket_path,
    }
}
