//! HTTP gateway in front of the flow engine.
//!
//! Translates REST/JSON requests into engine RPC calls and serves an
//! OpenAPI description of the surface it exposes.
//!
//! # Module layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | [`GatewayConfig`] populated from `FLOWGATE_*` environment variables |
//! | [`engine`] | The [`Engine`] capability and its Unix-socket client |
//! | [`error`] | [`AppError`] and its plain-text HTTP rendering |
//! | [`extract`] | The `Payload` JSON body extractor |
//! | [`handlers`] | One registrar per resource family, plus docs and health |
//! | [`router`] | [`build_router`], which wires everything together |

pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;

pub use config::{ConfigError, GatewayConfig};
pub use engine::{socket::SocketEngine, Engine, EngineError};
pub use error::AppError;
pub use router::{build_router, build_schema};
