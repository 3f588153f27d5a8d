//! Request handlers for the service's two routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::http::server::AppState;

/// Version information exposed by the info endpoint.
///
/// Set once at startup and read-only afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    /// Reported as `"<major>.<minor>"`.
    #[serde(rename = "ver")]
    version: String,
}

impl ServiceInfo {
    pub fn new(major: &str, minor: &str) -> Self {
        Self {
            version: format!("{major}.{minor}"),
        }
    }

    /// Version info taken from this crate's build metadata.
    pub fn from_build() -> Self {
        Self::new(
            env!("CARGO_PKG_VERSION_MAJOR"),
            env!("CARGO_PKG_VERSION_MINOR"),
        )
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Liveness probe: 200 with an empty body.
pub async fn root() -> StatusCode {
    StatusCode::OK
}

/// Version info: 200 with `{"ver": "<major>.<minor>"}`.
pub async fn info(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(state.info.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_serializes_under_the_ver_key() {
        let info = ServiceInfo::new("0", "1");
        assert_eq!(
            serde_json::to_string(&info).unwrap(),
            r#"{"ver":"0.1"}"#
        );
    }

    #[test]
    fn build_info_joins_major_and_minor() {
        let info = ServiceInfo::from_build();
        let expected = format!(
            "{}.{}",
            env!("CARGO_PKG_VERSION_MAJOR"),
            env!("CARGO_PKG_VERSION_MINOR")
        );
        assert_eq!(info.version(), expected);
    }
}
