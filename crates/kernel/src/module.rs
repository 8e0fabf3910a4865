use async_trait::async_trait;
use axum::Router;

use crate::settings::Settings;

/// What a module sees while the application comes up.
pub struct InitCtx<'a> {
    pub settings: &'a Settings,
}

/// One schema step owned by a module.
///
/// `id` is recorded once applied, so it must never change after release.
/// `up` may hold several statements.
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// A unit of the catalog: a resource with its routes, schema and docs.
#[async_trait]
pub trait Module: Sync + Send {
    /// Resource name; also the path segment the routes mount under.
    fn name(&self) -> &'static str;

    /// Runs once migrations are applied, before the server binds.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Routes relative to the mount point, e.g. `/` and `/{id}`.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI `paths` and `components.schemas` with paths relative to the
    /// mount point.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Tables this module owns. Applied in id order, after the migrations of
    /// every module registered earlier.
    fn migrations(&self) -> Vec<Migration> {
        Vec::new()
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
