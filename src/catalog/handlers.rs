use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use libris_http::{
    extract::{parse_id, ValidJson},
    response::Sourced,
    AppError,
};
use serde_json::json;

use super::{store_error, EntityService, Page, PageParams, Resource};

type Service<E> = State<Arc<EntityService<E>>>;

/// The CRUD quintet for `E`, relative to its mount point.
pub fn router<E: Resource>(service: Arc<EntityService<E>>) -> Router {
    Router::new()
        .route("/", get(list::<E>).post(create::<E>))
        .route("/{id}", get(show::<E>).put(update::<E>).delete(destroy::<E>))
        .with_state(service)
}

async fn list<E: Resource>(
    State(service): Service<E>,
    Query(params): Query<PageParams>,
) -> Result<Sourced<Page<E>>, AppError> {
    let page = params.resolve()?;
    let fetched = service.list().await.map_err(store_error::<E>)?;
    Ok(Sourced(fetched.map(|records| page.slice(records))))
}

async fn show<E: Resource>(
    State(service): Service<E>,
    Path(raw_id): Path<String>,
) -> Result<Sourced<E>, AppError> {
    let id = parse_id(&raw_id, E::LABEL)?;
    let fetched = service.get(id).await.map_err(store_error::<E>)?;
    Ok(Sourced(fetched))
}

async fn create<E: Resource>(
    State(service): Service<E>,
    ValidJson(draft): ValidJson<E::Draft>,
) -> Result<(StatusCode, Json<E>), AppError> {
    check::<E>(&draft)?;
    let record = service.create(&draft).await.map_err(store_error::<E>)?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update<E: Resource>(
    State(service): Service<E>,
    Path(raw_id): Path<String>,
    ValidJson(draft): ValidJson<E::Draft>,
) -> Result<Json<E>, AppError> {
    let id = parse_id(&raw_id, E::LABEL)?;
    check::<E>(&draft)?;
    let record = service.update(id, &draft).await.map_err(store_error::<E>)?;
    Ok(Json(record))
}

async fn destroy<E: Resource>(
    State(service): Service<E>,
    Path(raw_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = parse_id(&raw_id, E::LABEL)?;
    service.delete(id).await.map_err(store_error::<E>)?;
    Ok(Json(json!({
        "message": format!("{} deleted successfully", E::LABEL)
    })))
}

fn check<E: Resource>(draft: &E::Draft) -> Result<(), AppError> {
    E::validate(draft).map_err(|details| {
        AppError::validation(details, format!("Invalid {} payload", E::NAME))
    })
}
