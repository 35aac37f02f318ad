/*
 * Responsibility
 * - URL layout of the LFS API under /{username}/{reponame}/info/lfs
 * - which guards run on which route, and in what order
 *
 * Notes
 * - the last route_layer added runs first, so each chain below is written
 *   innermost guard first
 * - authenticate wraps the whole router and therefore runs before everything else
 */
use axum::{
    Router,
    routing::{get, post, put},
};

use crate::api::lfs::handlers::{
    serve_basic_download, serve_basic_upload, serve_basic_verify, serve_batch,
};
use crate::middleware::{
    auth::{authenticate, authorize},
    verify,
};
use crate::models::AccessMode;
use crate::state::AppState;

const PREFIX: &str = "/{username}/{reponame}/info/lfs";

pub fn routes(state: &AppState) -> Router<AppState> {
    let stores = &state.stores;

    // authorize(read) -> accept -> content-type json -> batch
    let batch = authorize::on(
        verify::accept(verify::content_type_json(post(serve_batch))),
        stores,
        AccessMode::Read,
    );

    // oid -> authorize(read) -> download
    // oid -> authorize(write) -> content-type stream -> upload
    let download = authorize::on(get(serve_basic_download), stores, AccessMode::Read);
    let upload = authorize::on(
        verify::content_type_stream(put(serve_basic_upload)),
        stores,
        AccessMode::Write,
    );
    let object = verify::oid(download.merge(upload));

    // authorize(write) -> accept -> content-type json -> verify
    let verify_object = authorize::on(
        verify::accept(verify::content_type_json(post(serve_basic_verify))),
        stores,
        AccessMode::Write,
    );

    let router = Router::new()
        .route(&format!("{PREFIX}/objects/batch"), batch)
        .route(&format!("{PREFIX}/objects/basic/verify"), verify_object)
        .route(&format!("{PREFIX}/objects/basic/{{oid}}"), object);

    authenticate::apply(router, stores)
}
