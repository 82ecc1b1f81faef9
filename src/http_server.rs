use std::io;

use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, HttpServer, ResponseError, get, middleware, web};
use serde::{Deserialize, Serialize};

use crate::asf_parser::{ChunkDirectoryEntry, inspect, list_chunks};
use crate::config::{Config, PlatformInfo};
use crate::error::{Result, SavestateError};
use crate::metadata::DecodedMetadata;
use crate::savestate_dir::{SavestateEntry, list_savestates, resolve_savestate};
use crate::summary::summary;

#[derive(Debug, Serialize)]
struct StatusResponse {
    success: bool,
    message: String,
}

#[derive(Debug, Serialize)]
struct ServiceInfo {
    name: &'static str,
    version: &'static str,
    endpoints: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub metadata: DecodedMetadata,
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    search: Option<String>,
}

impl ResponseError for SavestateError {
    fn status_code(&self) -> StatusCode {
        match self {
            SavestateError::NotFound(_) => StatusCode::NOT_FOUND,
            SavestateError::MalformedInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SavestateError::InvalidName(_) => StatusCode::BAD_REQUEST,
            SavestateError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(StatusResponse {
            success: false,
            message: self.to_string(),
        })
    }
}

/// Run file access and decoding on the blocking pool.
async fn run_blocking<F, R>(work: F) -> Result<R>
where
    F: FnOnce() -> Result<R> + Send + 'static,
    R: Send + 'static,
{
    web::block(work)
        .await
        .map_err(|err| SavestateError::Io(io::Error::other(err.to_string())))?
}

#[get("/")]
async fn index() -> web::Json<ServiceInfo> {
    web::Json(ServiceInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        endpoints: &[
            "GET /platform",
            "GET /savestates?search=",
            "GET /savestates/{name}",
            "GET /savestates/{name}/chunks",
        ],
    })
}

#[get("/platform")]
async fn platform(config: web::Data<Config>) -> web::Json<PlatformInfo> {
    web::Json(config.platform_info())
}

#[get("/savestates")]
async fn savestates(
    config: web::Data<Config>,
    query: web::Query<SearchQuery>,
) -> Result<web::Json<Vec<SavestateEntry>>> {
    let dir = config.savestate_dir.clone();
    let search = query.into_inner().search;
    let entries = run_blocking(move || list_savestates(&dir, search.as_deref())).await?;
    Ok(web::Json(entries))
}

#[get("/savestates/{name}")]
async fn inspect_savestate(
    config: web::Data<Config>,
    name: web::Path<String>,
) -> Result<web::Json<InspectReport>> {
    let dir = config.savestate_dir.clone();
    let name = name.into_inner();
    let report = run_blocking(move || {
        let path = resolve_savestate(&dir, &name)?;
        let metadata = inspect(&path)?;
        let summary = summary(&metadata);
        Ok(InspectReport { metadata, summary })
    })
    .await?;
    log::info!("inspected {} ({} chunks)", report.metadata.filename, report.metadata.chunks.len());
    Ok(web::Json(report))
}

#[get("/savestates/{name}/chunks")]
async fn savestate_chunks(
    config: web::Data<Config>,
    name: web::Path<String>,
) -> Result<web::Json<Vec<ChunkDirectoryEntry>>> {
    let dir = config.savestate_dir.clone();
    let name = name.into_inner();
    let chunks = run_blocking(move || list_chunks(&resolve_savestate(&dir, &name)?)).await?;
    Ok(web::Json(chunks))
}

/// Register every route. Expects `web::Data<Config>` in the app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(platform)
        .service(savestates)
        .service(savestate_chunks)
        .service(inspect_savestate);
}

pub async fn serve(config: Config, host: &str, port: u16) -> io::Result<()> {
    log::info!("starting HTTP API on http://{host}:{port}");
    log::info!("savestate directory: {}", config.savestate_dir.display());
    let config = web::Data::new(config);
    HttpServer::new(move || {
        App::new()
            .app_data(config.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind((host, port))?
    .run()
    .await
}
