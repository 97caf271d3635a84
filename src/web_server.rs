use crate::analysis::ImagePayload;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::pipeline::Pipeline;
use actix_files::NamedFile;
use actix_web::{web, App, HttpMessage, HttpRequest, HttpResponse, HttpServer};
use std::sync::Arc;

async fn index() -> Result<NamedFile, AppError> {
    NamedFile::open_async("./static/index.html").await.map_err(|e| {
        log::error!("Error serving index.html: {}", e);
        AppError::Io(e)
    })
}

async fn analyze(
    req: HttpRequest,
    body: web::Bytes,
    pipeline: web::Data<Pipeline>,
) -> Result<HttpResponse, AppError> {
    let mime_type = req.content_type().to_string();
    log::debug!(
        "Received analysis request: {} bytes declared as {}",
        body.len(),
        mime_type
    );

    let payload = ImagePayload {
        bytes: body.to_vec(),
        mime_type,
    };

    let report = pipeline.analyze(payload).await?;
    log::info!(
        "Analysis by {} produced {} location candidates",
        report.model,
        report.candidates.len()
    );

    Ok(HttpResponse::Ok().json(report))
}

pub async fn start_web_server(
    config: Arc<AppConfig>,
    pipeline: Arc<Pipeline>,
) -> std::io::Result<()> {
    let port = config.web_port;
    let max_payload = config.max_image_bytes;
    let pipeline_data = web::Data::from(pipeline);

    log::info!("Starting web server on port: {}", port);
    log::debug!("Serving static files from ./static directory.");

    HttpServer::new(move || {
        App::new()
            .app_data(pipeline_data.clone())
            // Same cap the builder enforces, applied before the body is read
            .app_data(web::PayloadConfig::new(max_payload))
            .service(actix_files::Files::new("/static", "./static"))
            .service(web::resource("/api/analyze").route(web::post().to(analyze)))
            .default_service(web::to(index)) // Serve index.html for any unmatched route
    })
    .bind(format!("0.0.0.0:{}", port))?
    .run()
    .await
}
