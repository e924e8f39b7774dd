//! Serves uploaded post images from the media root.

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use tracing::warn;

use yatube::domain::ImagePath;
use yatube::outbound::media::LocalMediaStore;

/// Mount point for `media_url`, or `None` when images are served from
/// another origin.
pub(crate) fn mount_path(media_url: &str) -> Option<String> {
    let prefix = media_url.trim_end_matches('/');
    if !prefix.starts_with('/') || prefix.starts_with("//") {
        return None;
    }
    Some(format!("{prefix}/{{path:.+}}"))
}

/// Stream one stored image back with a guessed content type.
pub(crate) async fn serve_media(
    store: web::Data<LocalMediaStore>,
    path: web::Path<String>,
) -> HttpResponse {
    let Ok(image) = ImagePath::new(path.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };
    match store.read(&image).await {
        Ok(Some(bytes)) => HttpResponse::Ok()
            .content_type(mime_guess::from_path(image.as_str()).first_or_octet_stream())
            .insert_header((header::CACHE_CONTROL, "public, max-age=86400"))
            .body(bytes),
        Ok(None) => HttpResponse::NotFound().finish(),
        Err(err) => {
            warn!(path = %image, error = %err, "failed to read media");
            HttpResponse::ServiceUnavailable().finish()
        }
    }
}
