//! Brand asset serving
//!
//! Looks an asset up in the session's brand directory, then in the static
//! fallback tree. A missing asset is not an error: the response is an empty
//! body with the guessed content type.

use std::io;
use std::path::{Path, PathBuf};

use hyper::body::Bytes;
use percent_encoding::percent_decode_str;
use tokio::fs;

use crate::brand::{self, Brand};
use crate::config::{AppState, BrandingConfig};
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, HttpResponse};

/// Where a resolved asset came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSource {
    Brand,
    Static,
}

/// Decode and validate an asset name taken from the request path
///
/// Accepts relative paths such as `img/logo.png`. Rejects empty names,
/// absolute paths, backslashes and `.`/`..`/empty segments.
pub fn parse_asset_name(raw: &str) -> Option<String> {
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;
    if decoded.is_empty() || decoded.contains(['\\', '\0']) {
        return None;
    }
    if decoded
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return None;
    }
    Some(decoded.into_owned())
}

/// Sub-directory of the static fallback tree for a content type
pub fn fallback_subdir(content_type: &str) -> Option<&'static str> {
    let essence = mime::essence(content_type);
    if essence.starts_with("image/") {
        Some("img")
    } else if essence == "text/css" {
        Some("css")
    } else {
        None
    }
}

/// Candidate files for an asset, in lookup order
pub fn candidate_paths(
    branding: &BrandingConfig,
    brand: &Brand,
    asset: &str,
    content_type: &str,
) -> [(AssetSource, PathBuf, PathBuf); 2] {
    let brand_base = branding.brand_dir().join(brand.as_str());
    let static_base = match fallback_subdir(content_type) {
        Some(sub) => branding.static_dir().join(sub),
        None => branding.static_dir(),
    };
    [
        (AssetSource::Brand, brand_base.join(asset), brand_base),
        (AssetSource::Static, static_base.join(asset), static_base),
    ]
}

/// Return `path` when it is a regular file that stays inside `base`
async fn existing_file_within(path: &Path, base: &Path) -> Option<PathBuf> {
    let resolved = fs::canonicalize(path).await.ok()?;
    let base = fs::canonicalize(base).await.ok()?;
    if !resolved.starts_with(&base) {
        tracing::warn!(
            path = %path.display(),
            resolved = %resolved.display(),
            "Asset resolves outside its directory, ignoring"
        );
        return None;
    }
    let metadata = fs::metadata(&resolved).await.ok()?;
    metadata.is_file().then_some(resolved)
}

/// Find and read the asset, brand directory first
pub async fn load_asset(
    branding: &BrandingConfig,
    brand: &Brand,
    asset: &str,
    content_type: &str,
) -> Option<(AssetSource, Vec<u8>)> {
    for (source, path, base) in candidate_paths(branding, brand, asset, content_type) {
        let Some(file) = existing_file_within(&path, &base).await else {
            continue;
        };
        match fs::read(&file).await {
            Ok(data) => return Some((source, data)),
            // Removed between lookup and read
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::error!(path = %file.display(), error = %e, "Failed to read asset");
            }
        }
    }
    None
}

/// Serve `asset` for the brand of the current session
pub async fn serve_brand_asset(
    ctx: &RequestContext<'_>,
    raw_asset: &str,
    state: &AppState,
) -> HttpResponse {
    let branding = &state.config.branding;
    let brand = brand::get_brand(ctx.headers, &branding.cookie_name, &state.default_brand);

    let Some(asset) = parse_asset_name(raw_asset) else {
        tracing::warn!(asset = raw_asset, "Rejected asset name");
        return http::build_404_response();
    };

    let content_type = mime::guess_type(&asset);
    let mut response = match load_asset(branding, &brand, &asset, content_type).await {
        Some((source, data)) => {
            tracing::debug!(%brand, asset = %asset, ?source, bytes = data.len(), "Serving asset");
            let etag = cache::generate_etag(&data);
            let cache_control = cache::private_max_age(branding.asset_max_age);
            if cache::check_etag_match(ctx.if_none_match(), &etag) {
                http::build_304_response(&etag, &cache_control)
            } else {
                http::build_asset_response(
                    Bytes::from(data),
                    content_type,
                    &etag,
                    &cache_control,
                    ctx.is_head,
                )
            }
        }
        None => {
            tracing::debug!(%brand, asset = %asset, "Asset not found, returning empty body");
            http::build_empty_asset_response(content_type)
        }
    };

    brand::set_brand(&mut response, Some(&brand), branding);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_asset_name() {
        assert_eq!(parse_asset_name("logo.png").as_deref(), Some("logo.png"));
        assert_eq!(parse_asset_name("img/logo.png").as_deref(), Some("img/logo.png"));
        assert_eq!(parse_asset_name("my%20logo.png").as_deref(), Some("my logo.png"));
    }

    #[test]
    fn test_parse_asset_name_rejects_traversal() {
        assert_eq!(parse_asset_name(""), None);
        assert_eq!(parse_asset_name("../secret"), None);
        assert_eq!(parse_asset_name("%2E%2E/secret"), None);
        assert_eq!(parse_asset_name("a/../../b"), None);
        assert_eq!(parse_asset_name("/etc/passwd"), None);
        assert_eq!(parse_asset_name("%2Fetc%2Fpasswd"), None);
        assert_eq!(parse_asset_name("dir/"), None);
        assert_eq!(parse_asset_name("a\\b"), None);
        assert_eq!(parse_asset_name("./logo.png"), None);
        assert_eq!(parse_asset_name("%FF"), None);
    }

    #[test]
    fn test_fallback_subdir() {
        assert_eq!(fallback_subdir("image/png"), Some("img"));
        assert_eq!(fallback_subdir("image/svg+xml"), Some("img"));
        assert_eq!(fallback_subdir("text/css"), Some("css"));
        assert_eq!(fallback_subdir("application/javascript"), None);
        assert_eq!(fallback_subdir("text/html; charset=utf-8"), None);
    }

    #[test]
    fn test_candidate_paths() {
        let branding = BrandingConfig {
            root_dir: PathBuf::from("/srv/dash"),
            ..BrandingConfig::default()
        };
        let brand = Brand::parse("acme").unwrap();

        let [brand_path, static_path] = candidate_paths(&branding, &brand, "x.png", "image/png");
        assert_eq!(brand_path.0, AssetSource::Brand);
        assert_eq!(brand_path.1, Path::new("/srv/dash/brand/acme/x.png"));
        assert_eq!(static_path.1, Path::new("/srv/dash/static/custom/img/x.png"));

        let [_, css] = candidate_paths(&branding, &brand, "site.css", "text/css");
        assert_eq!(css.1, Path::new("/srv/dash/static/custom/css/site.css"));

        let [_, other] = candidate_paths(&branding, &brand, "app.js", "application/javascript");
        assert_eq!(other.1, Path::new("/srv/dash/static/custom/app.js"));
    }
}
