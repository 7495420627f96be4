//! 后台前端静态资源
//!
//! rust-embed 嵌入 `frontend/dist`，未匹配的页面路由回落到 index.html；
//! `/api/` 下的未知路径返回 JSON 404，不走 SPA。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use rust_embed::Embed;
use std::path::Path;

use crate::config::AppConfig;
use crate::models::{ApiResponse, ErrorCode};

#[derive(Embed)]
#[folder = "frontend/dist/"]
struct FrontendAssets;

// (扩展名, Content-Type, 是否可长期缓存)。构建产物文件名带 hash，图片字体脚本可以长期缓存
const ASSET_TYPES: &[(&str, &str, bool)] = &[
    ("html", "text/html; charset=utf-8", false),
    ("js", "application/javascript; charset=utf-8", true),
    ("mjs", "application/javascript; charset=utf-8", true),
    ("css", "text/css; charset=utf-8", true),
    ("json", "application/json; charset=utf-8", false),
    ("map", "application/json", false),
    ("webmanifest", "application/manifest+json", false),
    ("png", "image/png", true),
    ("jpg", "image/jpeg", true),
    ("jpeg", "image/jpeg", true),
    ("gif", "image/gif", true),
    ("webp", "image/webp", true),
    ("svg", "image/svg+xml", true),
    ("ico", "image/x-icon", false),
    ("woff", "font/woff", true),
    ("woff2", "font/woff2", true),
    ("ttf", "font/ttf", true),
    ("txt", "text/plain; charset=utf-8", false),
];

/// 返回 (Content-Type, 是否可长期缓存)
fn asset_type(path: &str) -> (&'static str, bool) {
    let ext = Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    ASSET_TYPES
        .iter()
        .find(|(e, _, _)| *e == ext)
        .map(|(_, mime, cache)| (*mime, *cache))
        .unwrap_or(("application/octet-stream", false))
}

/// 替换 index.html 中的 `%APP_NAME%`
fn process_html(content: &[u8], config: &AppConfig) -> Vec<u8> {
    String::from_utf8_lossy(content)
        .replace("%APP_NAME%", &config.app.system_name)
        .into_bytes()
}

fn get_file(path: &str) -> Option<Vec<u8>> {
    FrontendAssets::get(path).map(|f| f.data.to_vec())
}

fn is_api_path(path: &str) -> bool {
    path == "api" || path.starts_with("api/")
}

/// 前端资源请求处理
pub async fn serve_frontend(req: HttpRequest) -> ActixResult<HttpResponse> {
    let path = req.match_info().query("tail").trim_start_matches('/');
    let config = AppConfig::get();

    if is_api_path(path) {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "API endpoint not found",
        )));
    }

    // 页面路由（如 /inbox/42）不对应文件，交给前端路由
    let (content, file_path) = match get_file(path).filter(|_| !path.is_empty()) {
        Some(content) => (Some(content), path),
        None => (get_file("index.html"), "index.html"),
    };

    match content {
        Some(mut data) => {
            let (mime, cacheable) = asset_type(file_path);

            if mime.starts_with("text/html") {
                data = process_html(&data, config);
            }

            let mut response = HttpResponse::Ok();
            response.content_type(mime);

            if cacheable {
                response.insert_header(("Cache-Control", "public, max-age=31536000, immutable"));
            } else {
                response.insert_header(("Cache-Control", "no-cache, no-store, must-revalidate"));
            }

            Ok(response.body(data))
        }
        None => {
            Ok(HttpResponse::NotFound()
                .content_type("text/html; charset=utf-8")
                .body(
                    r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>ThriftHub</title>
</head>
<body>
    <h1>ThriftHub</h1>
    <p>The back-office frontend is not embedded in this build.</p>
    <p>Build it into <code>frontend/dist</code> and rebuild the server.</p>
</body>
</html>"#,
                ))
        }
    }
}

/// 配置前端路由
pub fn configure_frontend_routes(cfg: &mut web::ServiceConfig) {
    // 所有非 API 路由都交给前端处理
    cfg.route("/{tail:.*}", web::get().to(serve_frontend));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_types() {
        assert_eq!(asset_type("index.html"), ("text/html; charset=utf-8", false));
        assert_eq!(
            asset_type("assets/index-3f9a1c.js"),
            ("application/javascript; charset=utf-8", true)
        );
        assert_eq!(asset_type("logo.PNG"), ("image/png", true));
        assert!(!asset_type("manifest.json").1);
        assert_eq!(asset_type("README"), ("application/octet-stream", false));
    }

    #[test]
    fn test_api_paths_skip_spa() {
        assert!(is_api_path("api/v1/unknown"));
        assert!(is_api_path("api"));
        assert!(!is_api_path("apidocs"));
        assert!(!is_api_path("inbox/42"));
    }

    #[test]
    fn test_app_name_placeholder() {
        let mut config = AppConfig::default();
        config.app.system_name = "DutchThrift".into();
        let html = process_html(b"<title>%APP_NAME%</title>", &config);
        assert_eq!(html, b"<title>DutchThrift</title>".to_vec());
    }
}
