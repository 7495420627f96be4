use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};
use std::path::Path;

use super::FileService;
use crate::config::AppConfig;
use crate::errors::ThriftHubError;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;
use crate::utils::content_type_for;

/// Content-Disposition 中的文件名不能带引号和换行
fn disposition_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '"' | '\\' | '\r' | '\n'))
        .collect()
}

pub async fn handle_download(
    service: &FileService,
    request: &HttpRequest,
    file_token: String,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let attachment = match storage.get_attachment_by_token(&file_token).await {
        Ok(Some(a)) => a,
        Ok(None) => {
            return Ok(ApiResponse::not_found(
                ErrorCode::FileNotFound,
                "File not found",
            ));
        }
        Err(e) => return Ok(storage_failure("Query file", &e)),
    };

    let file_path = Path::new(&AppConfig::get().upload.dir).join(&attachment.stored_name);

    let buf = match tokio::fs::read(&file_path).await {
        Ok(buf) => buf,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(
                "Attachment {} is missing on disk: {}",
                attachment.download_token,
                file_path.display()
            );
            return Ok(ApiResponse::not_found(
                ErrorCode::FileNotFound,
                "File not found",
            ));
        }
        Err(e) => {
            tracing::error!("{}", ThriftHubError::file_operation(format!("读取附件失败: {e}")));
            return Ok(ApiResponse::internal_error("File read failed"));
        }
    };

    let extension = Path::new(&attachment.original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type_for(&extension)))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                disposition_name(&attachment.original_name)
            ),
        ))
        .body(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disposition_name_strips_quotes() {
        assert_eq!(disposition_name("bon \"1\".pdf"), "bon 1.pdf");
        assert_eq!(disposition_name("a\r\nb.png"), "ab.png");
    }
}
