use actix_multipart::{Field, Multipart};
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::FileService;
use crate::config::AppConfig;
use crate::errors::ThriftHubError;
use crate::models::files::entities::Attachment;
use crate::models::notes::entities::NoteEntityType;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{check_entity_exists, current_user, storage_failure};
use crate::utils::validate_magic_bytes;

/// 文本字段最多读取的字节数
const MAX_TEXT_FIELD: usize = 64;

// 已写入磁盘的文件
struct StoredFile {
    path: PathBuf,
    stored_name: String,
    original_name: String,
    extension: String,
    size: i64,
}

fn discard(file: &StoredFile) {
    if let Err(e) = fs::remove_file(&file.path) {
        tracing::warn!("Failed to remove {}: {}", file.path.display(), e);
    }
}

async fn read_text_field(field: &mut Field) -> ActixResult<String> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let data = chunk?;
        if buf.len() + data.len() > MAX_TEXT_FIELD {
            break;
        }
        buf.extend_from_slice(&data);
    }
    Ok(String::from_utf8_lossy(&buf).trim().to_string())
}

fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

pub async fn handle_upload(
    service: &FileService,
    req: &HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let user = current_user(req)?;
    let config = AppConfig::get();
    let upload_dir = Path::new(&config.upload.dir);
    let max_size = config.upload.max_size;

    // 确保上传目录存在
    if let Err(e) = fs::create_dir_all(upload_dir) {
        tracing::error!("{}", ThriftHubError::file_operation(format!("创建上传目录失败: {e}")));
        return Ok(ApiResponse::respond(
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::FileUploadFailed,
            "Failed to prepare upload directory",
        ));
    }

    let mut stored: Option<StoredFile> = None;
    let mut entity_type_raw: Option<String> = None;
    let mut entity_id_raw: Option<String> = None;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        match name.as_str() {
            "entity_type" => entity_type_raw = Some(read_text_field(&mut field).await?),
            "entity_id" => entity_id_raw = Some(read_text_field(&mut field).await?),
            "file" => {
                if let Some(previous) = &stored {
                    discard(previous);
                    return Ok(ApiResponse::bad_request(
                        ErrorCode::MultifileUploadNotAllowed,
                        "Only one file can be uploaded at a time",
                    ));
                }

                let original_name = content_disposition
                    .and_then(|cd| cd.get_filename())
                    .map(|s| s.to_string())
                    .unwrap_or_default();

                let extension = extension_of(&original_name);
                if extension.is_empty()
                    || !config
                        .upload
                        .allowed_types
                        .iter()
                        .any(|t| t.to_lowercase() == extension)
                {
                    return Ok(ApiResponse::bad_request(
                        ErrorCode::FileTypeNotAllowed,
                        "File type not allowed",
                    ));
                }

                let stored_name = format!("{}{}", Uuid::new_v4(), extension);
                let path = upload_dir.join(&stored_name);
                let mut f = match File::create(&path) {
                    Ok(file) => file,
                    Err(e) => {
                        tracing::error!(
                            "{}",
                            ThriftHubError::file_operation(format!("文件创建失败: {e}"))
                        );
                        return Ok(ApiResponse::respond(
                            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                            ErrorCode::FileUploadFailed,
                            "Failed to store file",
                        ));
                    }
                };
                let mut file = StoredFile {
                    path,
                    stored_name,
                    original_name,
                    extension,
                    size: 0,
                };

                let mut total_size: usize = 0;
                let mut first_chunk = true;
                while let Some(chunk) = field.next().await {
                    let data = match chunk {
                        Ok(data) => data,
                        Err(e) => {
                            discard(&file);
                            return Err(e.into());
                        }
                    };

                    // 第一个 chunk 时验证魔术字节
                    if first_chunk {
                        first_chunk = false;
                        if !validate_magic_bytes(&data, &file.extension) {
                            discard(&file);
                            return Ok(ApiResponse::bad_request(
                                ErrorCode::FileTypeNotAllowed,
                                "File content does not match its extension",
                            ));
                        }
                    }

                    total_size += data.len();
                    if total_size > max_size {
                        discard(&file);
                        return Ok(ApiResponse::bad_request(
                            ErrorCode::FileSizeExceeded,
                            "File size exceeds the limit",
                        ));
                    }
                    if let Err(e) = f.write_all(&data) {
                        discard(&file);
                        tracing::error!(
                            "{}",
                            ThriftHubError::file_operation(format!("写入文件失败: {e}"))
                        );
                        return Ok(ApiResponse::respond(
                            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                            ErrorCode::FileUploadFailed,
                            "Failed to store file",
                        ));
                    }
                }

                if first_chunk {
                    discard(&file);
                    return Ok(ApiResponse::bad_request(
                        ErrorCode::FileUploadFailed,
                        "Uploaded file is empty",
                    ));
                }
                file.size = total_size as i64;
                stored = Some(file);
            }
            _ => {}
        }
    }

    let Some(file) = stored else {
        return Ok(ApiResponse::bad_request(
            ErrorCode::FileNotFound,
            "No file found in upload payload",
        ));
    };

    // 附件归属：两个字段要么都给，要么都不给
    let owner = match (entity_type_raw.as_deref(), entity_id_raw.as_deref()) {
        (None, None) => None,
        (Some(kind), Some(id)) => match (kind.parse::<NoteEntityType>(), id.parse::<i64>()) {
            (Ok(kind), Ok(id)) if id > 0 => Some((kind, id)),
            _ => {
                discard(&file);
                return Ok(ApiResponse::bad_request(
                    ErrorCode::BadRequest,
                    "Invalid entity_type or entity_id",
                ));
            }
        },
        _ => {
            discard(&file);
            return Ok(ApiResponse::bad_request(
                ErrorCode::BadRequest,
                "entity_type and entity_id must be provided together",
            ));
        }
    };

    let storage = service.get_storage(req)?;

    if let Some((kind, id)) = owner
        && let Err(resp) = check_entity_exists(storage.as_ref(), kind, id).await
    {
        discard(&file);
        return Ok(resp);
    }

    let attachment = Attachment {
        download_token: Uuid::new_v4().to_string(),
        original_name: file.original_name.clone(),
        stored_name: file.stored_name.clone(),
        file_size: file.size,
        content_type: crate::utils::content_type_for(&file.extension).to_string(),
        entity_type: owner.map(|(kind, _)| kind),
        entity_id: owner.map(|(_, id)| id),
        uploaded_by: user.id,
        created_at: chrono::Utc::now(),
    };

    match storage.create_attachment(attachment).await {
        Ok(attachment) => {
            tracing::info!(
                "{} uploaded {} ({} bytes)",
                user.username,
                attachment.original_name,
                attachment.file_size
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                attachment,
                "File uploaded successfully",
            )))
        }
        Err(e) => {
            discard(&file);
            Ok(storage_failure("Save attachment", &e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("IMG_0001.HEIC"), ".heic");
        assert_eq!(extension_of("bon.pdf"), ".pdf");
        assert_eq!(extension_of("README"), "");
    }
}
