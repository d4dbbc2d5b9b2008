//! 上传与删除处理器：把请求转发到 Drive。

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Extension, Multipart};
use axum::response::Json as JsonResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::{FILE_FIELD, PATH_FIELD};
use crate::drive::{DriveError, DriveStore, NewFile};
use crate::error::{ApiError, FILE_TOO_LARGE, FlaggedError};
use crate::resolver::resolve_folder_path;

pub const MISSING_UPLOAD_FIELDS: &str = "Missing file or path";
pub const MISSING_FILE_ID: &str = "No file ID provided";

#[derive(Debug)]
pub struct TransferConfig {
    pub root_folder_id: String,
    pub max_file_size: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    success: bool,
    file_id: String,
    web_view_link: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    success: bool,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DeleteRequest {
    #[serde(default)]
    id: Option<Value>,
}

impl DeleteRequest {
    /// 任何真值 ID 都转换为字符串；空串、0、false、null 视为缺失。
    fn file_id(self) -> Option<String> {
        match self.id? {
            Value::String(id) if !id.is_empty() => Some(id),
            Value::Number(id) if id.as_f64().is_some_and(|n| n != 0.0) => Some(id.to_string()),
            Value::Bool(true) => Some("true".to_string()),
            _ => None,
        }
    }
}

#[derive(Default)]
struct UploadForm {
    file: Option<NewFile>,
    path: Option<String>,
}

/// 文件的公开查看链接。
pub fn web_view_link(file_id: &str) -> String {
    format!("https://drive.google.com/file/d/{file_id}/view")
}

/// 上传文件到指定虚拟路径并公开分享。
pub async fn upload_file(
    Extension(drive): Extension<Arc<dyn DriveStore>>,
    Extension(transfer): Extension<Arc<TransferConfig>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<JsonResponse<UploadResponse>, ApiError> {
    // 非 multipart 请求体中不可能有文件
    let Ok(multipart) = multipart else {
        return Err(ApiError::BadRequest(MISSING_UPLOAD_FIELDS.into()));
    };
    let form = read_upload_form(multipart, transfer.max_file_size).await?;
    let (Some(file), Some(path)) = (form.file, form.path.filter(|path| !path.is_empty())) else {
        return Err(ApiError::BadRequest(MISSING_UPLOAD_FIELDS.into()));
    };

    let name = file.name.clone();
    let size = file.data.len();
    let file_id = store_file(drive.as_ref(), &transfer.root_folder_id, &path, file)
        .await
        .map_err(|err| {
            error!(path, name, error = %err, "upload failed");
            ApiError::from(err)
        })?;

    info!(path, name, size, file_id, "uploaded file");
    Ok(JsonResponse(UploadResponse {
        success: true,
        web_view_link: web_view_link(&file_id),
        file_id,
    }))
}

/// 按 ID 删除文件。
pub async fn delete_file(
    Extension(drive): Extension<Arc<dyn DriveStore>>,
    body: Bytes,
) -> Result<JsonResponse<DeleteResponse>, FlaggedError> {
    let request: DeleteRequest = serde_json::from_slice(&body).unwrap_or_default();
    let Some(id) = request.file_id() else {
        return Err(ApiError::BadRequest(MISSING_FILE_ID.into()).into());
    };

    drive.delete_file(&id).await.map_err(|err| {
        error!(file_id = id, error = %err, "delete failed");
        FlaggedError::from(ApiError::from(err))
    })?;

    info!(file_id = id, "deleted file");
    Ok(JsonResponse(DeleteResponse { success: true }))
}

/// 解析路径、上传内容并设置公开权限。任何一步失败都不回滚。
async fn store_file(
    drive: &dyn DriveStore,
    root_id: &str,
    path: &str,
    file: NewFile,
) -> Result<String, DriveError> {
    let folder_id = resolve_folder_path(drive, path, root_id).await?;
    let uploaded = drive.upload_file(file, &folder_id).await?;
    drive.share_with_anyone(&uploaded.id).await?;
    Ok(uploaded.id)
}

/// 读取 `file` 与 `path` 字段，其他字段忽略。
async fn read_upload_form(
    mut multipart: Multipart,
    max_file_size: usize,
) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some(FILE_FIELD) => {
                // 没有文件名的 `file` 字段是普通文本字段
                let Some(name) = field.file_name().map(str::to_string) else {
                    continue;
                };
                let mime_type = match field.content_type() {
                    Some(mime) => mime.to_string(),
                    None => mime_guess::from_path(&name)
                        .first_or_octet_stream()
                        .essence_str()
                        .to_string(),
                };
                let data = field.bytes().await?;
                if data.len() > max_file_size {
                    return Err(ApiError::PayloadTooLarge(FILE_TOO_LARGE.into()));
                }
                form.file = Some(NewFile {
                    name,
                    mime_type,
                    data,
                });
            }
            Some(PATH_FIELD) => form.path = Some(field.text().await?),
            _ => {}
        }
    }
    Ok(form)
}
