//! Google Drive 远端存储：抽象接口、REST 客户端与 OAuth 令牌。

mod auth;
mod client;
#[cfg(test)]
pub(crate) mod memory;
mod query;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;

pub use auth::{OAuthCredentials, TokenError, TokenSource};
pub use client::{DriveClient, DriveError};

pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DriveFile {
    pub id: String,
}

/// 单次请求内持有的上传文件。
#[derive(Debug, Clone)]
pub struct NewFile {
    pub name: String,
    pub mime_type: String,
    pub data: Bytes,
}

/// 远端存储操作。所有操作都支持共享盘（shared drives）。
#[async_trait]
pub trait DriveStore: Send + Sync {
    /// 列出父目录下同名、未删除的文件夹，最早创建的排在最前。
    async fn find_folders(
        &self,
        folder_name: &str,
        parent_id: &str,
    ) -> Result<Vec<DriveFile>, DriveError>;

    async fn create_folder(&self, folder_name: &str, parent_id: &str)
    -> Result<DriveFile, DriveError>;

    async fn upload_file(&self, file: NewFile, parent_id: &str) -> Result<DriveFile, DriveError>;

    /// 授予 "anyone with link" 只读权限。
    async fn share_with_anyone(&self, file_id: &str) -> Result<(), DriveError>;

    async fn delete_file(&self, file_id: &str) -> Result<(), DriveError>;
}
