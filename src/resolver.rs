//! 虚拟路径到 Drive 文件夹链的解析（按需创建）。

use tracing::{debug, info};

use crate::drive::{DriveError, DriveStore};

/// 按 `/` 切分路径并丢弃空段。
pub fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// 返回父目录下同名文件夹的 ID，不存在时创建。
///
/// 存在多个同名文件夹时取列表中的第一个（最早创建）。
pub async fn ensure_folder_exists(
    drive: &dyn DriveStore,
    folder_name: &str,
    parent_id: &str,
) -> Result<String, DriveError> {
    let existing = drive.find_folders(folder_name, parent_id).await?;
    if let Some(folder) = existing.into_iter().next() {
        debug!(folder = folder_name, parent = parent_id, id = %folder.id, "folder exists");
        return Ok(folder.id);
    }

    let created = drive.create_folder(folder_name, parent_id).await?;
    info!(folder = folder_name, parent = parent_id, id = %created.id, "created folder");
    Ok(created.id)
}

/// 从 `root_id` 开始逐段解析路径，返回最深一级文件夹的 ID。
///
/// 每一段依赖上一段的结果，因此严格顺序执行；首个错误直接返回，已创建的文件夹保留。
pub async fn resolve_folder_path(
    drive: &dyn DriveStore,
    path: &str,
    root_id: &str,
) -> Result<String, DriveError> {
    let mut current = root_id.to_string();
    for segment in path_segments(path) {
        current = ensure_folder_exists(drive, segment, &current).await?;
    }
    Ok(current)
}
