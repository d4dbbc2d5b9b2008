//! 测试用的内存 Drive 实现。

use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Mutex;

use super::{DriveError, DriveFile, DriveStore, NewFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FindFolders,
    CreateFolder,
    UploadFile,
    ShareWithAnyone,
    DeleteFile,
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub id: String,
    pub name: String,
    pub parent_id: String,
    pub is_folder: bool,
    pub mime_type: Option<String>,
    pub size: usize,
    pub public: bool,
}

#[derive(Default)]
struct State {
    next_id: u64,
    entries: Vec<Entry>,
    folder_creations: Vec<(String, String)>,
    lookups: usize,
}

#[derive(Default)]
pub struct MemoryDrive {
    state: Mutex<State>,
    failure: Option<(Operation, String)>,
}

impl MemoryDrive {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定操作总是以给定消息失败。
    pub fn failing(operation: Operation, message: &str) -> Self {
        Self {
            failure: Some((operation, message.to_string())),
            ..Self::default()
        }
    }

    /// 预置文件夹，不计入创建调用。
    pub fn seed_folder(&self, name: &str, parent_id: &str) -> String {
        let mut state = self.state.lock().expect("memory drive lock");
        insert(&mut state, name, parent_id, None, 0)
    }

    pub fn folder_creations(&self) -> Vec<(String, String)> {
        self.state
            .lock()
            .expect("memory drive lock")
            .folder_creations
            .clone()
    }

    pub fn lookups(&self) -> usize {
        self.state.lock().expect("memory drive lock").lookups
    }

    pub fn entry(&self, id: &str) -> Option<Entry> {
        self.state
            .lock()
            .expect("memory drive lock")
            .entries
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
    }

    pub fn files(&self) -> Vec<Entry> {
        self.state
            .lock()
            .expect("memory drive lock")
            .entries
            .iter()
            .filter(|entry| !entry.is_folder)
            .cloned()
            .collect()
    }

    fn check(&self, operation: Operation) -> Result<(), DriveError> {
        match &self.failure {
            Some((failing, message)) if *failing == operation => Err(DriveError::Api {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: message.clone(),
            }),
            _ => Ok(()),
        }
    }
}

fn insert(
    state: &mut State,
    name: &str,
    parent_id: &str,
    mime_type: Option<String>,
    size: usize,
) -> String {
    state.next_id += 1;
    let is_folder = mime_type.is_none();
    let prefix = if is_folder { "folder" } else { "file" };
    let id = format!("{prefix}-{}", state.next_id);
    state.entries.push(Entry {
        id: id.clone(),
        name: name.to_string(),
        parent_id: parent_id.to_string(),
        is_folder,
        mime_type,
        size,
        public: false,
    });
    id
}

#[async_trait]
impl DriveStore for MemoryDrive {
    async fn find_folders(
        &self,
        folder_name: &str,
        parent_id: &str,
    ) -> Result<Vec<DriveFile>, DriveError> {
        self.check(Operation::FindFolders)?;
        let mut state = self.state.lock().expect("memory drive lock");
        state.lookups += 1;
        Ok(state
            .entries
            .iter()
            .filter(|entry| {
                entry.is_folder && entry.name == folder_name && entry.parent_id == parent_id
            })
            .map(|entry| DriveFile {
                id: entry.id.clone(),
            })
            .collect())
    }

    async fn create_folder(
        &self,
        folder_name: &str,
        parent_id: &str,
    ) -> Result<DriveFile, DriveError> {
        self.check(Operation::CreateFolder)?;
        let mut state = self.state.lock().expect("memory drive lock");
        state
            .folder_creations
            .push((folder_name.to_string(), parent_id.to_string()));
        let id = insert(&mut state, folder_name, parent_id, None, 0);
        Ok(DriveFile { id })
    }

    async fn upload_file(&self, file: NewFile, parent_id: &str) -> Result<DriveFile, DriveError> {
        self.check(Operation::UploadFile)?;
        let mut state = self.state.lock().expect("memory drive lock");
        let id = insert(
            &mut state,
            &file.name,
            parent_id,
            Some(file.mime_type),
            file.data.len(),
        );
        Ok(DriveFile { id })
    }

    async fn share_with_anyone(&self, file_id: &str) -> Result<(), DriveError> {
        self.check(Operation::ShareWithAnyone)?;
        let mut state = self.state.lock().expect("memory drive lock");
        match state.entries.iter_mut().find(|entry| entry.id == file_id) {
            Some(entry) => {
                entry.public = true;
                Ok(())
            }
            None => Err(not_found(file_id)),
        }
    }

    async fn delete_file(&self, file_id: &str) -> Result<(), DriveError> {
        self.check(Operation::DeleteFile)?;
        let mut state = self.state.lock().expect("memory drive lock");
        let before = state.entries.len();
        state.entries.retain(|entry| entry.id != file_id);
        if state.entries.len() == before {
            return Err(not_found(file_id));
        }
        Ok(())
    }
}

fn not_found(file_id: &str) -> DriveError {
    DriveError::Api {
        status: StatusCode::NOT_FOUND,
        message: format!("File not found: {file_id}."),
    }
}
