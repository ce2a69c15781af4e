use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{Resume, ResumePatch};
use crate::resumes::store::{check_expected_version, ResumeStore};

/// In-memory store for handler and service tests.
#[derive(Default)]
pub struct MemoryResumeStore {
    resumes: Mutex<HashMap<Uuid, Resume>>,
}

impl MemoryResumeStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Resume>> {
        self.resumes.lock().unwrap()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn get_raw(&self, id: Uuid) -> Option<Resume> {
        self.lock().get(&id).cloned()
    }
}

#[async_trait]
impl ResumeStore for MemoryResumeStore {
    async fn insert(&self, resume: &Resume) -> Result<(), AppError> {
        self.lock().insert(resume.id, resume.clone());
        Ok(())
    }

    async fn find_owned(&self, owner: Uuid, id: Uuid) -> Result<Option<Resume>, AppError> {
        Ok(self
            .lock()
            .get(&id)
            .filter(|r| r.user_id == owner)
            .cloned())
    }

    async fn find_public(&self, id: Uuid) -> Result<Option<Resume>, AppError> {
        Ok(self.lock().get(&id).filter(|r| r.public).cloned())
    }

    async fn update_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: ResumePatch,
        expected_version: Option<i32>,
    ) -> Result<Option<Resume>, AppError> {
        let mut resumes = self.lock();
        let Some(resume) = resumes.get_mut(&id).filter(|r| r.user_id == owner) else {
            return Ok(None);
        };
        check_expected_version(resume.version, expected_version)?;
        patch.apply_to(resume, Utc::now());
        Ok(Some(resume.clone()))
    }

    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut resumes = self.lock();
        if resumes.get(&id).is_some_and(|r| r.user_id == owner) {
            resumes.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
