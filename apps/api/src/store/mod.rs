#![allow(dead_code)]

//! In-memory session store.
//!
//! Sessions are keyed by generated UUIDs. The map itself sits behind a
//! `RwLock` held only for lookup/insert/remove; each session carries its
//! own async `Mutex`, so concurrent read-modify-write against the same
//! session serializes on that session's lock instead of racing.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::evaluation::{PlacementFeedback, TechnicalEvaluationResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub created_at: DateTime<Utc>,
    pub metadata: Value,
    pub questions: Vec<String>,
    pub answers: Vec<String>,
    pub transcript: String,
    pub cs_score: Option<f64>,
    pub tcs_result: Option<TechnicalEvaluationResult>,
    pub final_score: Option<f64>,
    pub placement_feedback: Option<PlacementFeedback>,
}

impl Session {
    fn new(metadata: Value) -> Self {
        Self {
            created_at: Utc::now(),
            metadata,
            questions: Vec::new(),
            answers: Vec::new(),
            transcript: String::new(),
            cs_score: None,
            tcs_result: None,
            final_score: None,
            placement_feedback: None,
        }
    }
}

#[derive(Default)]
pub struct SessionStore {
    inner: RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, metadata: Value) -> Uuid {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(Session::new(metadata)));
        self.inner
            .write()
            .expect("session map lock poisoned")
            .insert(id, session);
        id
    }

    /// Clones the session handle under a short-lived read lock; the map
    /// lock is never held across an await point.
    fn entry(&self, id: Uuid) -> Result<Arc<Mutex<Session>>, AppError> {
        self.inner
            .read()
            .expect("session map lock poisoned")
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    pub async fn snapshot(&self, id: Uuid) -> Result<Session, AppError> {
        let entry = self.entry(id)?;
        let session = entry.lock().await;
        Ok(session.clone())
    }

    /// Runs `mutate` under the session's own lock.
    pub async fn update<F>(&self, id: Uuid, mutate: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut Session),
    {
        let entry = self.entry(id)?;
        let mut session = entry.lock().await;
        mutate(&mut session);
        Ok(())
    }

    pub async fn append_question(&self, id: Uuid, question: String) -> Result<(), AppError> {
        self.update(id, |s| s.questions.push(question)).await
    }

    pub async fn append_answer(&self, id: Uuid, answer: String) -> Result<(), AppError> {
        self.update(id, |s| s.answers.push(answer)).await
    }

    pub fn remove(&self, id: Uuid) -> bool {
        self.inner
            .write()
            .expect("session map lock poisoned")
            .remove(&id)
            .is_some()
    }
}
