//! In-process cloud backend
//!
//! Keeps accounts, documents and blobs in memory. Used for offline mode and
//! as the backend in tests.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;

use super::backend::{CloudBackend, Document, UserSession};
use crate::error::{Error, Result};

/// Shortest password the backend accepts
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Default)]
struct Inner {
    /// email -> (password, uid)
    accounts: HashMap<String, (String, String)>,
    blobs: HashMap<String, Vec<u8>>,
    collections: HashMap<String, BTreeMap<String, Document>>,
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    inner: Mutex<Inner>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn blob_count(&self) -> usize {
        self.inner.lock().await.blobs.len()
    }
}

#[async_trait]
impl CloudBackend for MemoryBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserSession> {
        let inner = self.inner.lock().await;
        match inner.accounts.get(email) {
            Some((stored, uid)) if stored == password => Ok(UserSession {
                uid: uid.clone(),
                email: email.to_string(),
            }),
            _ => Err(Error::Auth(format!("invalid credentials for {email}"))),
        }
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<UserSession> {
        if !email.contains('@') {
            return Err(Error::Auth(format!("badly formatted email {email:?}")));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(Error::Auth(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let mut inner = self.inner.lock().await;
        if inner.accounts.contains_key(email) {
            return Err(Error::Auth(format!("{email} is already registered")));
        }
        let uid = format!("uid-{}", inner.accounts.len() + 1);
        inner
            .accounts
            .insert(email.to_string(), (password.to_string(), uid.clone()));
        Ok(UserSession {
            uid,
            email: email.to_string(),
        })
    }

    async fn put_blob(&self, path: &str, bytes: Vec<u8>) -> Result<()> {
        self.inner.lock().await.blobs.insert(path.to_string(), bytes);
        Ok(())
    }

    async fn get_blob(&self, path: &str) -> Result<Vec<u8>> {
        self.inner
            .lock()
            .await
            .blobs
            .get(path)
            .cloned()
            .ok_or_else(|| Error::Remote(format!("no blob at {path}")))
    }

    async fn put_document(&self, collection: &str, id: &str, fields: Document) -> Result<()> {
        self.inner
            .lock()
            .await
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
        Ok(())
    }

    async fn list_documents(&self, collection: &str) -> Result<Vec<(String, Document)>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .collections
            .get(collection)
            .map(|docs| docs.iter().map(|(id, doc)| (id.clone(), doc.clone())).collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_accounts() {
        let backend = MemoryBackend::new();
        let created = backend.create_account("a@b.c", "hunter22").await.unwrap();
        let signed_in = backend.sign_in("a@b.c", "hunter22").await.unwrap();
        assert_eq!(created, signed_in);

        assert!(matches!(backend.sign_in("a@b.c", "wrong").await, Err(Error::Auth(_))));
        assert!(backend.create_account("a@b.c", "hunter22").await.is_err());
        assert!(backend.create_account("nope", "hunter22").await.is_err());
        assert!(backend.create_account("x@y.z", "123").await.is_err());
    }

    #[tokio::test]
    async fn test_documents_and_blobs() {
        let backend = MemoryBackend::new();
        assert!(backend.list_documents("none").await.unwrap().is_empty());
        assert!(backend.get_blob("missing").await.is_err());

        backend.put_blob("p", b"data".to_vec()).await.unwrap();
        assert_eq!(backend.get_blob("p").await.unwrap(), b"data");

        let mut doc = Document::new();
        doc.insert("k".into(), "v".into());
        backend.put_document("c", "2", doc.clone()).await.unwrap();
        backend.put_document("c", "1", doc.clone()).await.unwrap();
        let ids: Vec<String> = backend
            .list_documents("c")
            .await
            .unwrap()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, ["1", "2"]);
    }
}
