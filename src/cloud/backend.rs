use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::error::Result;

/// A signed-in account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    /// Backend-assigned user id
    pub uid: String,
    pub email: String,
}

/// Metadata document fields
pub type Document = BTreeMap<String, String>;

/// Auth, document store and blob store of a cloud provider.
///
/// Errors: `Error::Auth` for refused credentials, `Error::Remote` for
/// everything else.
#[async_trait]
pub trait CloudBackend: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserSession>;

    async fn create_account(&self, email: &str, password: &str) -> Result<UserSession>;

    /// Store `bytes` at `path`, replacing any previous blob
    async fn put_blob(&self, path: &str, bytes: Vec<u8>) -> Result<()>;

    async fn get_blob(&self, path: &str) -> Result<Vec<u8>>;

    /// Create or replace document `id` in `collection`
    async fn put_document(&self, collection: &str, id: &str, fields: Document) -> Result<()>;

    /// Every `(id, fields)` in `collection`, ordered by id
    async fn list_documents(&self, collection: &str) -> Result<Vec<(String, Document)>>;
}
