use std::sync::{Mutex, PoisonError};

use super::backend::{CloudBackend, Document, UserSession};
use crate::codec;
use crate::error::{Error, Result};
use crate::state::data::Drawing;

/// A drawing fetched from the cloud
#[derive(Debug, Clone, PartialEq)]
pub struct CloudDrawing {
    /// Document id the drawing was uploaded under
    pub remote_id: String,
    /// Decoded drawing; `id` is `None` since it is not in the local store
    pub drawing: Drawing,
}

/// Blob path for a user's drawing
pub fn blob_path(username: &str, drawing_id: &str) -> String {
    format!("drawings/{username}/{drawing_id}.json")
}

/// Metadata collection holding a user's drawings
pub fn collection_name(username: &str) -> String {
    format!("{username}.drawings")
}

/// Uploads and downloads drawings for the signed-in user.
pub struct CloudSync<B: CloudBackend> {
    backend: B,
    session: Mutex<Option<UserSession>>,
}

impl<B: CloudBackend> CloudSync<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            session: Mutex::new(None),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn current_user(&self) -> Option<UserSession> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_session(&self, session: Option<UserSession>) {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = session;
    }

    /// Sign in; `false` (and a log entry) when the backend refuses.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        match self.backend.sign_in(email, password).await {
            Ok(session) => {
                log::info!("Signed in as {}", session.email);
                self.set_session(Some(session));
                true
            }
            Err(e) => {
                log::error!("Log in failed: {}", e);
                false
            }
        }
    }

    /// Create an account and sign into it; `false` when the backend refuses.
    pub async fn create_user(&self, email: &str, password: &str) -> bool {
        match self.backend.create_account(email, password).await {
            Ok(session) => {
                log::info!("Created account {}", session.email);
                self.set_session(Some(session));
                true
            }
            Err(e) => {
                log::error!("Failed to create user: {}", e);
                false
            }
        }
    }

    pub fn sign_out(&self) {
        self.set_session(None);
    }

    /// Upload a serialized payload as `drawing_id`: the blob first, then the
    /// metadata document pointing at it.
    pub async fn upload_payload(
        &self,
        username: &str,
        drawing_id: &str,
        payload: &str,
    ) -> Result<()> {
        self.upload(username, drawing_id, payload, Document::new()).await
    }

    /// Serialize and upload a locally saved drawing, with its name and author.
    pub async fn upload_drawing(&self, username: &str, drawing: &Drawing, step: f32) -> Result<()> {
        let id = drawing.id.ok_or(Error::NotPersisted)?;
        let payload = codec::encode_drawing(drawing, step)?;
        let mut extra = Document::new();
        extra.insert("name".into(), drawing.name.clone());
        extra.insert("author".into(), drawing.author.clone());
        self.upload(username, &id.to_string(), &payload, extra).await
    }

    async fn upload(
        &self,
        username: &str,
        drawing_id: &str,
        payload: &str,
        mut fields: Document,
    ) -> Result<()> {
        let Some(session) = self.current_user() else {
            log::error!("Upload of drawing {} refused: user is not authenticated", drawing_id);
            return Err(Error::NotSignedIn);
        };

        let path = blob_path(username, drawing_id);
        if let Err(e) = self.backend.put_blob(&path, payload.as_bytes().to_vec()).await {
            log::error!("Failed to upload drawing {} to the cloud: {}", drawing_id, e);
            return Err(e);
        }
        log::debug!("Uploaded drawing blob {}", path);

        fields.insert("author_uid".into(), session.uid);
        fields.insert("path".into(), path);
        if let Err(e) = self
            .backend
            .put_document(&collection_name(username), drawing_id, fields)
            .await
        {
            log::error!("Failed to store reference for drawing {}: {}", drawing_id, e);
            return Err(e);
        }
        log::info!("Uploaded drawing {} for {}", drawing_id, username);
        Ok(())
    }

    /// Fetch and decode every drawing `username` has uploaded.
    ///
    /// Listing failures are returned; a drawing whose document, blob or payload
    /// is bad is logged and left out.
    pub async fn download(&self, username: &str) -> Result<Vec<CloudDrawing>> {
        let documents = self
            .backend
            .list_documents(&collection_name(username))
            .await
            .map_err(|e| {
                log::error!("Failed to download {}'s drawings: {}", username, e);
                e
            })?;

        let mut drawings = Vec::with_capacity(documents.len());
        for (remote_id, doc) in documents {
            match self.fetch(username, &remote_id, &doc).await {
                Ok(drawing) => drawings.push(CloudDrawing { remote_id, drawing }),
                Err(e) => log::error!("Skipping cloud drawing {}/{}: {}", username, remote_id, e),
            }
        }
        log::info!("Downloaded {} drawings for {}", drawings.len(), username);
        Ok(drawings)
    }

    async fn fetch(&self, username: &str, remote_id: &str, doc: &Document) -> Result<Drawing> {
        let path = doc
            .get("path")
            .ok_or_else(|| Error::decode("drawing document", "missing \"path\" field"))?;
        let bytes = self.backend.get_blob(path).await?;
        let json = String::from_utf8(bytes).map_err(|e| Error::decode("drawing blob", e))?;

        let name = doc.get("name").map(String::as_str).unwrap_or(remote_id);
        let author = doc.get("author").map(String::as_str).unwrap_or(username);
        codec::decode_drawing(&json, None, name, author)
    }
}
