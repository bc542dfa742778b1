use std::fs::File;
use std::io::{BufRead, BufReader};

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::models::errors::SchemaError;

const BUFFER_SIZE: usize = 32 * 1024;

/// Location of the schema description used to resolve envelopes.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SchemaResource {
    /// Storage type: inline or file
    storage: StorageType,

    /// Schema text when stored inline
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<Box<[u8]>>,

    /// Path of an on-disk schema
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<Box<str>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub enum StorageType {
    Inline,
    File,
}

impl SchemaResource {
    pub fn inline<B: Into<Vec<u8>>>(content: B) -> Self {
        Self {
            storage: StorageType::Inline,
            content: Some(content.into().into_boxed_slice()),
            path: None,
        }
    }

    pub fn file<S: Into<Box<str>>>(path: S) -> Self {
        Self {
            storage: StorageType::File,
            content: None,
            path: Some(path.into()),
        }
    }

    pub fn storage(&self) -> StorageType {
        self.storage
    }

    pub fn content(&self) -> Option<&[u8]> {
        self.content.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn locator(&self) -> String {
        match (self.path(), self.content()) {
            (Some(path), _) => path.to_string(),
            (None, Some(content)) => format!("<inline {} bytes>", content.len()),
            (None, None) => "<empty>".to_string(),
        }
    }

    /// Opens a fresh buffered reader over the schema text.
    pub fn open(&self) -> Result<Box<dyn BufRead + '_>, SchemaError> {
        if let Some(content) = self.content() {
            debug!(size = content.len(), "Using inline schema");
            Ok(Box::new(BufReader::with_capacity(BUFFER_SIZE, content)))
        } else if let Some(path) = self.path() {
            debug!(path = %path, "Opening schema file");
            let file = File::open(path).map_err(|e| {
                error!(error = %e, path = %path, "Failed to open schema");
                SchemaError::Unreadable(e)
            })?;
            Ok(Box::new(BufReader::with_capacity(BUFFER_SIZE, file)))
        } else {
            error!("No schema content or path provided");
            Err(SchemaError::Unreadable(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no schema content or path provided",
            )))
        }
    }
}
