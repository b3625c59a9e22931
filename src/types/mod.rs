use std::borrow::Cow;
use std::sync::Arc;

use percent_encoding::percent_decode;
use time::OffsetDateTime;

use crate::components::{Renderer, TemplateSet};
use crate::config::Config;
use crate::errors::WikiError;
use crate::routing::Title;
use crate::services::PageStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: PageStore,
    pub renderer: Arc<dyn Renderer>,
    pub front_page: Title,
}

impl AppState {
    pub fn new(store: PageStore, renderer: Arc<dyn Renderer>, front_page: Title) -> Self {
        Self { store, renderer, front_page }
    }

    /// Build the state from startup configuration: opens the pages
    /// directory and compiles the templates once.
    pub fn from_config(config: &Config) -> Result<Self, WikiError> {
        let store = PageStore::open(config.pages_dir.as_ref().clone())?;
        let templates = TemplateSet::load(&config.templates_dir)?;
        Ok(Self::new(store, Arc::new(templates), config.front_page.clone()))
    }
}

/// A page as held for the length of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: Title,
    pub body: Vec<u8>,
    /// Modification time of the backing file, when loaded from disk
    pub modified: Option<OffsetDateTime>,
}

impl Page {
    pub fn new(title: Title, body: Vec<u8>) -> Self {
        Self { title, body, modified: None }
    }

    /// A page with no content yet
    pub fn blank(title: Title) -> Self {
        Self::new(title, Vec::new())
    }

    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Form submitted by the edit page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveForm {
    /// Decoded `body` field, byte for byte
    pub body: Vec<u8>,
}

impl SaveForm {
    /// Decode an `application/x-www-form-urlencoded` payload.
    ///
    /// Escapes are decoded to raw bytes with no UTF-8 step, so a body that
    /// is not text survives intact. Only the first `body` field counts, and
    /// a payload without one is an empty body.
    pub fn from_urlencoded(raw: &[u8]) -> Self {
        let body = raw
            .split(|b| *b == b'&')
            .filter(|pair| !pair.is_empty())
            .find_map(|pair| {
                let (key, value) = match pair.iter().position(|b| *b == b'=') {
                    Some(eq) => (&pair[..eq], &pair[eq + 1..]),
                    None => (pair, &pair[pair.len()..]),
                };
                (decode_component(key) == b"body").then(|| decode_component(value))
            })
            .unwrap_or_default();
        Self { body }
    }
}

fn decode_component(raw: &[u8]) -> Vec<u8> {
    let spaced: Vec<u8> = raw.iter().map(|b| if *b == b'+' { b' ' } else { *b }).collect();
    percent_decode(&spaced).collect()
}
