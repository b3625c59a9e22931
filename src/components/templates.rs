use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use crate::errors::WikiError;
use crate::types::Page;
use crate::utils::{escape_html, last_modified_html};

/// Turns a page into a complete response body.
///
/// Implementations return either the whole document or an error, never a
/// partial one.
pub trait Renderer: Send + Sync {
    fn render(&self, template: TemplateName, page: &Page) -> Result<Vec<u8>, WikiError>;
}

/// Templates the handlers know how to ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateName {
    View,
    Edit,
}

impl TemplateName {
    pub const ALL: [TemplateName; 2] = [TemplateName::View, TemplateName::Edit];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateName::View => "view",
            TemplateName::Edit => "edit",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.html", self.as_str())
    }

    fn builtin_source(&self) -> &'static str {
        match self {
            TemplateName::View => BUILTIN_VIEW,
            TemplateName::Edit => BUILTIN_EDIT,
        }
    }
}

const BUILTIN_VIEW: &str = "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\"><meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"><title>{{TITLE}}</title></head><body><h1>{{TITLE}}</h1><p>[<a href=\"/edit/{{TITLE}}\">edit</a>]</p>{{MODIFIED}}<div class=\"page-body\">{{BODY}}</div></body></html>";

const BUILTIN_EDIT: &str = "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\"><meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"><title>Editing {{TITLE}}</title></head><body><h1>Editing {{TITLE}}</h1><form action=\"/save/{{TITLE}}\" method=\"POST\"><div><textarea name=\"body\" rows=\"20\" cols=\"80\">\n{{BODY}}</textarea></div><div><input type=\"submit\" value=\"Save\"></div></form></body></html>";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Title,
    Body,
    Modified,
}

/// A template compiled into literal text and placeholders.
///
/// Recognized placeholders are `{{TITLE}}`, `{{BODY}}` and `{{MODIFIED}}`.
#[derive(Debug, Clone)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn compile(source: &str) -> Result<Self, WikiError> {
        let mut segments = Vec::new();
        let mut rest = source;

        while let Some(open) = rest.find("{{") {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after = &rest[open + 2..];
            let close = after
                .find("}}")
                .ok_or_else(|| WikiError::Template("unterminated placeholder".to_string()))?;
            let segment = match after[..close].trim() {
                "TITLE" => Segment::Title,
                "BODY" => Segment::Body,
                "MODIFIED" => Segment::Modified,
                other => {
                    return Err(WikiError::Template(format!("unknown placeholder {{{{{}}}}}", other)));
                }
            };
            segments.push(segment);
            rest = &after[close + 2..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self { segments })
    }

    pub fn render(&self, page: &Page) -> String {
        let title = escape_html(page.title.as_str());
        let body = escape_html(&page.body_text());
        let modified = page.modified.map(last_modified_html).unwrap_or_default();

        let mut out = String::with_capacity(page.body.len() + 512);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Title => out.push_str(&title),
                Segment::Body => out.push_str(&body),
                Segment::Modified => out.push_str(&modified),
            }
        }
        out
    }
}

/// The compiled templates, read-only once built
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: HashMap<TemplateName, Template>,
}

impl TemplateSet {
    /// An empty set, every render fails until templates are added
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in view and edit templates
    pub fn builtin() -> Result<Self, WikiError> {
        let mut set = Self::new();
        for name in TemplateName::ALL {
            set = set.with_template(name, name.builtin_source())?;
        }
        Ok(set)
    }

    /// Load `view.html` and `edit.html` from `dir`, using the built-in
    /// template for any file that is absent.
    pub fn load(dir: &Path) -> Result<Self, WikiError> {
        let mut set = Self::new();
        for name in TemplateName::ALL {
            let path = dir.join(name.file_name());
            let source = match fs::read_to_string(&path) {
                Ok(source) => {
                    log::info!("Loaded template {:?}", path);
                    source
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    log::warn!("Template {:?} not found, using built-in {}", path, name.as_str());
                    name.builtin_source().to_string()
                }
                Err(e) => {
                    log::error!("Failed to read template {:?}: {}", path, e);
                    return Err(WikiError::Io(e));
                }
            };
            set = set.with_template(name, &source).map_err(|e| {
                log::error!("Invalid template {:?}: {}", path, e);
                e
            })?;
        }
        Ok(set)
    }

    /// Compile `source` and register it under `name`
    pub fn with_template(mut self, name: TemplateName, source: &str) -> Result<Self, WikiError> {
        self.templates.insert(name, Template::compile(source)?);
        Ok(self)
    }
}

impl Renderer for TemplateSet {
    fn render(&self, template: TemplateName, page: &Page) -> Result<Vec<u8>, WikiError> {
        let compiled = self.templates.get(&template).ok_or_else(|| {
            WikiError::Template(format!("no template named {}", template.as_str()))
        })?;
        Ok(compiled.render(page).into_bytes())
    }
}
