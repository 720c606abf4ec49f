//! Descriptive text built from a book before it is embedded.

use std::error::Error as _;
use std::fmt;

use bookshelf_catalog::{Book, EmbeddingSlot};
use tera::{Context, Tera};
use tracing::error;

use crate::error::{Result, SearchError};

/// Default template, matching how books have always been described.
pub const DEFAULT_TEMPLATE: &str = "{{ title }} by {{ author }}. {{ pages }} pages.";

const TEMPLATE_NAME: &str = "description";

/// A Tera template rendered with `title`, `author`, `pages` and `id`.
///
/// The source is compiled once. Rendering depends on nothing but the book's
/// current fields, so an unchanged book always produces the same embedding
/// input.
#[derive(Debug, Clone)]
pub struct DescriptionTemplate {
    source: String,
    tera: Tera,
}

impl DescriptionTemplate {
    /// Compile a template.
    ///
    /// Syntax errors, variables other than the four book fields, and
    /// templates that render the same text for every book are rejected.
    pub fn parse(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, &source)
            .map_err(|e| SearchError::Config(format!("invalid template: {}", chain(&e))))?;

        let template = Self { source, tera };
        let first = template.render(&sample(1, "A", "B"))?;
        let second = template.render(&sample(2, "C", "D"))?;
        if first == second {
            return Err(SearchError::Config(
                "template must reference at least one book field".to_string(),
            ));
        }
        Ok(template)
    }

    /// Render the text for a book.
    pub fn render(&self, book: &Book) -> Result<String> {
        let mut context = Context::new();
        context.insert("id", &book.id);
        context.insert("title", &book.title);
        context.insert("author", &book.author);
        context.insert("pages", &book.pages);

        self.tera
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| SearchError::Config(format!("cannot render template: {}", chain(&e))))
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for DescriptionTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for DescriptionTemplate {}

impl Default for DescriptionTemplate {
    fn default() -> Self {
        Self::parse(DEFAULT_TEMPLATE).unwrap_or_else(|e| {
            error!("Built-in description template failed to compile: {e}");
            Self {
                source: DEFAULT_TEMPLATE.to_string(),
                tera: Tera::default(),
            }
        })
    }
}

impl fmt::Display for DescriptionTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Tera keeps the useful part of an error (which variable, which line) in
/// its source chain.
fn chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn sample(pages: i32, title: &str, author: &str) -> Book {
    Book {
        id: i64::from(pages),
        title: title.to_string(),
        author: author.to_string(),
        pages,
        embedding: EmbeddingSlot::Absent,
        summary: None,
    }
}
