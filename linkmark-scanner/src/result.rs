use serde::{Deserialize, Serialize};

/// Page metadata gathered for a single bookmark.
///
/// Title and description keep the first value offered; the favicon keeps
/// the last one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub favicon_url: Option<String>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offer_title(&mut self, value: &str) {
        if self.title.is_none() && !value.is_empty() {
            self.title = Some(value.to_string());
        }
    }

    pub fn offer_description(&mut self, value: &str) {
        if self.description.is_none() && !value.is_empty() {
            self.description = Some(value.to_string());
        }
    }

    pub fn set_favicon(&mut self, url: String) {
        self.favicon_url = Some(url);
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.favicon_url.is_none()
    }
}
