use crate::model::{Heirloom, HeirloomId, HeirloomSummary};
use std::path::PathBuf;

pub mod create;
pub mod delete;
pub mod image;
pub mod list;
pub mod search;
pub mod update;
pub mod view;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_heirlooms: Vec<Heirloom>,
    pub listed_heirlooms: Vec<HeirloomSummary>,
    pub image_paths: Vec<PathBuf>,
    pub image: Option<Vec<u8>>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_heirlooms(mut self, heirlooms: Vec<Heirloom>) -> Self {
        self.affected_heirlooms = heirlooms;
        self
    }

    pub fn with_listed_heirlooms(mut self, summaries: Vec<HeirloomSummary>) -> Self {
        self.listed_heirlooms = summaries;
        self
    }

    pub fn with_image_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.image_paths = paths;
        self
    }

    pub fn with_image(mut self, image: Vec<u8>) -> Self {
        self.image = Some(image);
        self
    }
}

/// An edit request. `image: None` (or empty) keeps the stored image.
#[derive(Debug, Clone)]
pub struct HeirloomUpdate {
    pub id: HeirloomId,
    pub description: String,
    pub image: Option<Vec<u8>>,
}

impl HeirloomUpdate {
    pub fn new(id: HeirloomId, description: String, image: Option<Vec<u8>>) -> Self {
        Self {
            id,
            description,
            image,
        }
    }
}
