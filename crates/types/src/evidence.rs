use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A documented piece of proof. The index order of these items is authoritative
/// for appendix part assignment and citation text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceItem {
    pub id: String,
    /// Display code assigned by the caller (e.g. `B-001`). Never recomputed here.
    pub evidence_code: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub source: Option<String>,
    pub image_url: Option<String>,
    pub attachment_id: Option<String>,
}

impl EvidenceItem {
    pub fn new(
        id: impl Into<String>,
        evidence_code: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            evidence_code: evidence_code.into(),
            title: title.into(),
            description: None,
            category: None,
            date: None,
            source: None,
            image_url: None,
            attachment_id: None,
        }
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The image URL, treating an empty string the same as an absent one.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttachmentKind {
    Pdf,
    Image,
    Other,
}

impl AttachmentKind {
    pub fn label(&self) -> &'static str {
        match self {
            AttachmentKind::Pdf => "PDF",
            AttachmentKind::Image => "Image",
            AttachmentKind::Other => "Other",
        }
    }
}

/// An externally stored file referenced by the report but never embedded in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    pub url: String,
    pub reference: Option<String>,
}
