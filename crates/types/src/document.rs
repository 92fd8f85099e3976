use crate::economy::{EconomyLine, EconomySummary};
use crate::evidence::{Attachment, EvidenceItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of report being produced. Only affects the header label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Project,
    LegalCase,
    Showcase,
    Rental,
    ProjectReport,
}

impl DocumentType {
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Project => "Project",
            DocumentType::LegalCase => "Legal case",
            DocumentType::Showcase => "Showcase",
            DocumentType::Rental => "Rental",
            DocumentType::ProjectReport => "Project report",
        }
    }
}

/// A party involved in the case (claimant, respondent, contractor, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub role: String,
    pub name: String,
    pub contact: Option<String>,
}

/// Header information printed at the top of every report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub document_type: DocumentType,
    /// Stable for the lifetime of one logical document; used to title and name appendix parts.
    pub case_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub responsible: String,
    #[serde(default)]
    pub parties: Vec<Party>,
    pub status: String,
    pub reference_id: String,
}

/// A node in the section tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Unique within a document. Lookups are depth-first, first match wins.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
    #[serde(default)]
    pub children: Vec<Section>,
}

impl Section {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            blocks: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_block(mut self, block: ContentBlock) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn with_child(mut self, child: Section) -> Self {
        self.children.push(child);
        self
    }

    /// Depth-first search (self first, then children in order) for a section by id.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Section> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }
}

/// A single piece of content inside a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ContentBlock {
    Paragraph {
        text: String,
    },
    Heading {
        text: String,
        level: u8,
    },
    Image {
        evidence_id: Option<String>,
        caption: String,
        image_url: String,
    },
    List {
        items: Vec<String>,
    },
}

impl ContentBlock {
    pub fn paragraph(text: impl Into<String>) -> Self {
        ContentBlock::Paragraph { text: text.into() }
    }

    pub fn heading(text: impl Into<String>, level: u8) -> Self {
        ContentBlock::Heading {
            text: text.into(),
            level,
        }
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ContentBlock::List {
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

/// The root of the model. Produced once per render and never mutated by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub metadata: DocumentMetadata,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub evidence_index: Vec<EvidenceItem>,
    #[serde(default)]
    pub economy_lines: Vec<EconomyLine>,
    #[serde(default)]
    pub economy_summary: EconomySummary,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl ReportDocument {
    pub fn evidence_by_id(&self, id: &str) -> Option<&EvidenceItem> {
        self.evidence_index.iter().find(|item| item.id == id)
    }
}
