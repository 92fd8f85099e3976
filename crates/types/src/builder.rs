use crate::document::{ContentBlock, DocumentMetadata, ReportDocument, Section};
use crate::economy::{EconomyLine, EconomySummary};
use crate::evidence::{Attachment, EvidenceItem};

/// Accumulates sections, evidence, economy lines and attachments in call order
/// and produces immutable [`ReportDocument`] snapshots.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    metadata: DocumentMetadata,
    sections: Vec<Section>,
    evidence_index: Vec<EvidenceItem>,
    economy_lines: Vec<EconomyLine>,
    attachments: Vec<Attachment>,
}

impl DocumentBuilder {
    pub fn new(metadata: DocumentMetadata) -> Self {
        Self {
            metadata,
            sections: Vec::new(),
            evidence_index: Vec::new(),
            economy_lines: Vec::new(),
            attachments: Vec::new(),
        }
    }

    /// Re-seeds a builder from an existing document, e.g. one deserialized from JSON.
    /// Any summary carried by the input is discarded and recomputed on `build`.
    pub fn from_document(document: ReportDocument) -> Self {
        Self {
            metadata: document.metadata,
            sections: document.sections,
            evidence_index: document.evidence_index,
            economy_lines: document.economy_lines,
            attachments: document.attachments,
        }
    }

    /// Appends a top-level section. No deduplication by id.
    pub fn add_section(&mut self, section: Section) -> &mut Self {
        self.sections.push(section);
        self
    }

    /// Appends `block` to the first section (depth-first) whose id matches.
    ///
    /// Best effort: returns `false` and leaves the builder untouched when no
    /// section matches. Callers that care should check the return value.
    pub fn add_section_block(&mut self, section_id: &str, block: ContentBlock) -> bool {
        let target = self
            .sections
            .iter_mut()
            .find_map(|section| section.find_mut(section_id));
        match target {
            Some(section) => {
                section.blocks.push(block);
                true
            }
            None => false,
        }
    }

    pub fn add_evidence(&mut self, item: EvidenceItem) -> &mut Self {
        self.evidence_index.push(item);
        self
    }

    pub fn add_economy_line(&mut self, line: EconomyLine) -> &mut Self {
        self.economy_lines.push(line);
        self
    }

    pub fn add_attachment(&mut self, attachment: Attachment) -> &mut Self {
        self.attachments.push(attachment);
        self
    }

    /// Returns a disconnected snapshot with a freshly derived economy summary.
    pub fn build(&self) -> ReportDocument {
        ReportDocument {
            metadata: self.metadata.clone(),
            sections: self.sections.clone(),
            evidence_index: self.evidence_index.clone(),
            economy_lines: self.economy_lines.clone(),
            economy_summary: EconomySummary::from_lines(&self.economy_lines),
            attachments: self.attachments.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentType;
    use chrono::{TimeZone, Utc};

    fn metadata() -> DocumentMetadata {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        DocumentMetadata {
            document_type: DocumentType::LegalCase,
            case_number: "2024-017".into(),
            created_at: ts,
            updated_at: ts,
            responsible: "Case Officer".into(),
            parties: Vec::new(),
            status: "open".into(),
            reference_id: "ref-1".into(),
        }
    }

    #[test]
    fn test_add_section_block_targets_nested_section() {
        let mut builder = DocumentBuilder::new(metadata());
        builder.add_section(
            Section::new("facts", "Facts").with_child(Section::new("damage", "Damage")),
        );

        assert!(builder.add_section_block("damage", ContentBlock::paragraph("Water ingress")));

        let doc = builder.build();
        assert!(doc.sections[0].blocks.is_empty());
        assert_eq!(doc.sections[0].children[0].blocks.len(), 1);
    }

    #[test]
    fn test_add_section_block_first_match_wins() {
        let mut builder = DocumentBuilder::new(metadata());
        builder
            .add_section(Section::new("dup", "First"))
            .add_section(Section::new("dup", "Second"));

        assert!(builder.add_section_block("dup", ContentBlock::paragraph("x")));
        let doc = builder.build();
        assert_eq!(doc.sections[0].blocks.len(), 1);
        assert!(doc.sections[1].blocks.is_empty());
    }

    #[test]
    fn test_add_section_block_miss_is_ignored() {
        let mut builder = DocumentBuilder::new(metadata());
        builder.add_section(Section::new("facts", "Facts"));
        let before = builder.build();

        assert!(!builder.add_section_block("nope", ContentBlock::paragraph("lost")));
        assert_eq!(builder.build(), before);
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut builder = DocumentBuilder::new(metadata());
        builder
            .add_economy_line(
                EconomyLine::new("1", "Repair", "1200.00".parse().unwrap()).with_party("A"),
            )
            .add_economy_line(EconomyLine::new("2", "Refund", "-200.00".parse().unwrap()));

        let first = builder.build();
        let second = builder.build();
        assert_eq!(first.economy_summary, second.economy_summary);
        assert_eq!(first, second);
    }

    #[test]
    fn test_build_snapshots_are_disconnected() {
        let mut builder = DocumentBuilder::new(metadata());
        let empty = builder.build();
        builder.add_evidence(EvidenceItem::new("e1", "B-001", "Photo"));
        let with_evidence = builder.build();

        assert!(empty.evidence_index.is_empty());
        assert_eq!(with_evidence.evidence_index.len(), 1);
    }

    #[test]
    fn test_from_document_recomputes_summary() {
        let mut builder = DocumentBuilder::new(metadata());
        builder.add_economy_line(EconomyLine::new("1", "Repair", "10".parse().unwrap()));
        let mut doc = builder.build();
        doc.economy_summary.total_amount = "999".parse().unwrap();

        let rebuilt = DocumentBuilder::from_document(doc).build();
        assert_eq!(
            rebuilt.economy_summary.total_amount,
            "10".parse::<rust_decimal::Decimal>().unwrap()
        );
    }
}
