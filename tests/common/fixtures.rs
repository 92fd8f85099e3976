use chrono::{NaiveDate, TimeZone, Utc};
use dossier::{
    Attachment, AttachmentKind, ContentBlock, DocumentBuilder, DocumentMetadata, DocumentType,
    EconomyLine, EvidenceItem, InMemoryResourceProvider, Party, Section,
};
use image::codecs::jpeg::JpegEncoder;
use image::{ImageBuffer, Rgb};
use rust_decimal::Decimal;

pub const CASE_NUMBER: &str = "CASE-2024-001";

/// Metadata with fixed timestamps so renders are reproducible.
pub fn metadata() -> DocumentMetadata {
    DocumentMetadata {
        document_type: DocumentType::LegalCase,
        case_number: CASE_NUMBER.to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 3, 5, 14, 0, 0).unwrap(),
        responsible: "Kari Nordmann".to_string(),
        parties: vec![
            Party {
                role: "Claimant".to_string(),
                name: "Ola Hansen".to_string(),
                contact: Some("ola@example.com".to_string()),
            },
            Party {
                role: "Contractor".to_string(),
                name: "Bygg AS".to_string(),
                contact: None,
            },
        ],
        status: "Open".to_string(),
        reference_id: "REF-77".to_string(),
    }
}

pub fn empty_builder() -> DocumentBuilder {
    DocumentBuilder::new(metadata())
}

/// A small solid-colour JPEG. Same dimensions always give the same bytes.
pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_pixel(width, height, Rgb([180u8, 120, 60]));
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, 80)
        .encode_image(&img)
        .unwrap();
    out
}

pub fn evidence_code(n: usize) -> String {
    format!("B-{:03}", n)
}

pub fn evidence_url(n: usize) -> String {
    format!("mem://evidence/{}.jpg", n)
}

/// `count` evidence items B-001.. with image URLs, each registered in
/// `provider` as the same small JPEG. Returns the JPEG size in bytes.
pub fn add_image_evidence(
    builder: &mut DocumentBuilder,
    provider: &InMemoryResourceProvider,
    count: usize,
) -> usize {
    let bytes = jpeg(64, 48);
    for n in 1..=count {
        provider.add(evidence_url(n), bytes.clone()).unwrap();
        builder.add_evidence(
            EvidenceItem::new(format!("ev-{}", n), evidence_code(n), format!("Photo {}", n))
                .with_image_url(evidence_url(n))
                .with_date(NaiveDate::from_ymd_opt(2024, 2, n as u32 % 28 + 1).unwrap()),
        );
    }
    bytes.len()
}

/// A document exercising every block type, economy lines and attachments.
pub fn full_builder() -> DocumentBuilder {
    let mut builder = empty_builder();
    builder
        .add_section(
            Section::new("intro", "Introduction")
                .with_block(ContentBlock::paragraph(
                    "The inspection found moisture damage along the north wall of the basement.",
                ))
                .with_child(
                    Section::new("findings", "Findings")
                        .with_block(ContentBlock::heading("Moisture readings", 2))
                        .with_block(ContentBlock::list(["North wall: 24%", "East wall: 11%"])),
                ),
        )
        .add_section(Section::new("conclusion", "Conclusion"));
    builder.add_section_block(
        "conclusion",
        ContentBlock::paragraph("Repairs are required before the next heating season."),
    );
    builder
        .add_economy_line(
            EconomyLine::new("l1", "Drainage repair", Decimal::new(1200000, 2))
                .with_party("Bygg AS"),
        )
        .add_economy_line(
            EconomyLine::new("l2", "Inspection fee", Decimal::new(250050, 2))
                .with_party("Ola Hansen"),
        )
        .add_economy_line(EconomyLine::new("l3", "Discount", Decimal::new(-50, 0)))
        .add_attachment(Attachment {
            id: "a1".to_string(),
            title: "Inspection protocol".to_string(),
            kind: AttachmentKind::Pdf,
            url: "https://files.example.com/protocol.pdf".to_string(),
            reference: Some("Annex 1".to_string()),
        });
    builder
}
