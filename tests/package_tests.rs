mod common;

use common::fixtures::{self, evidence_code, evidence_url, jpeg, CASE_NUMBER};
use common::pdf_assertions::{cited_part_numbers, count_jpeg_images, page_text};
use common::{GeneratedPdf, Script, ScriptedProvider, TestResult};
use dossier::{
    ContentBlock, EvidenceItem, InMemoryResourceProvider, RenderConfig, ReportRenderer, Section,
};
use std::sync::Arc;
use std::time::Duration;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn config_with_part_images(max_part_images: usize) -> RenderConfig {
    RenderConfig {
        max_part_images,
        ..RenderConfig::default()
    }
}

#[tokio::test]
async fn test_seven_items_split_into_two_parts() -> TestResult {
    init_logger();
    let provider = Arc::new(InMemoryResourceProvider::new());
    let mut builder = fixtures::empty_builder();
    fixtures::add_image_evidence(&mut builder, &provider, 7);
    let document = builder.build();

    let renderer = ReportRenderer::with_config(provider, config_with_part_images(5));
    let package = renderer.render_package(&document).await?;

    assert_eq!(package.parts.len(), 2);
    let first = &package.parts[0];
    assert_eq!(first.title, "Appendix Part 1");
    assert_eq!(first.name, "case-2024-001-appendix-part-1.pdf");
    assert_eq!((first.first_code.as_str(), first.last_code.as_str()), ("B-001", "B-005"));
    assert_eq!(first.entries, 5);

    let second = &package.parts[1];
    assert_eq!((second.first_code.as_str(), second.last_code.as_str()), ("B-006", "B-007"));
    assert_eq!(second.entries, 2);

    // Title page plus one page per item.
    let part = GeneratedPdf::from_bytes(first.data.clone())?;
    assert_pdf_page_count!(part, 6);
    assert_eq!(count_jpeg_images(&part.doc), 5);
    let title_page = page_text(&part.doc, 1);
    assert!(title_page.contains("Appendix Part 1"));
    assert!(title_page.contains("Evidence B-001 - B-005"));
    assert!(title_page.contains("5 item(s)"));
    assert!(page_text(&part.doc, 2).contains("B-001 Photo 1"));

    let part = GeneratedPdf::from_bytes(second.data.clone())?;
    assert_pdf_page_count!(part, 3);
    assert_pdf_contains_text!(part, "B-007 Photo 7");

    let main = GeneratedPdf::from_bytes(package.main.clone())?;
    assert_eq!(count_jpeg_images(&main.doc), 7, "one thumbnail per citation");
    let text = main.text();
    assert_eq!(cited_part_numbers(&text), vec![1, 1, 1, 1, 1, 2, 2]);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_image_still_gets_a_part_page() -> TestResult {
    init_logger();
    let url = "https://nonexistent-host.invalid/evidence.jpg";
    let mut builder = fixtures::empty_builder();
    builder.add_evidence(EvidenceItem::new("e1", "B-001", "Lost photo").with_image_url(url));
    let document = builder.build();

    let renderer = ReportRenderer::new(Arc::new(InMemoryResourceProvider::new()));
    let package = renderer.render_package(&document).await?;

    assert_eq!(package.parts.len(), 1);
    assert_eq!(package.parts[0].entries, 1);
    assert_eq!(package.parts[0].image_bytes, 0);

    let part = GeneratedPdf::from_bytes(package.parts[0].data.clone())?;
    assert_pdf_contains_text!(part, "Image unavailable");
    assert_pdf_contains_text!(part, "nonexistent-host.invalid");
    assert_eq!(count_jpeg_images(&part.doc), 0);

    let main = GeneratedPdf::from_bytes(package.main)?;
    assert_pdf_contains_text!(main, "[Image unavailable:");
    assert_pdf_contains_text!(main, "See Appendix Part 1");
    Ok(())
}

#[tokio::test]
async fn test_empty_document_has_no_parts() -> TestResult {
    let renderer = ReportRenderer::new(Arc::new(InMemoryResourceProvider::new()));
    let package = renderer.render_package(&fixtures::empty_builder().build()).await?;

    assert!(package.parts.is_empty());
    assert_eq!(package.total_entries(), 0);
    assert_eq!(package.total_bytes(), package.main.len());

    let main = GeneratedPdf::from_bytes(package.main)?;
    assert_pdf_page_count!(main, 1);
    assert_pdf_contains_text!(main, CASE_NUMBER);
    assert_pdf_not_contains_text!(main, "Appendix");
    Ok(())
}

#[tokio::test]
async fn test_byte_ceiling_splits_parts() -> TestResult {
    let provider = Arc::new(InMemoryResourceProvider::new());
    let mut builder = fixtures::empty_builder();
    let size = fixtures::add_image_evidence(&mut builder, &provider, 5) as u64;

    let config = RenderConfig {
        max_part_bytes: 2 * size,
        ..RenderConfig::default()
    };
    let renderer = ReportRenderer::with_config(provider, config);
    let package = renderer.render_package(&builder.build()).await?;

    let entries: Vec<usize> = package.parts.iter().map(|p| p.entries).collect();
    assert_eq!(entries, vec![2, 2, 1]);
    for part in &package.parts {
        assert!(part.image_bytes <= 2 * size);
    }
    Ok(())
}

#[tokio::test]
async fn test_oversized_image_gets_a_part_of_its_own() -> TestResult {
    let provider = Arc::new(InMemoryResourceProvider::new());
    let mut builder = fixtures::empty_builder();
    let size = fixtures::add_image_evidence(&mut builder, &provider, 3) as u64;

    let config = RenderConfig {
        max_part_bytes: size - 1,
        ..RenderConfig::default()
    };
    let renderer = ReportRenderer::with_config(provider, config);
    let package = renderer.render_package(&builder.build()).await?;

    assert_eq!(package.parts.len(), 3);
    for (i, part) in package.parts.iter().enumerate() {
        assert_eq!(part.entries, 1);
        assert_eq!(part.image_bytes, size);
        assert_eq!(part.first_code, evidence_code(i + 1));
    }
    Ok(())
}

#[tokio::test]
async fn test_items_without_image_stay_out_of_parts() -> TestResult {
    let provider = Arc::new(InMemoryResourceProvider::new());
    let mut builder = fixtures::empty_builder();
    fixtures::add_image_evidence(&mut builder, &provider, 2);
    builder
        .add_evidence(
            EvidenceItem::new("n1", "B-003", "Witness statement")
                .with_description("Signed statement from the neighbour."),
        )
        .add_evidence(EvidenceItem::new("n2", "B-004", "Blank url").with_image_url("  "));
    let document = builder.build();

    let renderer = ReportRenderer::new(provider);
    let package = renderer.render_package(&document).await?;

    assert_eq!(package.parts.len(), 1);
    assert_eq!(package.total_entries(), 2);
    assert_eq!(package.parts[0].last_code, "B-002");

    let main = GeneratedPdf::from_bytes(package.main)?;
    assert_pdf_contains_text!(main, "B-003 Witness statement");
    assert_pdf_contains_text!(main, "Signed statement from the neighbour.");
    assert_eq!(cited_part_numbers(&main.text()), vec![1, 1]);
    Ok(())
}

#[tokio::test]
async fn test_every_cited_part_exists() -> TestResult {
    let provider = Arc::new(InMemoryResourceProvider::new());
    let mut builder = fixtures::empty_builder();
    fixtures::add_image_evidence(&mut builder, &provider, 11);
    builder.add_evidence(
        EvidenceItem::new("x", "B-012", "Missing").with_image_url("mem://evidence/missing.jpg"),
    );
    let document = builder.build();

    let renderer = ReportRenderer::with_config(provider, config_with_part_images(4));
    let package = renderer.render_package(&document).await?;

    assert_eq!(package.parts.len(), 3);
    assert_eq!(package.total_entries(), 12);

    let main = GeneratedPdf::from_bytes(package.main.clone())?;
    let cited = cited_part_numbers(&main.text());
    assert_eq!(cited.len(), 12);
    for number in &cited {
        assert!((1..=package.parts.len()).contains(number));
    }
    for number in 1..=package.parts.len() {
        assert!(cited.contains(&number), "part {} is never cited", number);
    }
    Ok(())
}

#[tokio::test]
async fn test_package_render_is_deterministic() -> TestResult {
    let provider = Arc::new(InMemoryResourceProvider::new());
    let mut builder = fixtures::full_builder();
    fixtures::add_image_evidence(&mut builder, &provider, 3);
    let document = builder.build();

    let renderer = ReportRenderer::with_config(provider, config_with_part_images(2));
    let first = renderer.render_package(&document).await?;
    let second = renderer.render_package(&document).await?;

    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn test_section_images_are_referenced_not_fetched() -> TestResult {
    let inline_url = "mem://inline/site.jpg";
    let provider = Arc::new(
        ScriptedProvider::new()
            .with(evidence_url(1), Script::Bytes(jpeg(32, 32)))
            .with(inline_url, Script::Bytes(jpeg(32, 32))),
    );
    let mut builder = fixtures::empty_builder();
    builder
        .add_section(
            Section::new("site", "Site")
                .with_block(ContentBlock::Image {
                    evidence_id: Some("ev-1".to_string()),
                    caption: "North wall".to_string(),
                    image_url: evidence_url(1),
                })
                .with_block(ContentBlock::Image {
                    evidence_id: None,
                    caption: String::new(),
                    image_url: inline_url.to_string(),
                }),
        )
        .add_evidence(
            EvidenceItem::new("ev-1", "B-001", "North wall").with_image_url(evidence_url(1)),
        );

    let renderer = ReportRenderer::new(provider.clone());
    let package = renderer.render_package(&builder.build()).await?;

    assert_eq!(provider.calls(), vec![evidence_url(1)]);
    let main = GeneratedPdf::from_bytes(package.main)?;
    assert_pdf_contains_text!(main, "[Image: see evidence B-001]");
    assert_pdf_contains_text!(main, "[Image: mem://inline/site.jpg]");
    Ok(())
}

#[tokio::test]
async fn test_fetches_never_exceed_batch_size() -> TestResult {
    let mut provider = ScriptedProvider::new();
    let mut builder = fixtures::empty_builder();
    for n in 1..=10 {
        provider = provider.with(
            evidence_url(n),
            Script::Delayed(Duration::from_millis(10), jpeg(16, 16)),
        );
        builder.add_evidence(
            EvidenceItem::new(format!("ev-{}", n), evidence_code(n), "Photo")
                .with_image_url(evidence_url(n)),
        );
    }
    let provider = Arc::new(provider);

    let config = RenderConfig {
        batch_size: 3,
        ..RenderConfig::default()
    };
    let renderer = ReportRenderer::with_config(provider.clone(), config);
    let package = renderer.render_package(&builder.build()).await?;

    assert_eq!(provider.max_in_flight(), 3);
    let expected: Vec<String> = (1..=10).map(evidence_url).collect();
    assert_eq!(provider.calls(), expected, "fetches follow index order");
    assert_eq!(package.total_entries(), 10);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_hanging_fetches_time_out_and_render_completes() -> TestResult {
    let provider = Arc::new(
        ScriptedProvider::new()
            .with(evidence_url(1), Script::Hang)
            .with(evidence_url(2), Script::Hang),
    );
    let mut builder = fixtures::empty_builder();
    for n in 1..=2 {
        builder.add_evidence(
            EvidenceItem::new(format!("ev-{}", n), evidence_code(n), "Slow photo")
                .with_image_url(evidence_url(n)),
        );
    }

    let renderer = ReportRenderer::new(provider);
    let package = renderer.render_package(&builder.build()).await?;

    assert_eq!(package.parts.len(), 1);
    assert_eq!(package.parts[0].entries, 2);
    let part = GeneratedPdf::from_bytes(package.parts[0].data.clone())?;
    assert_pdf_contains_text!(part, "timed out after 20s");
    Ok(())
}
