//! Document editing through the public API: structure edits keep sizes
//! balanced and never leave references to cells or images that are gone

use grid_composer::document::ImageFilters;
use grid_composer::layout::resize::is_balanced;
use grid_composer::layout::{Layout, LayoutConfig, LayoutError, LayoutType, Section};
use grid_composer::overlay::CellOverlay;
use grid_composer::style::CellAlignment;
use grid_composer::{
    build_scene, load_document, resolve_cells, ComposeConfig, DocumentState, ImagePoolEntry,
    TextKind, TextLayer,
};
use pretty_assertions::assert_eq;

fn config() -> LayoutConfig {
    LayoutConfig::default()
}

fn grid_2x2() -> DocumentState {
    let mut doc = DocumentState::new();
    doc.set_layout(
        Layout::rows(vec![Section::new(50.0, 2), Section::new(50.0, 2)]),
        &config(),
    );
    doc
}

fn assert_structure_balanced(doc: &DocumentState) {
    let config = config();
    let sizes: Vec<f64> = doc.layout.structure.iter().map(|s| s.size).collect();
    assert!(is_balanced(&sizes, &config), "sections {:?}", sizes);
    for section in &doc.layout.structure {
        assert!(
            is_balanced(&section.sub_sizes, &config),
            "subs {:?}",
            section.sub_sizes
        );
    }
}

#[test]
fn test_cell_count_and_order() {
    let layout = Layout::columns(vec![
        Section::new(30.0, 3),
        Section::new(40.0, 1),
        Section::new(30.0, 2),
    ]);
    let cells = resolve_cells(&layout);
    assert_eq!(cells.len(), 6);
    let order: Vec<(usize, usize)> = cells
        .iter()
        .map(|c| (c.section_index, c.sub_index))
        .collect();
    assert_eq!(order, vec![(0, 0), (0, 1), (0, 2), (1, 0), (2, 0), (2, 1)]);
    assert_eq!(resolve_cells(&layout), cells);
}

#[test]
fn test_remove_image_clears_cell_reference() {
    let mut doc = grid_2x2();
    doc.add_image(ImagePoolEntry::new("a", "a.jpg"));
    doc.add_image(ImagePoolEntry::new("b", "b.jpg"));
    assert!(doc.assign_image(3, Some("a")));
    assert!(doc.assign_image(1, Some("b")));

    let removed = doc.remove_image("a").expect("image should exist");
    assert_eq!(removed.id, "a");
    assert!(!doc.cell_images.contains_key(&3));
    assert_eq!(doc.cell_images.get(&1).map(String::as_str), Some("b"));
    assert!(doc.cell_images.values().all(|id| doc.image(id).is_some()));
}

#[test]
fn test_assign_rejects_unknown_image_and_cell() {
    let mut doc = grid_2x2();
    doc.add_image(ImagePoolEntry::new("a", "a.jpg"));
    assert!(!doc.assign_image(0, Some("missing")));
    assert!(!doc.assign_image(9, Some("a")));
    assert!(!doc.assign_text(TextKind::Title, Some(4)));
    assert!(doc.cell_images.is_empty());
    assert!(doc.text_cells.is_empty());
}

#[test]
fn test_shrinking_structure_invalidates_references() {
    let mut doc = grid_2x2();
    doc.add_image(ImagePoolEntry::new("a", "a.jpg"));
    doc.assign_image(0, Some("a"));
    doc.assign_image(3, Some("a"));
    doc.assign_text(TextKind::Title, Some(3));
    doc.assign_text(TextKind::BodyText, Some(1));
    doc.set_cell_overlay(2, CellOverlay::disabled());
    doc.set_cell_background(3, "accent");
    doc.set_cell_alignment(
        2,
        CellAlignment {
            text_align: None,
            text_vertical_align: None,
        },
    );

    doc.remove_section(1).expect("Should remove");
    assert_eq!(doc.cell_count(), 2);

    assert_eq!(doc.cell_images.keys().copied().collect::<Vec<_>>(), vec![0]);
    assert_eq!(doc.text_cells.get(&TextKind::Title), None);
    assert_eq!(doc.text_cells.get(&TextKind::BodyText), Some(&1));
    assert!(doc.cell_overlays.is_empty());
    assert!(doc.cell_backgrounds.is_empty());
    assert!(doc.cell_alignments.is_empty());
    assert_eq!(doc.layout.structure[0].size, 100.0);
}

#[test]
fn test_removing_first_section_keeps_later_content_in_place() {
    let mut doc = grid_2x2();
    doc.add_image(ImagePoolEntry::new("a", "a.jpg"));
    doc.add_image(ImagePoolEntry::new("b", "b.jpg"));
    doc.assign_image(0, Some("a"));
    doc.assign_image(3, Some("b"));
    doc.assign_text(TextKind::Cta, Some(2));
    doc.set_cell_background(3, "accent");

    doc.remove_section(0).expect("Should remove");
    assert_eq!(doc.cell_count(), 2);
    assert_eq!(doc.cell_images.get(&1).map(String::as_str), Some("b"));
    assert!(!doc.cell_images.contains_key(&0));
    assert_eq!(doc.text_cells.get(&TextKind::Cta), Some(&0));
    assert_eq!(
        doc.cell_backgrounds.keys().copied().collect::<Vec<_>>(),
        vec![1]
    );
}

#[test]
fn test_fewer_subdivisions_invalidates_references() {
    let mut doc = grid_2x2();
    doc.add_image(ImagePoolEntry::new("a", "a.jpg"));
    doc.assign_image(3, Some("a"));
    doc.assign_image(2, Some("a"));
    doc.set_subdivisions(1, 1, &config()).unwrap();
    assert_eq!(doc.cell_count(), 3);
    assert_eq!(doc.cell_images.keys().copied().collect::<Vec<_>>(), vec![2]);
}

#[test]
fn test_resizes_stay_balanced() {
    let mut doc = DocumentState::new();
    doc.set_layout(
        Layout::rows(vec![
            Section::new(25.0, 3),
            Section::new(25.0, 1),
            Section::new(50.0, 2),
        ]),
        &config(),
    );

    for target in [0.0, 5.0, 33.3, 70.0, 90.0, 150.0] {
        doc.resize_section(0, target, &config()).unwrap();
        assert_structure_balanced(&doc);
        doc.resize_subdivision(0, 1, target, &config()).unwrap();
        assert_structure_balanced(&doc);
    }

    // three siblings: nobody can grow past 100 - 2 * 10
    doc.resize_section(2, 95.0, &config()).unwrap();
    assert!((doc.layout.structure[2].size - 80.0).abs() < 0.1);
}

#[test]
fn test_add_section_equalizes() {
    let mut doc = DocumentState::new();
    doc.set_layout(
        Layout::columns(vec![Section::new(70.0, 1), Section::new(30.0, 1)]),
        &config(),
    );
    let index = doc.add_section(&config()).unwrap();
    assert_eq!(index, 2);
    assert_eq!(doc.cell_count(), 3);
    for section in &doc.layout.structure {
        assert!((section.size - 100.0 / 3.0).abs() < 0.1);
        assert_eq!(section.subdivisions, 1);
        assert_eq!(section.sub_sizes, vec![100.0]);
    }
}

#[test]
fn test_section_limit() {
    let config = LayoutConfig::new().with_max_sections(3);
    let mut doc = DocumentState::new();
    doc.set_layout(
        Layout::rows(vec![Section::new(50.0, 1), Section::new(50.0, 1)]),
        &config,
    );
    doc.add_section(&config).unwrap();
    assert_eq!(
        doc.add_section(&config),
        Err(LayoutError::TooManySections { max: 3 })
    );
}

#[test]
fn test_structure_edits_rejected_on_fullbleed() {
    let mut doc = DocumentState::new();
    assert!(matches!(
        doc.add_section(&config()),
        Err(LayoutError::FullbleedStructure { .. })
    ));
    assert!(matches!(
        doc.resize_section(0, 40.0, &config()),
        Err(LayoutError::FullbleedStructure { .. })
    ));
}

#[test]
fn test_remove_last_section_rejected() {
    let mut doc = DocumentState::new();
    doc.set_layout(Layout::rows(vec![Section::full()]), &config());
    assert_eq!(doc.remove_section(0), Err(LayoutError::LastSection));
    assert!(matches!(
        doc.remove_section(4),
        Err(LayoutError::SectionOutOfRange { .. })
    ));
}

#[test]
fn test_switching_layout_type() {
    let mut doc = DocumentState::new();
    doc.add_image(ImagePoolEntry::new("a", "a.jpg"));
    doc.assign_image(0, Some("a"));

    doc.set_layout_type(LayoutType::Columns, &config());
    assert_eq!(doc.cell_count(), 2);
    assert_eq!(doc.cell_images.get(&0).map(String::as_str), Some("a"));

    doc.assign_image(1, Some("a"));
    doc.set_layout_type(LayoutType::Fullbleed, &config());
    assert_eq!(doc.cell_count(), 1);
    assert!(!doc.cell_images.contains_key(&1));
}

#[test]
fn test_edits_then_rebuild() {
    let source = r#"
[layout]
type = "rows"
structure = [{ size = 50 }, { size = 50, subdivisions = 2 }]

[[images]]
id = "a"
src = "a.jpg"

[cell_images]
"2" = "a"

[text.title]
content = "Title"
"#;
    let mut doc = load_document(source, &ComposeConfig::new()).unwrap();
    assert_eq!(build_scene(&doc).find_text(TextKind::Title).unwrap().0.index(), 2);

    doc.set_subdivisions(1, 1, &config()).unwrap();
    let scene = build_scene(&doc);
    assert_eq!(scene.cells.len(), 2);
    assert!(scene.find_text(TextKind::Title).is_none());

    doc.assign_image(0, Some("a"));
    doc.set_text(TextKind::Title, TextLayer::new("Back"));
    doc.images[0].filters = ImageFilters {
        grayscale: true,
        ..ImageFilters::default()
    };
    let scene = build_scene(&doc);
    let (cell, title) = scene.find_text(TextKind::Title).unwrap();
    assert_eq!((cell.index(), title.content.as_str()), (0, "Back"));
    assert_eq!(
        cell.image.as_ref().unwrap().filters.expression().as_deref(),
        Some("grayscale(100%)")
    );
}
