//! End-to-end scene tests driven by TOML documents

use grid_composer::overlay::{GradientDirection, LayerSource, OverlayEffect, OverlayKind};
use grid_composer::scene::PaintStep;
use grid_composer::{compose, compose_with_config, ComposeConfig, ComposeError, TextKind};
use pretty_assertions::assert_eq;

const SPLIT_WITH_HERO: &str = r##"
theme = "classic"

[layout]
type = "rows"
structure = [{ size = 50 }, { size = 50 }]

[[images]]
id = "hero"
src = "hero.jpg"

[cell_images]
"0" = "hero"

[text.title]
content = "Summer Sale"
[text.tagline]
content = "Everything must go"
[text.cta]
content = "Shop now"
[text.body_heading]
content = "This week only"
[text.body_text]
content = "Up to 50% off selected items."
[text.footnote]
content = "While stocks last"
"##;

fn kinds_in(scene: &grid_composer::Scene, cell: usize) -> (Vec<TextKind>, Vec<TextKind>) {
    let cell = scene.cell(cell).expect("cell should exist");
    (
        cell.on_image_text.iter().map(|r| r.kind).collect(),
        cell.background_text.iter().map(|r| r.kind).collect(),
    )
}

#[test]
fn test_auto_text_placement_split() {
    let scene = compose(SPLIT_WITH_HERO).expect("Should compose");
    assert_eq!(scene.cells.len(), 2);

    let (on_image, background) = kinds_in(&scene, 0);
    assert_eq!(
        on_image,
        vec![TextKind::Title, TextKind::Tagline, TextKind::Cta]
    );
    assert!(background.is_empty());

    let (on_image, background) = kinds_in(&scene, 1);
    assert!(on_image.is_empty());
    assert_eq!(
        background,
        vec![TextKind::BodyHeading, TextKind::BodyText, TextKind::Footnote]
    );
    assert!(scene.cells[1].image.is_none());
}

#[test]
fn test_explicit_text_cell_wins() {
    let source = format!("{}\n[text_cells]\ntitle = 1\n", SPLIT_WITH_HERO);
    let scene = compose(&source).expect("Should compose");

    let (on_image, _) = kinds_in(&scene, 0);
    assert_eq!(on_image, vec![TextKind::Tagline, TextKind::Cta]);

    let (cell, title) = scene.find_text(TextKind::Title).unwrap();
    assert_eq!(cell.index(), 1);
    assert!(title.shadow.is_none(), "background text has no shadow");
}

#[test]
fn test_negative_text_cell_means_auto() {
    let source = format!("{}\n[text_cells]\ntitle = -1\n", SPLIT_WITH_HERO);
    let scene = compose(&source).expect("Should compose");
    assert_eq!(scene.find_text(TextKind::Title).unwrap().0.index(), 0);
}

#[test]
fn test_hero_text_without_images_renders_nowhere() {
    let source = r#"
[layout]
type = "columns"
structure = [{ size = 50 }, { size = 50 }]

[text.title]
content = "Lost"
[text.body_text]
content = "Found"
"#;
    let scene = compose(source).expect("Should compose");
    assert!(scene.find_text(TextKind::Title).is_none());
    assert_eq!(scene.find_text(TextKind::BodyText).unwrap().0.index(), 0);
}

#[test]
fn test_fullbleed_normalization() {
    let empty = compose(
        r#"
[layout]
type = "fullbleed"
structure = []
"#,
    )
    .unwrap();
    let explicit = compose(
        r#"
[layout]
type = "fullbleed"
structure = [{ size = 100, subdivisions = 1, sub_sizes = [100] }]
"#,
    )
    .unwrap();
    assert_eq!(empty.cells.len(), 1);
    assert_eq!(empty, explicit);
}

#[test]
fn test_structure_normalized_on_load() {
    let scene = compose(
        r#"
[layout]
type = "columns"
structure = [{ size = 5, subdivisions = 2, sub_sizes = [30] }, { size = 95 }]
"#,
    )
    .unwrap();
    assert_eq!(scene.cells.len(), 3);
    let widths: Vec<f64> = scene.cells.iter().map(|c| c.cell.section_size_pct).collect();
    let total = widths[0] + widths[2];
    assert!((total - 100.0).abs() < 0.1, "sections sum to {}", total);
    assert!(widths[0] >= 10.0 - 0.1 && widths[2] <= 90.0 + 0.1);
    // sub_sizes length mismatch falls back to equal shares
    assert_eq!(scene.cells[0].cell.sub_size_pct, 50.0);
}

#[test]
fn test_overlay_layering_order() {
    let source = r##"
[layout]
type = "rows"
structure = [{ size = 50 }, { size = 50 }]

[[images]]
id = "hero"
src = "hero.jpg"
overlay = { type = "solid", color = "primary", opacity = 50 }

[cell_images]
"0" = "hero"

[cell_overlays.0]
enabled = true
type = "gradient-down"
color = "accent"
opacity = 30
"##;
    let scene = compose(source).unwrap();
    let cell = &scene.cells[0];
    assert_eq!(cell.overlays.len(), 2);

    let image_layer = &cell.overlays[0];
    assert_eq!(image_layer.source, LayerSource::Image);
    assert_eq!(image_layer.kind, OverlayKind::Solid);
    assert_eq!(
        image_layer.effect,
        OverlayEffect::Fill {
            color: "#1e3a5f".to_string(),
            opacity: 0.5
        }
    );

    let cell_layer = &cell.overlays[1];
    assert_eq!(cell_layer.source, LayerSource::Cell);
    assert_eq!(cell_layer.kind, OverlayKind::Gradient(GradientDirection::Down));
    assert_eq!(cell_layer.effect.opacity(), 0.3);

    let steps = cell.paint_order();
    assert!(matches!(steps[0], PaintStep::Background(_)));
    assert!(matches!(steps[1], PaintStep::Image(_)));
    assert!(matches!(steps[2], PaintStep::Overlay(layer) if layer.source == LayerSource::Image));
    assert!(matches!(steps[3], PaintStep::Overlay(layer) if layer.source == LayerSource::Cell));
}

#[test]
fn test_cell_overlay_custom_fields_fall_back_to_image_overlay() {
    let source = r##"
[layout]
type = "rows"
structure = [{ size = 50 }, { size = 50 }]

[[images]]
id = "hero"
src = "hero.jpg"
overlay = { type = "vignette", color = "black", opacity = 60 }

[cell_images]
"0" = "hero"

[cell_overlays.0]
opacity = 20
"##;
    let scene = compose(source).unwrap();
    let cell_layer = &scene.cells[0].overlays[1];
    assert_eq!(cell_layer.kind, OverlayKind::parse("vignette"));
    assert_eq!(cell_layer.effect.opacity(), 0.2);
}

#[test]
fn test_disabled_cell_overlay_and_legacy_image_cell() {
    let source = r##"
image_cell = 1

[overlay]
type = "solid"
color = "black"
opacity = 40

[layout]
type = "rows"
structure = [{ size = 50 }, { size = 50 }]

[cell_overlays.0]
enabled = false
"##;
    let scene = compose(source).unwrap();
    assert!(scene.cells[0].overlays.is_empty());
    assert_eq!(scene.cells[1].overlays.len(), 1);
    assert_eq!(scene.cells[1].overlays[0].source, LayerSource::Cell);
}

#[test]
fn test_unknown_overlay_type_fails_closed_to_solid() {
    let source = r##"
[[images]]
id = "bg"
src = "bg.jpg"
overlay = { type = "sparkles", color = "accent", opacity = 25 }

[cell_images]
"0" = "bg"
"##;
    let scene = compose(source).unwrap();
    assert_eq!(scene.cells[0].overlays[0].kind, OverlayKind::Solid);
}

#[test]
fn test_image_defaults_and_filter_chain() {
    let source = r##"
[[images]]
id = "plain"
src = "plain.jpg"

[[images]]
id = "moody"
src = "moody.jpg"
fit = "contain"
position = { x = 20, y = 80 }
filters = { sepia = true, contrast = 120, blur = 3 }
overlay = { type = "duotone", color = "accent", opacity = 50 }

[layout]
type = "columns"
structure = [{ size = 50 }, { size = 50 }]

[cell_images]
"0" = "plain"
"1" = "moody"
"##;
    let scene = compose(source).unwrap();

    let plain = scene.cells[0].image.as_ref().unwrap();
    assert_eq!(plain.fit.as_str(), "cover");
    assert_eq!((plain.position.x, plain.position.y), (50.0, 50.0));
    assert_eq!(plain.filters.expression(), None);

    let moody = scene.cells[1].image.as_ref().unwrap();
    assert_eq!(moody.fit.as_str(), "contain");
    assert_eq!((moody.position.x, moody.position.y), (20.0, 80.0));
    assert_eq!(
        moody.filters.expression().as_deref(),
        Some("grayscale(100%) sepia(100%) contrast(120%) blur(3px)")
    );
}

#[test]
fn test_frame_width_follows_resolved_padding() {
    let source = r##"
[layout]
type = "rows"
structure = [{ size = 50 }, { size = 50 }]

[padding]
global = 60

[padding.cells]
"1" = 20

[frame.outer]
percent = 50

[frame.cells.0]
percent = 25
color = "accent"

[frame.cells.1]
percent = 25
"##;
    let scene = compose(source).unwrap();
    let outer = scene.outer_frame.as_ref().unwrap();
    assert_eq!((outer.width, outer.color.as_str()), (30, "#ffffff"));

    let frame0 = scene.cells[0].frame.as_ref().unwrap();
    assert_eq!((frame0.width, frame0.color.as_str()), (15, "#e07a5f"));
    assert_eq!(scene.cells[1].frame.as_ref().unwrap().width, 5);
}

#[test]
fn test_platform_and_custom_theme() {
    let source = r##"
platform = "facebook-post"
background = "accent"

[theme]
primary = "#101010"
secondary = "#202020"
accent = "#303030"
"##;
    let scene = compose(source).unwrap();
    assert_eq!((scene.width, scene.height), (1200, 630));
    assert_eq!(scene.cells[0].background, "#303030");
}

#[test]
fn test_unknown_platform_and_theme_fall_back() {
    let source = r#"
platform = "fax-machine"
theme = "neon"
"#;
    let scene = compose(source).unwrap();
    assert_eq!((scene.width, scene.height), (1080, 1080));
    assert_eq!(scene.cells[0].background, "#1e3a5f");
}

#[test]
fn test_stale_references_dropped_on_load() {
    let source = r##"
[layout]
type = "rows"
structure = [{ size = 50 }, { size = 50 }]

[[images]]
id = "a"
src = "a.jpg"

[cell_images]
"0" = "a"
"5" = "a"
"first" = "a"

[text.title]
content = "Title"

[text_cells]
title = 9
"##;
    let scene = compose(source).unwrap();
    assert_eq!(scene.cells.len(), 2);
    // title reverts to auto placement over the image
    assert_eq!(scene.find_text(TextKind::Title).unwrap().0.index(), 0);
}

#[test]
fn test_text_styling_from_document() {
    let source = r##"
[fonts]
heading = "Oswald"
body = "Lora"

[layout]
type = "rows"
text_align = "left"
text_vertical_align = "start"
structure = [{ size = 50 }, { size = 50 }]

[cell_alignments.0]
text_vertical_align = "end"

[cell_backgrounds]
"0" = "off-white"

[text.body_heading]
content = "Heading"
color = "accent"
size = 54
bold = true
text_align = "right"

[text.footnote]
content = "Small print"
italic = true
"##;
    let scene = compose(source).unwrap();

    let (cell, heading) = scene.find_text(TextKind::BodyHeading).unwrap();
    assert_eq!(cell.index(), 0);
    assert_eq!(heading.font_family, "Oswald");
    assert_eq!(heading.font_size, 54.0);
    assert_eq!(heading.color, "#e07a5f");
    assert!(heading.bold);
    assert_eq!(heading.align.as_str(), "right");
    assert_eq!(heading.vertical_align.as_str(), "end");

    let (_, footnote) = scene.find_text(TextKind::Footnote).unwrap();
    assert_eq!(footnote.font_family, "Lora");
    assert_eq!(footnote.align.as_str(), "left");
    assert!(footnote.italic);
    // off-white background gets dark text
    assert_eq!(footnote.color, "#1f2937");
    // footnote stacks below the heading, block pinned to the bottom
    assert!(footnote.bounds.y > heading.bounds.y);
    assert!((footnote.bounds.bottom() - cell.content_box.bottom()).abs() < 1e-9);
}

#[test]
fn test_logo_placement() {
    let source = r#"
platform = "instagram-portrait"

[logo]
src = "logo.svg"
position = "top-left"
size = 10

[padding]
global = 24
"#;
    let scene = compose(source).unwrap();
    let logo = scene.logo.as_ref().unwrap();
    assert_eq!((logo.bounds.x, logo.bounds.y), (24.0, 24.0));
    assert_eq!(logo.bounds.width, 108.0);
}

#[test]
fn test_build_is_deterministic() {
    let a = compose(SPLIT_WITH_HERO).unwrap();
    let b = compose(SPLIT_WITH_HERO).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_oversized_text_metrics_are_bounded() {
    let source = r#"
[layout]
type = "rows"
structure = [{ size = 50 }, { size = 50 }]

[text.body_text]
content = "Huge\nand wide"
size = 1e300
letter_spacing = 1e300
"#;
    let scene = compose(source).unwrap();
    let (_, body) = scene.find_text(TextKind::BodyText).unwrap();
    assert!(body.font_size.is_finite());
    assert!(body.letter_spacing <= 5.0);
    assert!(body.lines >= 2 && body.lines <= grid_composer::scene::text::MAX_LINES);
    assert!(body.block_height().is_finite());
}

#[test]
fn test_invalid_toml_reports_span() {
    let source = "[layout]\ntype = \"rows\"\nstructure = 12\n";
    let err = compose_with_config(source, &ComposeConfig::new()).unwrap_err();
    let ComposeError::Document(err) = err else {
        panic!("expected a document error");
    };
    assert!(err.span().is_some());
    let report = err.format(source, "post.toml");
    assert!(report.contains("post.toml"));
}

#[test]
fn test_describe_snapshot() {
    let scene = compose(SPLIT_WITH_HERO).unwrap();
    insta::assert_snapshot!(scene.describe(), @r###"
    scene 1080x1080
      cell 0 [0.0] 0.0,0.0 1080.0x540.0 padding 40.0
        background #1e3a5f
        image hero (hero.jpg) cover at 50%,50% filter none
        text title on-image "Summer Sale" Inter 72.0px #ffffff center/center y 172.4 h 86.4
        text tagline on-image "Everything must go" Inter 36.0px #ffffff center/center y 276.8 h 43.2
        text cta on-image "Shop now" Inter 28.0px #ffffff center/center y 334.0 h 33.6
      cell 1 [1.0] 0.0,540.0 1080.0x540.0 padding 40.0
        background #1e3a5f
        text body_heading background "This week only" Inter 40.0px #ffffff center/center y 752.0 h 48.0
        text body_text background "Up to 50% off selected items." Inter 24.0px #ffffff center/center y 812.0 h 28.8
        text footnote background "While stocks last" Inter 16.0px #ffffff center/center y 848.8 h 19.2
    "###);
}
