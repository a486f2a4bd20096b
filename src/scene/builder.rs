//! Scene construction from a document

use log::debug;

use super::filter::FilterChain;
use super::text::{
    estimate_lines, font_scale, sanitize_font_size, sanitize_letter_spacing, stack_runs, TextRun,
    TextShadow,
};
use super::{LogoPlacement, Scene, SceneCell, SceneImage};
use crate::content::{assign_content, CellContent};
use crate::document::{DocumentState, Logo, LogoPosition, TextKind};
use crate::layout::{BoundingBox, Cell};
use crate::overlay::{compose_overlays, selects_duotone, OverlayInputs};
use crate::platform::Dimensions;
use crate::style::{
    contrasting, resolve_color, resolve_element_align, resolve_text_align,
    resolve_vertical_align,
};

const LIGHT_TEXT: &str = "#ffffff";
/// Neutral charcoal
const DARK_TEXT: &str = "#1f2937";

/// Resolve a document into a render-ready scene
///
/// Never fails: every reference has a fallback, and references that point
/// nowhere simply render nothing.
pub fn build_scene(doc: &DocumentState) -> Scene {
    let dimensions = doc.dimensions;
    let contents = assign_content(doc);

    let cells: Vec<SceneCell> = doc
        .cells()
        .into_iter()
        .zip(&contents)
        .map(|(cell, content)| build_cell(doc, cell, content))
        .collect();

    debug!(
        "built {}x{} scene: {} cells, {} text runs",
        dimensions.width,
        dimensions.height,
        cells.len(),
        cells.iter().map(|c| c.text_runs().count()).sum::<usize>()
    );

    Scene {
        width: dimensions.width,
        height: dimensions.height,
        outer_frame: doc.frame.resolve_outer(&doc.padding, &doc.theme),
        cells,
        logo: doc
            .logo
            .as_ref()
            .map(|logo| place_logo(logo, &dimensions, doc.padding.global)),
    }
}

fn build_cell(doc: &DocumentState, cell: Cell, content: &CellContent) -> SceneCell {
    let index = cell.index;
    let bounds = cell
        .rect
        .to_pixels(doc.dimensions.width as f64, doc.dimensions.height as f64);
    let padding = doc.padding.resolve(index);
    let content_box = bounds.inset(padding);

    let background_key = doc
        .cell_backgrounds
        .get(&index)
        .unwrap_or(&doc.background);
    let background = resolve_color(background_key, &doc.theme, &doc.theme.primary);

    let entry = content.image.as_deref().and_then(|id| doc.image(id));
    let overlay_inputs = OverlayInputs {
        image_overlay: entry.map(|e| &e.overlay),
        cell_overlay: doc.cell_overlays.get(&index),
        global_overlay: &doc.overlay,
        legacy_image_cell: doc.image_cell == Some(index),
    };
    let overlays = compose_overlays(&overlay_inputs, &doc.theme);
    let force_grayscale = selects_duotone(&overlay_inputs);
    let image = entry.map(|e| SceneImage {
        id: e.id.clone(),
        src: e.src.clone(),
        name: e.name.clone(),
        fit: e.fit,
        position: e.position,
        filters: FilterChain::from_filters(&e.filters, force_grayscale),
    });

    let vertical_align = resolve_vertical_align(index, &doc.cell_alignments, &doc.layout);
    let runs = RunContext {
        doc,
        cell: index,
        scale: font_scale(&doc.dimensions),
        available_width: content_box.width,
    };

    let mut on_image_text: Vec<TextRun> = content
        .on_image_text
        .iter()
        .filter_map(|kind| runs.build(*kind, LIGHT_TEXT, true))
        .collect();
    stack_runs(&mut on_image_text, content_box, vertical_align);

    let background_default = contrasting(&background, DARK_TEXT, LIGHT_TEXT);
    let mut background_text: Vec<TextRun> = content
        .background_text
        .iter()
        .filter_map(|kind| runs.build(*kind, background_default, false))
        .collect();
    stack_runs(&mut background_text, content_box, vertical_align);

    SceneCell {
        cell,
        bounds,
        content_box,
        padding,
        background,
        image,
        overlays,
        frame: doc.frame.resolve_cell(index, &doc.padding, &doc.theme),
        text_align: resolve_text_align(index, &doc.cell_alignments, &doc.layout),
        vertical_align,
        on_image_text,
        background_text,
    }
}

struct RunContext<'a> {
    doc: &'a DocumentState,
    cell: usize,
    scale: f64,
    available_width: f64,
}

impl RunContext<'_> {
    /// Style one text layer; positioning happens when the runs are stacked
    fn build(&self, kind: TextKind, default_color: &str, on_image: bool) -> Option<TextRun> {
        let doc = self.doc;
        let layer = doc.text_layer(kind)?;

        let font_size = sanitize_font_size(layer.size, kind.default_size()) * self.scale;
        let letter_spacing = sanitize_letter_spacing(layer.letter_spacing);
        let font_family = if kind.uses_heading_font() {
            &doc.fonts.heading
        } else {
            &doc.fonts.body
        };
        let color = match &layer.color {
            Some(key) => resolve_color(key, &doc.theme, default_color),
            None => default_color.to_string(),
        };

        Some(TextRun {
            kind,
            content: layer.content.clone(),
            font_family: font_family.clone(),
            font_size,
            color,
            bold: layer.bold,
            italic: layer.italic,
            letter_spacing,
            align: resolve_element_align(
                layer.text_align,
                self.cell,
                &doc.cell_alignments,
                &doc.layout,
            ),
            vertical_align: resolve_vertical_align(self.cell, &doc.cell_alignments, &doc.layout),
            lines: estimate_lines(
                &layer.content,
                font_size,
                letter_spacing,
                self.available_width,
            ),
            bounds: BoundingBox::zero(),
            shadow: on_image.then(TextShadow::on_image),
        })
    }
}

/// Position the logo on the canvas, `margin` pixels from the edges
pub fn place_logo(logo: &Logo, dimensions: &Dimensions, margin: f64) -> LogoPlacement {
    let (width, height) = (dimensions.width as f64, dimensions.height as f64);
    let side = dimensions.short_side() as f64 * logo.size.clamp(0.0, 100.0) / 100.0;
    let margin = margin.max(0.0);

    let near = margin;
    let far_x = width - margin - side;
    let far_y = height - margin - side;
    let (x, y) = match logo.position {
        LogoPosition::TopLeft => (near, near),
        LogoPosition::TopRight => (far_x, near),
        LogoPosition::BottomLeft => (near, far_y),
        LogoPosition::BottomRight => (far_x, far_y),
        LogoPosition::Center => ((width - side) / 2.0, (height - side) / 2.0),
    };

    LogoPlacement {
        src: logo.src.clone(),
        position: logo.position,
        bounds: BoundingBox::new(x.max(0.0), y.max(0.0), side, side),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ImageFilters, ImagePoolEntry, TextLayer};
    use crate::layout::{Layout, LayoutConfig, Section, TextAlign, VerticalAlign};
    use crate::overlay::{CellOverlay, LayerSource, OverlayKind, OverlaySettings};
    use crate::scene::PaintStep;
    use crate::style::{CellAlignment, FrameSpec, Padding};
    use pretty_assertions::assert_eq;

    fn two_rows() -> DocumentState {
        let mut doc = DocumentState::new();
        doc.set_layout(
            Layout::rows(vec![Section::new(60.0, 1), Section::new(40.0, 1)]),
            &LayoutConfig::default(),
        );
        doc
    }

    #[test]
    fn test_cell_geometry() {
        let doc = two_rows();
        let scene = build_scene(&doc);
        assert_eq!(scene.width, 1080);
        assert_eq!(scene.cells.len(), 2);

        let top = &scene.cells[0];
        assert_eq!(top.bounds, BoundingBox::new(0.0, 0.0, 1080.0, 648.0));
        assert_eq!(top.padding, 40.0);
        assert_eq!(top.content_box, BoundingBox::new(40.0, 40.0, 1000.0, 568.0));
        assert_eq!(scene.cells[1].bounds.y, 648.0);
    }

    #[test]
    fn test_background_resolution() {
        let mut doc = two_rows();
        doc.set_cell_background(1, "accent");
        let scene = build_scene(&doc);
        assert_eq!(scene.cells[0].background, doc.theme.primary);
        assert_eq!(scene.cells[1].background, doc.theme.accent);

        doc.background = "not-a-color".to_string();
        assert_eq!(build_scene(&doc).cells[0].background, doc.theme.primary);
    }

    #[test]
    fn test_text_runs_default_styling() {
        let mut doc = two_rows();
        doc.add_image(ImagePoolEntry::new("hero", "hero.jpg"));
        doc.assign_image(0, Some("hero"));
        doc.set_text(TextKind::Title, TextLayer::new("Summer"));
        doc.set_text(TextKind::BodyText, TextLayer::new("Details"));
        doc.set_cell_background(1, "secondary");

        let scene = build_scene(&doc);
        let (cell, title) = scene.find_text(TextKind::Title).unwrap();
        assert_eq!(cell.index(), 0);
        assert_eq!(title.color, "#ffffff");
        assert_eq!(title.font_size, 72.0);
        assert!(title.shadow.is_some());

        let (cell, body) = scene.find_text(TextKind::BodyText).unwrap();
        assert_eq!(cell.index(), 1);
        // light secondary background gets dark text
        assert_eq!(body.color, DARK_TEXT);
        assert_eq!(body.font_size, 24.0);
        assert!(body.shadow.is_none());
    }

    #[test]
    fn test_text_color_and_font_resolution() {
        let mut doc = DocumentState::new();
        doc.fonts.heading = "Playfair Display".to_string();
        doc.fonts.body = "Lato".to_string();
        doc.set_text(TextKind::Title, TextLayer::new("Hi").with_color("accent"));
        doc.set_text(TextKind::Footnote, TextLayer::new("fine print").with_color("bogus"));

        let scene = build_scene(&doc);
        let (_, title) = scene.find_text(TextKind::Title).unwrap();
        assert_eq!(title.color, doc.theme.accent);
        assert_eq!(title.font_family, "Playfair Display");

        let (_, footnote) = scene.find_text(TextKind::Footnote).unwrap();
        // primary background is dark, unknown key falls back to the default
        assert_eq!(footnote.color, LIGHT_TEXT);
        assert_eq!(footnote.font_family, "Lato");
    }

    #[test]
    fn test_font_scales_with_canvas() {
        let mut doc = DocumentState::new();
        doc.dimensions = Dimensions::new(1200, 540);
        let mut layer = TextLayer::new("Hi");
        layer.size = Some(100.0);
        doc.set_text(TextKind::Title, layer);
        let scene = build_scene(&doc);
        assert_eq!(scene.find_text(TextKind::Title).unwrap().1.font_size, 50.0);
    }

    #[test]
    fn test_alignment_cascade() {
        let mut doc = two_rows();
        doc.layout = doc
            .layout
            .clone()
            .with_alignment(TextAlign::Left, VerticalAlign::End);
        doc.set_cell_alignment(
            1,
            CellAlignment {
                text_align: Some(TextAlign::Right),
                text_vertical_align: None,
            },
        );
        doc.set_text(TextKind::BodyHeading, TextLayer::new("Heading"));
        doc.set_text(
            TextKind::BodyText,
            TextLayer::new("Body").with_align(TextAlign::Center),
        );

        let scene = build_scene(&doc);
        assert_eq!(scene.cells[0].text_align, TextAlign::Left);
        assert_eq!(scene.cells[0].vertical_align, VerticalAlign::End);

        // auto placement puts supporting text in cell 0 (no images)
        let (_, heading) = scene.find_text(TextKind::BodyHeading).unwrap();
        assert_eq!(heading.align, TextAlign::Left);
        let (_, body) = scene.find_text(TextKind::BodyText).unwrap();
        assert_eq!(body.align, TextAlign::Center);

        doc.assign_text(TextKind::BodyHeading, Some(1));
        let scene = build_scene(&doc);
        let (cell, heading) = scene.find_text(TextKind::BodyHeading).unwrap();
        assert_eq!(cell.index(), 1);
        assert_eq!(heading.align, TextAlign::Right);
        assert_eq!(heading.vertical_align, VerticalAlign::End);
        assert_eq!(heading.bounds.bottom(), cell.content_box.bottom());
    }

    #[test]
    fn test_overlay_stack_and_paint_order() {
        let mut doc = two_rows();
        doc.add_image(
            ImagePoolEntry::new("hero", "hero.jpg")
                .with_overlay(OverlaySettings::new("solid", "#000000", 40.0)),
        );
        doc.assign_image(0, Some("hero"));
        doc.set_cell_overlay(0, CellOverlay::custom("grain", "primary", 25.0));
        doc.set_text(TextKind::Title, TextLayer::new("Title"));
        doc.frame.cells.insert(0, FrameSpec::new(50.0, "accent"));

        let scene = build_scene(&doc);
        let cell = &scene.cells[0];
        assert_eq!(cell.overlays.len(), 2);
        assert_eq!(cell.overlays[0].source, LayerSource::Image);
        assert_eq!(cell.overlays[1].source, LayerSource::Cell);
        assert!(matches!(cell.overlays[1].kind, OverlayKind::Texture(_)));

        let order: Vec<&str> = cell
            .paint_order()
            .iter()
            .map(|step| match step {
                PaintStep::Background(_) => "background",
                PaintStep::Image(_) => "image",
                PaintStep::Overlay(_) => "overlay",
                PaintStep::Text(_) => "text",
                PaintStep::Frame(_) => "frame",
            })
            .collect();
        assert_eq!(
            order,
            vec!["background", "image", "overlay", "overlay", "text", "frame"]
        );
        assert_eq!(cell.frame.as_ref().unwrap().width, 20);
    }

    #[test]
    fn test_duotone_forces_grayscale() {
        let mut doc = two_rows();
        doc.add_image(
            ImagePoolEntry::new("hero", "hero.jpg")
                .with_overlay(OverlaySettings::new("duotone", "accent", 60.0))
                .with_filters(ImageFilters {
                    blur: 2.0,
                    ..ImageFilters::default()
                }),
        );
        doc.assign_image(0, Some("hero"));
        let scene = build_scene(&doc);
        let image = scene.cells[0].image.as_ref().unwrap();
        assert_eq!(
            image.filters.expression().as_deref(),
            Some("grayscale(100%) blur(2px)")
        );
    }

    #[test]
    fn test_transparent_duotone_still_forces_grayscale() {
        let mut doc = two_rows();
        doc.add_image(
            ImagePoolEntry::new("hero", "hero.jpg")
                .with_overlay(OverlaySettings::new("duotone", "accent", 0.0)),
        );
        doc.assign_image(0, Some("hero"));
        let scene = build_scene(&doc);
        assert!(scene.cells[0].overlays.is_empty());
        let image = scene.cells[0].image.as_ref().unwrap();
        assert_eq!(image.filters.expression().as_deref(), Some("grayscale(100%)"));
    }

    #[test]
    fn test_empty_cell_inherits_global_overlay_only_when_configured() {
        let mut doc = two_rows();
        doc.overlay = OverlaySettings::new("solid", "black", 30.0);
        let scene = build_scene(&doc);
        assert!(scene.cells[1].overlays.is_empty());

        doc.set_cell_overlay(1, CellOverlay::inherit());
        let scene = build_scene(&doc);
        assert_eq!(scene.cells[1].overlays.len(), 1);
        assert_eq!(scene.cells[1].overlays[0].effect.opacity(), 0.3);
    }

    #[test]
    fn test_outer_frame_and_padding_override() {
        let mut doc = two_rows();
        doc.padding = Padding::new(60.0).with_cell(1, 10.0);
        doc.frame.outer = Some(FrameSpec::new(25.0, "white"));
        let scene = build_scene(&doc);
        assert_eq!(scene.outer_frame.as_ref().unwrap().width, 15);
        assert_eq!(scene.cells[1].padding, 10.0);
        assert_eq!(scene.cells[1].content_box.x, 10.0);
    }

    #[test]
    fn test_logo_placement() {
        let dims = Dimensions::new(1000, 500);
        let mut logo = Logo::new("logo.png");
        logo.size = 20.0;

        let placed = place_logo(&logo, &dims, 40.0);
        assert_eq!(placed.bounds, BoundingBox::new(860.0, 360.0, 100.0, 100.0));

        logo.position = LogoPosition::TopLeft;
        assert_eq!(place_logo(&logo, &dims, 40.0).bounds.x, 40.0);

        logo.position = LogoPosition::Center;
        let centered = place_logo(&logo, &dims, 40.0).bounds;
        assert_eq!((centered.x, centered.y), (450.0, 200.0));
    }

    #[test]
    fn test_fullbleed_scene() {
        let mut doc = DocumentState::new();
        doc.add_image(ImagePoolEntry::new("bg", "bg.jpg"));
        doc.assign_image(0, Some("bg"));
        doc.set_text(TextKind::Title, TextLayer::new("Title"));
        doc.set_text(TextKind::Footnote, TextLayer::new("Note"));
        let scene = build_scene(&doc);
        assert_eq!(scene.cells.len(), 1);
        assert_eq!(scene.cells[0].on_image_text.len(), 2);
        assert!(scene.cells[0].background_text.is_empty());
    }
}
