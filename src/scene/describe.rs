//! Plain-text dump of a scene, one line per painted element

use std::fmt::Write;

use super::{Scene, SceneCell, TextRun};
use crate::overlay::{LayerSource, OverlayLayer};

impl Scene {
    /// Indented tree of everything the scene paints
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "scene {}x{}", self.width, self.height);
        if let Some(frame) = &self.outer_frame {
            let _ = writeln!(out, "  frame {}px {}", frame.width, frame.color);
        }
        for cell in &self.cells {
            describe_cell(&mut out, cell);
        }
        if let Some(logo) = &self.logo {
            let _ = writeln!(
                out,
                "  logo {} {} at {:.1},{:.1} size {:.1}",
                logo.src,
                logo.position.as_str(),
                logo.bounds.x,
                logo.bounds.y,
                logo.bounds.width
            );
        }
        out
    }
}

fn describe_cell(out: &mut String, cell: &SceneCell) {
    let b = &cell.bounds;
    let _ = writeln!(
        out,
        "  cell {} [{}.{}] {:.1},{:.1} {:.1}x{:.1} padding {:.1}",
        cell.index(),
        cell.cell.section_index,
        cell.cell.sub_index,
        b.x,
        b.y,
        b.width,
        b.height,
        cell.padding
    );
    let _ = writeln!(out, "    background {}", cell.background);
    if let Some(image) = &cell.image {
        let _ = writeln!(
            out,
            "    image {} ({}) {} at {}%,{}% filter {}",
            image.id,
            image.src,
            image.fit.as_str(),
            image.position.x,
            image.position.y,
            image.filters
        );
    }
    for layer in &cell.overlays {
        describe_overlay(out, layer);
    }
    for run in cell.text_runs() {
        describe_run(out, run);
    }
    if let Some(frame) = &cell.frame {
        let _ = writeln!(out, "    frame {}px {}", frame.width, frame.color);
    }
}

fn describe_overlay(out: &mut String, layer: &OverlayLayer) {
    let source = match layer.source {
        LayerSource::Image => "image",
        LayerSource::Cell => "cell",
    };
    let paint = layer
        .effect
        .paint()
        .unwrap_or_else(|| format!("opacity {:.2}", layer.effect.opacity()));
    let _ = writeln!(out, "    overlay {} {} {}", source, layer.kind.id(), paint);
}

fn describe_run(out: &mut String, run: &TextRun) {
    let mut style = format!("{} {:.1}px {}", run.font_family, run.font_size, run.color);
    if run.bold {
        style.push_str(" bold");
    }
    if run.italic {
        style.push_str(" italic");
    }
    let placement = if run.shadow.is_some() {
        "on-image"
    } else {
        "background"
    };
    let _ = writeln!(
        out,
        "    text {} {} {:?} {} {}/{} y {:.1} h {:.1}",
        run.kind,
        placement,
        run.content,
        style,
        run.align.as_str(),
        run.vertical_align.as_str(),
        run.bounds.y,
        run.bounds.height
    );
}
