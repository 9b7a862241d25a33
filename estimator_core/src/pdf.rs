//! # PDF Export
//!
//! Renders a material list to PDF using Typst.
//!
//! - The Typst template is embedded as a string constant
//! - Estimate data is injected via string replacement before compilation
//! - Fonts come from `typst-assets`; nothing is read from disk
//!
//! ## Example
//!
//! ```rust,no_run
//! use estimator_core::calculations::{calculate_deck, DeckConfig};
//! use estimator_core::pdf::render_estimate_pdf;
//!
//! let estimate = calculate_deck(&DeckConfig::default()).unwrap();
//! let pdf_bytes = render_estimate_pdf(&estimate, "Backyard deck").unwrap();
//! std::fs::write("deck_materials.pdf", pdf_bytes).unwrap();
//! ```

use chrono::Utc;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::errors::{EstimateError, EstimateResult};
use crate::estimate::{MaterialItem, ProjectEstimate};

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling a single in-memory document.
struct PdfWorld {
    main: Source,
    book: LazyHash<FontBook>,
    fonts: Vec<Font>,
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }

    fn load_fonts() -> Vec<Font> {
        typst_assets::fonts()
            .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
            .collect()
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// Template
// ============================================================================

const ESTIMATE_TEMPLATE: &str = r##"
#set page(
  paper: "us-letter",
  margin: (top: 1in, bottom: 1in, left: 1in, right: 1in),
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 9pt)[Estimate {{ESTIMATE_ID}}]],
      align(center)[#text(size: 9pt)[Page #counter(page).display()]],
      align(right)[#text(size: 9pt)[{{DATE}}]],
    )
  ]
)

#set text(font: "Libertinus Serif", size: 11pt)

#align(center)[
  #block(width: 100%, fill: rgb("#f3ede4"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[{{PROJECT_TYPE}} Material List]
    #v(4pt)
    #text(size: 14pt)[{{TITLE}}]
  ]
]

#v(12pt)

*Dimensions:* {{DIMENSIONS}} #h(1fr) *Waste factor:* {{WASTE_PCT}}%

#v(8pt)

#table(
  columns: (2fr, 3fr, auto, auto),
  align: (left, left, right, left),
  stroke: 0.5pt + gray,
  [*Material*], [*Notes*], [*Qty*], [*Unit*],
{{ROWS}}
)

#v(12pt)

#text(size: 9pt, fill: gray)[{{FOOTNOTE}}]
"##;

/// Render an estimate's material list to PDF.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(EstimateError::ExportFailed)` - Typst compilation or rendering failed
pub fn render_estimate_pdf(estimate: &ProjectEstimate, title: &str) -> EstimateResult<Vec<u8>> {
    let footnote = if estimate.waste_factor > 0.0 {
        "Surface decking and joist footage include the waste factor. Always verify spans and load requirements with local building codes."
    } else {
        "Quantities are based on standard spacing. Gates or terrain changes will require extra lumber."
    };

    let source = ESTIMATE_TEMPLATE
        .replace("{{ESTIMATE_ID}}", &escape_typst(&estimate.id))
        .replace("{{DATE}}", &estimate.created.format("%Y-%m-%d").to_string())
        .replace("{{PROJECT_TYPE}}", estimate.project_type.display_name())
        .replace("{{TITLE}}", &escape_typst(title))
        .replace("{{DIMENSIONS}}", &escape_typst(&estimate.dimensions))
        .replace("{{WASTE_PCT}}", &format!("{:.0}", estimate.waste_factor * 100.0))
        .replace("{{ROWS}}", &build_rows(&estimate.materials))
        .replace("{{FOOTNOTE}}", footnote);

    let world = PdfWorld::new(source);

    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        EstimateError::export_failed("pdf", format!("Typst compilation failed: {}", error_msgs.join("; ")))
    })?;

    typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        EstimateError::export_failed("pdf", format!("PDF rendering failed: {}", error_msgs.join("; ")))
    })
}

/// Escape special Typst characters in user-provided text
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '[' => "\\[".to_string(),
            ']' => "\\]".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

fn build_rows(materials: &[MaterialItem]) -> String {
    materials
        .iter()
        .map(|m| {
            format!(
                "  [{}], [{}], [{}], [{}],",
                escape_typst(&m.name),
                escape_typst(&m.description),
                m.quantity,
                m.unit.label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
