use std::io::BufWriter;

use printpdf::image_crate::{self, GenericImageView};
use printpdf::*;

use super::{ExportError, PatientReport};
use crate::config;
use crate::models::enums::FileType;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const LEFT_MARGIN: f32 = 20.0;
const TOP_Y: f32 = 280.0;
const BOTTOM_MARGIN: f32 = 20.0;
const LINE_HEIGHT: f32 = 8.0;
const IMAGE_WIDTH_MM: f32 = 50.0;
const WRAP_CHARS: usize = 85;

/// Cursor over an A4 document that starts a new page when it runs out of room.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self, ExportError> {
        let (doc, page1, layer1) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let layer = doc.get_page(page1).get_layer(layer1);
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Pdf(format!("font error: {e}")))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Pdf(format!("font error: {e}")))?;

        Ok(Self {
            doc,
            layer,
            font,
            bold,
            y: TOP_Y,
        })
    }

    fn ensure_space(&mut self, needed: f32) {
        if self.y - needed < BOTTOM_MARGIN {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP_Y;
        }
    }

    fn heading(&mut self, text: &str, size: f32) {
        self.ensure_space(LINE_HEIGHT);
        self.layer
            .use_text(text, size, Mm(LEFT_MARGIN), Mm(self.y), &self.bold);
        self.y -= LINE_HEIGHT;
    }

    fn line(&mut self, text: &str) {
        for wrapped in wrap_text(text, WRAP_CHARS) {
            self.ensure_space(LINE_HEIGHT);
            self.layer
                .use_text(wrapped, 12.0, Mm(LEFT_MARGIN), Mm(self.y), &self.font);
            self.y -= LINE_HEIGHT;
        }
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }

    /// Embeds an image scaled to a fixed width. Returns false if the bytes do not decode.
    fn image(&mut self, data: &[u8]) -> bool {
        let decoded = match image_crate::load_from_memory(data) {
            Ok(img) => img,
            Err(_) => return false,
        };
        let (width_px, height_px) = decoded.dimensions();
        if width_px == 0 || height_px == 0 {
            return false;
        }

        let (dpi, height_mm) = image_fit(width_px, height_px);

        self.ensure_space(height_mm + 2.0);
        let rgb = image_crate::DynamicImage::ImageRgb8(decoded.to_rgb8());
        Image::from_dynamic_image(&rgb).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(LEFT_MARGIN)),
                translate_y: Some(Mm(self.y - height_mm)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
        self.y -= height_mm + 2.0;
        true
    }

    fn finish(self) -> Result<Vec<u8>, ExportError> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| ExportError::Pdf(format!("save error: {e}")))?;
        buf.into_inner()
            .map_err(|e| ExportError::Pdf(format!("buffer error: {e}")))
    }
}

/// Dpi and rendered height (mm) for an image drawn IMAGE_WIDTH_MM wide.
/// Tall images are scaled down further so they fit on one page.
fn image_fit(width_px: u32, height_px: u32) -> (f32, f32) {
    // printpdf sizes images by dpi: pick the dpi that maps width_px onto IMAGE_WIDTH_MM
    let mut dpi = width_px as f32 * 25.4 / IMAGE_WIDTH_MM;
    let mut height_mm = height_px as f32 * 25.4 / dpi;
    let max_height = TOP_Y - BOTTOM_MARGIN - 2.0;
    if height_mm > max_height {
        dpi = height_px as f32 * 25.4 / max_height;
        height_mm = max_height;
    }
    (dpi, height_mm)
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}

/// Renders a patient report to PDF bytes.
///
/// Image attachments are embedded inline; ones that fail to decode are
/// skipped with a warning rather than failing the export.
pub fn render_patient_report(report: &PatientReport) -> Result<Vec<u8>, ExportError> {
    let p = &report.patient;
    let mut w = PageWriter::new(&format!("Patient Record - {}", p.name))?;

    w.heading(config::CLINIC_NAME, 18.0);
    w.heading("Patient Record", 18.0);
    w.gap(6.0);

    w.heading(&format!("Patient ID: {}", p.id), 14.0);
    let age = p.age.map(|a| a.to_string()).unwrap_or_default();
    let last_visit = p.last_visit.clone().unwrap_or_default();
    for (label, value) in [
        ("Name", p.name.as_str()),
        ("Age", age.as_str()),
        ("Gender", p.gender.as_str()),
        ("Phone", p.phone.as_str()),
        ("Address", p.address.as_str()),
        ("Occupation", p.occupation.as_str()),
        ("Diagnosis", p.diagnosis.as_str()),
        ("Prescription", p.prescription.as_str()),
        ("Last Visit", last_visit.as_str()),
        ("Doctor", p.doctor.as_str()),
    ] {
        w.line(&format!("{label}: {}", or_na(value)));
    }

    w.gap(6.0);
    w.heading("Visit History", 14.0);
    if report.visits.is_empty() {
        w.line("No visit history found");
    }
    for visit in &report.visits {
        w.gap(4.0);
        w.line(&format!("Visit ID: {}", visit.id));
        w.line(&format!("Date: {}", or_na(&visit.date)));
        w.line(&format!("Diagnosis: {}", or_na(&visit.diagnosis)));
        w.line(&format!("Prescription: {}", or_na(&visit.prescription)));
        w.line(&format!("Doctor: {}", or_na(&visit.doctor)));
        w.line(&format!("Price: ${:.2}", visit.price));
    }

    w.gap(6.0);
    w.heading("Patient Files", 14.0);
    if report.files.is_empty() {
        w.line("No files attached");
    }
    for file in &report.files {
        w.gap(4.0);
        w.line(&format!("File Name: {}", file.file_name));
        w.line(&format!("File Type: {}", file.file_type));
        w.line(&format!("Upload Date: {}", file.upload_date));
        if file.file_type == FileType::Image && !file.file_data.is_empty() && !w.image(&file.file_data) {
            tracing::warn!(
                file_id = file.id,
                file_name = %file.file_name,
                "Skipping undecodable image in patient report"
            );
        }
    }

    w.finish()
}

/// Simple word-wrap helper for PDF text rendering.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_chars && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
