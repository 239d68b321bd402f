//! Table output in text, JSON and CSV form, plus the residue list and viewer summary.
//!
//! Text output is coloured according to the active theme; the probability column shows
//! a ten-segment gauge tinted along the red-to-green probability ramp.

use crate::error::{CliError, Result};
use console::Style;
use serde::Serialize;
use zincsight::core::io::pdb::{InsertionPoint, TERMINATOR_RECORD};
use zincsight::core::models::record::PredictionRecord;
use zincsight::core::table::{PROBABILITY_STEPS, TablePage, probability_color, probability_steps};
use zincsight::core::theme::Theme;
use zincsight::engine::session::{ViewerFocus, ZINC_SELECTOR};

const GAUGE_FILLED: char = '■';
const GAUGE_EMPTY: char = '·';
const COLUMN_GAP: &str = "  ";
const HEADERS: [&str; 5] = ["Key", "Structure", "Residues", "Probability", "Secondary"];

/// Maps a `#RRGGBB` colour to the closest entry of the xterm 6x6x6 colour cube.
fn ansi256_from_hex(hex: &str) -> Option<u8> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| -> Option<u8> {
        let value = u8::from_str_radix(hex.get(i..i + 2)?, 16).ok()?;
        Some(((u16::from(value) * 5 + 127) / 255) as u8)
    };
    Some(16 + 36 * channel(0)? + 6 * channel(2)? + channel(4)?)
}

/// Styles used for text output under one theme.
#[derive(Debug, Clone)]
pub struct Palette {
    styled: bool,
    header: Style,
    muted: Style,
    catalytic: Style,
}

impl Palette {
    pub fn new(theme: Theme, styled: bool) -> Self {
        let base = Style::new().force_styling(styled);
        let (header, muted, catalytic) = match theme {
            Theme::Dark => (
                base.clone().white().bold(),
                base.clone().color256(244),
                base.clone().cyan(),
            ),
            Theme::Light => (
                base.clone().black().bold(),
                base.clone().color256(247),
                base.clone().blue(),
            ),
        };
        Self {
            styled,
            header,
            muted,
            catalytic,
        }
    }

    fn probability(&self, probability: f64) -> Style {
        let style = Style::new().force_styling(self.styled);
        match ansi256_from_hex(probability_color(probability)) {
            Some(code) => style.color256(code),
            None => style,
        }
    }
}

fn gauge(probability: f64) -> (String, String) {
    let filled = probability_steps(probability, PROBABILITY_STEPS).min(PROBABILITY_STEPS);
    (
        GAUGE_FILLED.to_string().repeat(filled),
        GAUGE_EMPTY.to_string().repeat(PROBABILITY_STEPS - filled),
    )
}

fn probability_text(probability: f64) -> String {
    format!("{:>5.1}%", probability)
}

/// Renders a page as an aligned, coloured text table with a page footer.
pub fn render_text(page: &TablePage, palette: &Palette) -> String {
    if page.rows.is_empty() {
        return format!("{}\n", palette.muted.apply_to("No matching records."));
    }

    let probability_width = PROBABILITY_STEPS + 1 + probability_text(100.0).len();
    let mut widths = HEADERS.map(|h| h.chars().count());
    widths[3] = widths[3].max(probability_width);
    for record in &page.rows {
        widths[0] = widths[0].max(record.key.chars().count());
        widths[1] = widths[1].max(record.structure_id.chars().count());
        widths[2] = widths[2].max(record.ligand_residue_type.chars().count());
        widths[4] = widths[4].max(record.secondary_label().chars().count());
    }

    let mut out = String::new();
    let header: Vec<String> = HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| palette.header.apply_to(format!("{:<w$}", h)).to_string())
        .collect();
    out.push_str(header.join(COLUMN_GAP).trim_end());
    out.push('\n');

    for record in &page.rows {
        let (filled, empty) = gauge(record.predicted_probability);
        let probability = format!(
            "{}{} {}",
            palette.probability(record.predicted_probability).apply_to(filled),
            palette.muted.apply_to(empty),
            probability_text(record.predicted_probability)
        );
        let secondary_style = if record.secondary_prediction {
            &palette.catalytic
        } else {
            &palette.muted
        };
        let cells = [
            format!("{:<w$}", record.key, w = widths[0]),
            format!("{:<w$}", record.structure_id, w = widths[1]),
            format!("{:<w$}", record.ligand_residue_type, w = widths[2]),
            format!(
                "{}{}",
                probability,
                " ".repeat(widths[3].saturating_sub(probability_width))
            ),
            secondary_style
                .apply_to(format!("{:<w$}", record.secondary_label(), w = widths[4]))
                .to_string(),
        ];
        out.push_str(cells.join(COLUMN_GAP).trim_end());
        out.push('\n');
    }

    out.push_str(
        &palette
            .muted
            .apply_to(format!(
                "Page {} of {} ({} matching record{})",
                page.page,
                page.page_count,
                page.total,
                if page.total == 1 { "" } else { "s" }
            ))
            .to_string(),
    );
    out.push('\n');
    out
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonPage<'a> {
    page: usize,
    page_count: usize,
    total: usize,
    rows: &'a [&'a PredictionRecord],
}

pub fn render_json(page: &TablePage) -> Result<String> {
    let body = JsonPage {
        page: page.page,
        page_count: page.page_count,
        total: page.total,
        rows: &page.rows,
    };
    serde_json::to_string_pretty(&body).map_err(|e| CliError::Other(e.into()))
}

pub fn render_csv(page: &TablePage) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "key",
            "structure_id",
            "pdb_zn_resseq",
            "ligand_resi_type",
            "zincsight_prob",
            "pred_zn_coord",
            "mahomes2_prediction",
            "mahomes2_prob_catalytic",
        ])
        .map_err(|e| CliError::Other(e.into()))?;

    for record in &page.rows {
        let (x, y, z) = record.ion_xyz();
        writer
            .write_record([
                record.key.clone(),
                record.structure_id.clone(),
                record.site_residue_sequence.clone(),
                record.ligand_residue_type.clone(),
                record.predicted_probability.to_string(),
                format!("{},{},{}", x, y, z),
                record.secondary_label().to_string(),
                record
                    .secondary_probability
                    .map(|p| p.to_string())
                    .unwrap_or_default(),
            ])
            .map_err(|e| CliError::Other(e.into()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to flush CSV output: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| CliError::Other(e.into()))
}

/// Renders the distinct residue signatures, one per line.
pub fn render_residues(signatures: &[String], palette: &Palette) -> String {
    let mut out = String::new();
    for signature in signatures {
        out.push_str(signature);
        out.push('\n');
    }
    out.push_str(
        &palette
            .muted
            .apply_to(format!("{} distinct signature(s)", signatures.len()))
            .to_string(),
    );
    out.push('\n');
    out
}

fn format_point(x: f64, y: f64, z: f64) -> String {
    format!("({:.3}, {:.3}, {:.3})", x, y, z)
}

/// Summarizes an opened viewer: what was annotated and where the camera points.
pub fn render_focus(focus: &ViewerFocus, palette: &Palette) -> String {
    let ion = focus.annotated.ion;
    let insertion = match focus.annotated.insertion {
        InsertionPoint::AfterTerminator { terminator_line } => format!(
            "after {} record on line {}",
            TERMINATOR_RECORD,
            terminator_line + 1
        ),
        InsertionPoint::Prepended => format!("at top of file (no {} record)", TERMINATOR_RECORD),
    };
    let camera = focus.camera;
    let rows = [
        ("Record", focus.key.clone()),
        ("Structure", focus.annotated.structure_id.clone()),
        ("Zinc ion", format_point(ion.x, ion.y, ion.z)),
        ("Inserted", insertion),
        (
            "Selection",
            format!("{} atom(s) with element {}", focus.loci.len(), ZINC_SELECTOR),
        ),
        (
            "Camera",
            format!(
                "target {}, radius {:.2}",
                format_point(camera.target.x, camera.target.y, camera.target.z),
                camera.radius
            ),
        ),
    ];

    let mut out = String::new();
    for (label, value) in rows {
        out.push_str(&format!(
            "{}{}{}\n",
            palette.header.apply_to(format!("{:<10}", label)),
            COLUMN_GAP,
            value
        ));
    }
    out
}
