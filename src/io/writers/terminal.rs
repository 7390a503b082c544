use crate::analysis::{ArchitectureReport, LayerBucket};
use crate::core::{BubbleTeaData, CompositionEntry};
use crate::io::output::OutputWriter;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use std::io::Write;

const RULE: &str = "═══════════════════════════════════════════";

/// Human readable report: a summary followed by one table per occupied bucket
pub struct TerminalWriter<W: Write> {
    writer: W,
    colors: bool,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            colors: true,
        }
    }

    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    fn heading(&self, text: &str) -> String {
        if self.colors {
            text.bold().cyan().to_string()
        } else {
            text.to_string()
        }
    }

    fn bucket_title(&self, bucket: &LayerBucket) -> String {
        let title = format!("{} ({})", bucket.key.label(), bucket.packages.len());
        match (self.colors, bucket.key.is_cross_cutting()) {
            (false, _) => title,
            (true, true) => title.bold().yellow().to_string(),
            (true, false) => title.bold().green().to_string(),
        }
    }

    fn write_header(&mut self, report: &ArchitectureReport) -> anyhow::Result<()> {
        let rule = self.heading(RULE);
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", rule)?;
        writeln!(self.writer, "{}", self.heading("      LAYER ARCHITECTURE REPORT"))?;
        writeln!(self.writer, "{}", rule)?;
        writeln!(self.writer)?;
        writeln!(self.writer, "Layers: {}", report.layers.join(" → "))?;
        writeln!(
            self.writer,
            "Generated: {}",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        Ok(())
    }

    fn write_summary(&mut self, report: &ArchitectureReport) -> anyhow::Result<()> {
        let summary = &report.summary;
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", self.heading("Summary"))?;
        writeln!(self.writer, "───────────────────────────────────────────")?;
        writeln!(self.writer, "Packages:      {}", summary.package_count)?;
        writeln!(self.writer, "Classes:       {}", summary.class_count)?;
        writeln!(self.writer, "Cross-cutting: {}", summary.cross_cutting_count)?;
        Ok(())
    }

    fn write_bucket(&mut self, bucket: &LayerBucket) -> anyhow::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", self.bucket_title(bucket))?;
        writeln!(self.writer, "{}", bucket_table(&bucket.packages))?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &ArchitectureReport) -> anyhow::Result<()> {
        self.write_header(report)?;
        self.write_summary(report)?;

        if report.summary.package_count == 0 {
            writeln!(self.writer)?;
            writeln!(self.writer, "No packages found in the graph.")?;
        }
        for bucket in report.buckets.occupied() {
            self.write_bucket(bucket)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

fn bucket_table(packages: &[BubbleTeaData]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Package", "Classes", "Dominant", "Composition"]);

    for package in packages {
        let dominant = if package.dominant.is_empty() {
            "-".to_string()
        } else {
            package.dominant.join(", ")
        };
        table.add_row(vec![
            Cell::new(&package.package),
            Cell::new(package.class_count()).set_alignment(CellAlignment::Right),
            Cell::new(dominant),
            Cell::new(format_composition(&package.bubble_tea_data)),
        ]);
    }
    table
}

/// Shares as percentages, largest first
fn format_composition(entries: &[CompositionEntry]) -> String {
    let mut sorted: Vec<&CompositionEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.count.total_cmp(&a.count));
    sorted
        .iter()
        .map(|e| format!("{} {:.0}%", e.layer, e.count * 100.0))
        .collect::<Vec<_>>()
        .join("\n")
}
