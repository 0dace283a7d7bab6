// ===== demoforge/src/reports/mod.rs =====
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use demoforge::registry::Registry;
use demoforge::scorer::Scorer;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

// Color bands for similarity scores (range 0..=1).
fn score_cell(score: f32) -> Cell {
    let text = format!("{:.4}", score);
    if score >= 0.9 {
        Cell::new(text).fg(Color::Green)
    } else if score >= 0.5 {
        Cell::new(text).fg(Color::Yellow)
    } else {
        Cell::new(text).fg(Color::Red)
    }
}

pub fn print_county_table(registry: &Registry, scorer: &Scorer) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("County").add_attribute(Attribute::Bold),
        Cell::new("Region"),
        Cell::new("Population"),
        Cell::new("Descriptors"),
        Cell::new("Score").fg(Color::Cyan),
    ]);

    for i in 2..=4 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for (id, county) in registry.counties.iter().enumerate() {
        table.add_row(vec![
            Cell::new(&county.name).add_attribute(Attribute::Bold),
            Cell::new(&county.region),
            Cell::new(format!("{}", county.population)),
            Cell::new(format!("{}", county.assigned.len())),
            score_cell(scorer.score(id).unwrap_or(0.0)),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_descriptor_table(registry: &Registry) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Descriptor").add_attribute(Attribute::Bold),
        Cell::new("Fixed"),
        Cell::new("Effects"),
        Cell::new("Total Weight"),
        Cell::new("Counties"),
    ]);

    for i in 2..=4 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for (id, descriptor) in registry.descriptors.iter().enumerate() {
        let usage = registry
            .counties
            .iter()
            .filter(|c| c.has_descriptor(id))
            .count();
        table.add_row(vec![
            Cell::new(&descriptor.name).add_attribute(Attribute::Bold),
            Cell::new(if descriptor.fixed { "yes" } else { "" }),
            Cell::new(format!("{}", descriptor.effects.len())),
            Cell::new(format!("{:.4}", descriptor.effects.total())),
            Cell::new(format!("{}", usage)),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_score_report(results: &[(String, f32)], mean: f32) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("County").add_attribute(Attribute::Bold),
        Cell::new("Score").fg(Color::Cyan),
    ]);

    if let Some(col) = table.column_mut(1) {
        col.set_cell_alignment(CellAlignment::Right);
    }

    for (name, score) in results {
        table.add_row(vec![
            Cell::new(name).add_attribute(Attribute::Bold),
            score_cell(*score),
        ]);
    }
    table.add_row(vec![
        Cell::new("MEAN").add_attribute(Attribute::Bold),
        Cell::new(format!("{:.6}", mean))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
    ]);
    println!("\n{}", table);
}

/// Writes the final registry state as plain text, one county per line
/// followed by one descriptor per line.
pub fn write_dump(registry: &Registry, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);

    for county in &registry.counties {
        let names: Vec<&str> = county
            .assigned
            .iter()
            .map(|&d| registry.descriptors[d].name.as_str())
            .collect();
        writeln!(
            out,
            "{}, {} | population: {} | descriptors: [{}];",
            county.name,
            county.region,
            county.population,
            names.join(", ")
        )?;
    }
    for descriptor in &registry.descriptors {
        writeln!(out, "{}", descriptor)?;
    }
    out.flush()
}
