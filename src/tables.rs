use comfy_table::{Attribute, Cell, CellAlignment, Table, modifiers, presets};
use daterange::{Period, Result, Span, instant::ISO_8601};

pub fn build_period_table(period: &Period) -> Result<Table> {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table.set_header(vec!["#", "Instant", "Since start"]);
    for (index, instant) in period.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index).set_alignment(CellAlignment::Right).add_attribute(Attribute::Dim),
            Cell::new(instant.format(ISO_8601)),
            Cell::new(Span::between(period.start().naive_local(), instant.naive_local())?).set_alignment(CellAlignment::Right),
        ]);
    }
    Ok(table)
}
