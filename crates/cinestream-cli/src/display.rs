use cinestream_models::{CatalogFields, ItemKey};
use comfy_table::{modifiers, presets, Attribute, Cell, Color, Table};

/// "1 title", "3 titles"
pub fn titles_label(count: usize) -> String {
    if count == 1 {
        "1 title".to_string()
    } else {
        format!("{} titles", count)
    }
}

pub fn styled_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table
}

/// Table of catalog titles. `saved` marks rows already in My List.
pub fn titles_table<'a, T, I>(rows: I, saved: impl Fn(ItemKey) -> bool) -> Table
where
    T: CatalogFields + 'a,
    I: IntoIterator<Item = (ItemKey, &'a T)>,
{
    let mut table = styled_table();
    table.set_header(vec![
        Cell::new("Key").add_attribute(Attribute::Bold),
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Type").add_attribute(Attribute::Bold),
        Cell::new("Year").add_attribute(Attribute::Bold),
        Cell::new("Score").add_attribute(Attribute::Bold),
        Cell::new("My List").add_attribute(Attribute::Bold),
    ]);

    for (key, record) in rows {
        table.add_row(vec![
            Cell::new(key.to_string()).fg(Color::Cyan),
            Cell::new(record.title().unwrap_or("(untitled)")),
            Cell::new(key.media_type.label()),
            Cell::new(record.release_year().map(|y| y.to_string()).unwrap_or_default()),
            Cell::new(score_label(record.score_percent())),
            Cell::new(if saved(key) { "✓" } else { "" }).fg(Color::Green),
        ]);
    }
    table
}

pub fn score_label(score: Option<u32>) -> String {
    score.map(|s| format!("{}%", s)).unwrap_or_else(|| "NR".to_string())
}
