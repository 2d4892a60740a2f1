use comfy_table::{modifiers, presets, Attribute, Cell, Color, Table};
use media_lists_core::SortSelection;
use media_lists_models::{MediaList, MediaRef};

fn styled(mut table: Table) -> Table {
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table
}

fn header(cells: &[&str]) -> Vec<Cell> {
    cells
        .iter()
        .map(|c| Cell::new(c).fg(Color::Cyan).add_attribute(Attribute::Bold))
        .collect()
}

pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

fn short_date(list: &MediaList) -> String {
    list.created_at
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn visibility(list: &MediaList) -> &'static str {
    match (list.is_public, list.is_collaborative) {
        (true, true) => "public, shared",
        (true, false) => "public",
        (false, true) => "shared",
        (false, false) => "private",
    }
}

pub fn lists_table(lists: &[&MediaList], show_owner: bool) -> Table {
    let mut table = Table::new();
    let mut columns = vec!["#", "Name", "Items", "Created", "Visibility", "Id"];
    if show_owner {
        columns.insert(2, "Owner");
    }
    table.set_header(header(&columns));

    for (index, list) in lists.iter().enumerate() {
        let mut row = vec![
            Cell::new(index + 1),
            Cell::new(truncate(&list.name, 40)).add_attribute(Attribute::Bold),
            Cell::new(list.item_count()),
            Cell::new(short_date(list)),
            Cell::new(visibility(list)),
            Cell::new(&list.id).fg(Color::DarkGrey),
        ];
        if show_owner {
            row.insert(2, Cell::new(list.owner.as_deref().unwrap_or("-")));
        }
        table.add_row(row);
    }
    styled(table)
}

pub fn items_table(items: &[MediaRef]) -> Table {
    let mut table = Table::new();
    table.set_header(header(&["#", "Title", "Type", "Year", "Id"]));
    for (index, item) in items.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(truncate(&item.title, 50)),
            Cell::new(item.kind),
            Cell::new(item.year.map(|y| y.to_string()).unwrap_or_default()),
            Cell::new(&item.id).fg(Color::DarkGrey),
        ]);
    }
    styled(table)
}

pub fn list_details(list: &MediaList) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new(&list.name).fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(&list.id).fg(Color::DarkGrey),
    ]);
    let description = if list.description.is_empty() {
        "-".to_string()
    } else {
        list.description.clone()
    };
    table.add_row(vec![Cell::new("Description"), Cell::new(description)]);
    table.add_row(vec![Cell::new("Owner"), Cell::new(list.owner.as_deref().unwrap_or("-"))]);
    table.add_row(vec![Cell::new("Visibility"), Cell::new(visibility(list))]);
    let collaborators = if list.collaborators.is_empty() {
        "-".to_string()
    } else {
        list.collaborators.join(", ")
    };
    table.add_row(vec![Cell::new("Collaborators"), Cell::new(collaborators)]);
    table.add_row(vec![Cell::new("Created"), Cell::new(short_date(list))]);
    table.add_row(vec![Cell::new("Items"), Cell::new(list.item_count())]);
    styled(table)
}

pub fn sort_caption(selection: SortSelection, count: usize) -> String {
    format!("{} list(s), sorted by {}", count, selection.label())
}
