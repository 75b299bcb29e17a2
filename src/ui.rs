use colored::*;

use crate::{
    models::{
        area::{DraftArea, PurchasedArea},
        store::Store,
    },
    pricing::countries::country_name,
};

/// Get the terminal width, defaulting to 80 if unavailable
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

pub fn format_price(amount: f64) -> String {
    format!("€{:.2}", amount)
}

pub fn format_area(area_km2: f64) -> String {
    format!("{:.2} km²", area_km2)
}

/// Country code with its name when known, e.g. "DE (Germany)"
pub fn format_country(code: &str) -> String {
    match country_name(code) {
        Some(name) => format!("{} ({})", code, name),
        None => code.to_string(),
    }
}

/// Pricing summary shown before a purchase is confirmed
pub fn render_draft(draft: &DraftArea) {
    println!("\n  {}\n", "Draft area".cyan().bold());
    println!("  Country     {}", format_country(&draft.country_code));
    println!("  Area        {}", format_area(draft.area_km2));
    println!(
        "  Centroid    {:.4}, {:.4}",
        draft.centroid[0], draft.centroid[1]
    );
    println!("  Rate        {}/km²", format_price(draft.price_per_km2));
    println!("  Total       {}\n", format_price(draft.total_price).bold());
}

/// One purchase per line: name on the left, figures right-aligned
pub fn render_purchase_line(area: &PurchasedArea) {
    let terminal_width = get_terminal_width();

    let glyph = if area.has_image() { "▣" } else { "□" };
    let short_id: String = area.id.chars().take(8).collect();
    let left_section = format!("  {}  {}  {}", short_id.dimmed(), glyph, area.name.bold());
    let left_visible_len = format!("  {}  {}  {}", short_id, glyph, area.name)
        .chars()
        .count();

    let right_section = format!(
        "{} · {} · {}/km² · {}",
        area.country_code,
        format_area(area.area_km2),
        format_price(area.price_per_km2),
        format_price(area.total_price)
    );
    let right_visible_len = right_section.chars().count();

    let total_content = left_visible_len + right_visible_len;

    if total_content + 4 < terminal_width {
        let padding = terminal_width - total_content - 2;
        println!("{}{}{}", left_section, " ".repeat(padding), right_section.dimmed());
    } else {
        // Not enough space for right alignment
        println!("{}", left_section);
        println!("       {}", right_section.dimmed());
    }
}

pub fn render_purchase_list(store: &Store) {
    render_view_header("Purchased areas", store.areas.len());
    for area in &store.areas {
        render_purchase_line(area);
    }
    if !store.areas.is_empty() {
        println!(
            "\n  {} {}\n",
            "Total spent".dimmed(),
            format_price(store.total_spent()).bold()
        );
    }
}

pub fn render_purchase_details(area: &PurchasedArea) {
    println!("\n  {}\n", area.name.cyan().bold());
    println!("  Id          {}", area.id);
    println!("  Country     {}", format_country(&area.country_code));
    println!("  Area        {}", format_area(area.area_km2));
    println!(
        "  Price       {}/km² · Total {}",
        format_price(area.price_per_km2),
        format_price(area.total_price)
    );
    println!(
        "  Centroid    {:.4}, {:.4}",
        area.centroid[0], area.centroid[1]
    );
    println!("  Purchased   {}", area.created_at.strftime("%Y-%m-%d %H:%M UTC"));
    if let Some(description) = &area.description {
        println!("  Notes       {}", description);
    }
    match (&area.image_handle, &area.image_data_url) {
        (Some(handle), _) => println!(
            "  Image       {} ({}, {} bytes)",
            handle.url(),
            handle.mime_type(),
            handle.bytes().len()
        ),
        (None, Some(_)) => println!("  Image       {}", "stored image could not be decoded".red()),
        (None, None) => {}
    }
    println!();
}

/// Render a view header with title and count
pub fn render_view_header(title: &str, count: usize) {
    let word = if count == 1 { "area" } else { "areas" };
    println!("\n  {} ({} {})\n", title.cyan().bold(), count, word);
}

pub fn render_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn render_info(message: &str) {
    println!("{}", message.dimmed());
}

pub fn render_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}
