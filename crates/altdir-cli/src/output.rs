// Plain-text and JSON rendering for the terminal
use altdir_core::{models::Category, Alternative, FilterPreset};
use serde::Serialize;

/// Print `value` as pretty JSON when asked to, otherwise run `text`
pub fn json_or<T: Serialize>(value: &T, json: bool, text: impl FnOnce()) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text();
    }
    Ok(())
}

pub fn listings(items: &[Alternative], json: bool) -> anyhow::Result<()> {
    json_or(&items, json, || {
        if items.is_empty() {
            println!("No listings found");
            return;
        }
        for item in items {
            println!(
                "{:>6}  {:<24} {:<16} {:<13} {:>5} likes  {}",
                item.id,
                truncate(&item.name, 24),
                truncate(&item.category, 16),
                item.pricing,
                item.likes,
                item.platform.join("/")
            );
        }
    })
}

pub fn detail(item: &Alternative, json: bool) -> anyhow::Result<()> {
    json_or(item, json, || {
        println!("{} ({})", item.name, item.id);
        println!("  {}", item.description);
        println!("  Category:  {}", item.category);
        if let Some(sub) = &item.subcategory {
            println!("  Sub:       {}", sub);
        }
        println!("  Pricing:   {}", item.pricing);
        if let Some(price) = item.price {
            println!("  Price:     {:.2}", price);
        }
        if let Some(rating) = item.rating {
            println!("  Rating:    {:.1}", rating);
        }
        println!("  Platforms: {}", item.platform.join(", "));
        if !item.tags.is_empty() {
            println!("  Tags:      {}", item.tags.join(", "));
        }
        if !item.features.is_empty() {
            println!("  Features:  {}", item.features.join(", "));
        }
        match &item.available_pincodes {
            None => println!("  Available: everywhere"),
            Some(codes) if codes.is_empty() => println!("  Available: nowhere yet"),
            Some(codes) => println!("  Available: {}", codes.join(", ")),
        }
        if item.franchise.as_ref().is_some_and(|f| f.available) {
            println!("  Franchise opportunities available");
        }
        if !item.url.is_empty() {
            println!("  {}", item.url);
        }
    })
}

pub fn categories(categories: &[Category], json: bool) -> anyhow::Result<()> {
    json_or(&categories, json, || {
        for category in categories {
            println!(
                "{:<20} {:<13} {:>4}",
                category.name,
                category.icon.as_str(),
                category.count
            );
        }
    })
}

pub fn presets(presets: &[FilterPreset], json: bool) -> anyhow::Result<()> {
    json_or(&presets, json, || {
        if presets.is_empty() {
            println!("No saved presets");
            return;
        }
        for preset in presets {
            println!(
                "{}  {:<24} {}",
                preset.id,
                truncate(&preset.name, 24),
                preset.created_at.format("%Y-%m-%d %H:%M")
            );
        }
    })
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("Swiggy", 24), "Swiggy");
        assert_eq!(truncate("Neighbourhood Kirana", 10), "Neighbour…");
        assert_eq!(truncate("खाना डिलीवरी", 4).chars().count(), 4);
    }
}
