//! Printable and CSV renderings of a scaled recipe.

use std::fmt::Write as _;
use std::io;

use crate::error::Result;
use crate::scaling::ScaledRecipe;

pub fn render_text(scaled: &ScaledRecipe) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} (scale factor {:.2}, total {:.0} g)",
        scaled.recipe_name, scaled.scale_factor, scaled.total_weight
    );
    if let Some(warning) = scaled.warning {
        let _ = writeln!(out, "warning: {}", warning);
    }
    for (name, grams) in scaled.ingredients.iter() {
        let _ = writeln!(out, "  {}: {:.0} g", name, grams);
    }
    for (sub_name, sub) in scaled.subrecipes.iter() {
        let _ = writeln!(out, "[{}]", sub_name);
        for (name, grams) in sub.ingredients.iter() {
            let _ = writeln!(out, "  {}: {:.0} g", name, grams);
        }
    }
    write_instructions(&mut out, "Instructions", &scaled.instructions);
    for (sub_name, sub) in scaled.subrecipes.iter() {
        write_instructions(&mut out, &format!("[{}] instructions", sub_name), &sub.instructions);
    }
    out
}

// Blank lines in recipe instructions are spacing only.
fn write_instructions(out: &mut String, heading: &str, instructions: &[String]) {
    let lines: Vec<&str> = instructions
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        return;
    }
    let _ = writeln!(out, "{}:", heading);
    for (idx, line) in lines.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", idx + 1, line);
    }
}

/// One row per ingredient: `section,ingredient,grams`. Top-level rows use
/// the recipe name as their section.
pub fn write_csv<W: io::Write>(scaled: &ScaledRecipe, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["section", "ingredient", "grams"])?;
    for (name, grams) in scaled.ingredients.iter() {
        let grams = format!("{:.0}", grams);
        csv.write_record([scaled.recipe_name.as_str(), name, grams.as_str()])?;
    }
    for (sub_name, sub) in scaled.subrecipes.iter() {
        for (name, grams) in sub.ingredients.iter() {
            let grams = format!("{:.0}", grams);
            csv.write_record([sub_name, name, grams.as_str()])?;
        }
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::scaling::engine::scale_by_multiplier;

    #[test]
    fn test_text_sheet_lists_sections_and_steps() {
        let catalog = Catalog::builtin().unwrap();
        let scaled = scale_by_multiplier(catalog.get("Creme Brulee").unwrap(), 2.0);
        let text = render_text(&scaled);
        assert!(text.starts_with("Creme Brulee (scale factor 2.00, total 80000 g)"));
        assert!(text.contains("  milk: 40600 g\n"));
        assert!(text.contains("[caramel sauce]\n  sugar: 4000 g\n"));
        assert!(text.contains("Instructions:\n  1. Make the caramel sauce first"));
        assert!(text.contains("[caramel sauce] instructions:"));
    }

    #[test]
    fn test_blank_instructions_skipped() {
        let catalog = Catalog::builtin().unwrap();
        let scaled = scale_by_multiplier(catalog.get("vanilla").unwrap(), 1.0);
        let text = render_text(&scaled);
        assert!(text.contains("  3. Pasteurize"));
        assert!(!text.contains("  4."));
    }

    #[test]
    fn test_csv_rows() {
        let catalog = Catalog::builtin().unwrap();
        let scaled = scale_by_multiplier(catalog.get("Key Lime Pie").unwrap(), 1.0);
        let mut buf = Vec::new();
        write_csv(&scaled, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("section,ingredient,grams"));
        assert_eq!(lines.next(), Some("Key Lime Pie,milk,22000"));
        assert!(text.contains("crust,butter,225\n"));
        assert_eq!(text.lines().count(), 1 + 7 + 4);
    }
}
