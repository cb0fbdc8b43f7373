//! Show the loaded content table.

use crate::config;
use crate::content::ContentTable;
use anyhow::Result;
use std::path::PathBuf;

pub fn run(content: Option<PathBuf>, json: bool) -> Result<()> {
    let table = config::offline_content_table(content)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        print!("{}", render(&table));
    }
    Ok(())
}

fn render(table: &ContentTable) -> String {
    let mut out = String::new();
    for (url, c) in table.iter() {
        out.push_str(&format!("{url}\n"));
        out.push_str(&format!("  page title   {}\n", c.page_title));
        out.push_str(&format!("  title        {}\n", c.title));
        out.push_str(&format!("  description  {}\n", c.description));
        out.push_str(&format!("  link         {} -> {}\n", c.link_text, c.link_url));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_every_variant() {
        let out = render(&ContentTable::builtin());
        assert_eq!(out.lines().filter(|l| l.starts_with("https://")).count(), 2);
        assert!(out.contains("  page title   Variant One"));
        assert!(out.contains("-> https://developers.cloudflare.com/workers/"));
    }
}
