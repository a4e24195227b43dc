//! Plain-text product catalog
//!
//! Products are blank-line separated blocks. The first line is
//! `Name (Category)`; `key: value` lines become attributes and any other
//! line is appended to the description.
//!
//! ```text
//! 529 Education Savings Plan (education)
//! fee: 0.3%
//! Tax-free growth for qualified education expenses.
//! ```

use crate::adapters::sources::read_source;
use crate::domain::models::ProductRecord;
use crate::error::Result;
use crate::ports::sources::ProductSourcePort;
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::PathBuf;

pub struct TextCatalogSource {
    path: PathBuf,
}

impl TextCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ProductSourcePort for TextCatalogSource {
    async fn load_products(&self) -> Result<Vec<ProductRecord>> {
        let text = read_source(&self.path).await?;
        let products = parse_catalog(&text);
        log::info!(
            "Loaded {} products from {}",
            products.len(),
            self.path.display()
        );
        Ok(products)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

pub(crate) fn parse_catalog(text: &str) -> Vec<ProductRecord> {
    let mut products: Vec<ProductRecord> = Vec::new();
    let mut ids = HashSet::new();
    let mut block: Vec<&str> = Vec::new();

    for line in text.lines().map(str::trim).chain(std::iter::once("")) {
        if line.is_empty() {
            if !block.is_empty() {
                let mut product = parse_block(&block, products.len());
                // Repeated names keep distinct ids
                if !ids.insert(product.id.clone()) {
                    product.id = format!("{}-{}", product.id, products.len() + 1);
                    ids.insert(product.id.clone());
                }
                products.push(product);
                block.clear();
            }
        } else {
            block.push(line);
        }
    }
    products
}

fn parse_block(lines: &[&str], position: usize) -> ProductRecord {
    let (name, category) = split_heading(lines[0]);
    let mut product = ProductRecord::new(slug(name, position), name, category);
    let mut description: Vec<&str> = Vec::new();

    for &line in &lines[1..] {
        match line.split_once(':') {
            Some((key, value)) if is_attribute_key(key) => {
                let key = key.trim().to_lowercase();
                if key == "description" {
                    description.push(value.trim());
                } else {
                    product = product.with_attribute(key, value.trim());
                }
            }
            _ => description.push(line),
        }
    }

    if !description.is_empty() {
        product = product.with_attribute("description", description.join(" "));
    }
    product
}

/// "Name (Category)" → (name, category)
fn split_heading(line: &str) -> (&str, String) {
    if let Some(open) = line.rfind('(') {
        if let Some(inner) = line[open + 1..].strip_suffix(')') {
            let name = line[..open].trim();
            if !name.is_empty() && !inner.trim().is_empty() {
                return (name, inner.trim().to_lowercase());
            }
        }
    }
    (line, "general".to_string())
}

// Short single-word-ish keys only; sentences with a colon stay prose
fn is_attribute_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && key.split_whitespace().count() <= 2
}

fn slug(name: &str, position: usize) -> String {
    let slug = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        format!("product-{}", position + 1)
    } else {
        slug
    }
}
