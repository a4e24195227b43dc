//! CSV client table and product catalog
//!
//! Client tables come in two layouts:
//! - `Category,Value` rows describing a single client
//! - one row per client, with an optional `id` / `client_id` column
//!
//! Product tables have one row per product. `name` (or `product`) is
//! required, `id` and `category` are optional, every other column becomes an
//! attribute.

use crate::adapters::sources::read_source;
use crate::domain::models::{ClientRecord, ProductRecord};
use crate::error::{AppError, Result};
use crate::ports::sources::{ClientSourcePort, ProductSourcePort};
use async_trait::async_trait;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::PathBuf;

const SINGLE_CLIENT_ID: &str = "client-1";

pub struct CsvClientSource {
    path: PathBuf,
}

impl CsvClientSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ClientSourcePort for CsvClientSource {
    async fn load_clients(&self) -> Result<Vec<ClientRecord>> {
        let text = read_source(&self.path).await?;
        let clients = parse_clients(&text)?;
        log::info!("Loaded {} clients from {}", clients.len(), self.path.display());
        Ok(clients)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

pub struct CsvProductSource {
    path: PathBuf,
}

impl CsvProductSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ProductSourcePort for CsvProductSource {
    async fn load_products(&self) -> Result<Vec<ProductRecord>> {
        let text = read_source(&self.path).await?;
        let products = parse_products(&text)?;
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

fn read_table(text: &str) -> Result<(Vec<String>, Vec<StringRecord>)> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let rows = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((headers, rows))
}

fn column(headers: &[String], names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.contains(&h.to_lowercase().as_str()))
}

pub(crate) fn parse_clients(text: &str) -> Result<Vec<ClientRecord>> {
    let (headers, rows) = read_table(text)?;
    if headers.is_empty() {
        return Ok(Vec::new());
    }

    let is_key_value = headers.len() == 2
        && headers[0].eq_ignore_ascii_case("category")
        && headers[1].eq_ignore_ascii_case("value");

    if is_key_value {
        let mut client = ClientRecord::new(SINGLE_CLIENT_ID);
        for row in &rows {
            let (Some(key), Some(value)) = (row.get(0), row.get(1)) else {
                continue;
            };
            if !key.is_empty() {
                client = client.with_attribute(key, value);
            }
        }
        return Ok(if client.attributes.is_empty() {
            Vec::new()
        } else {
            vec![client]
        });
    }

    let id_col = column(&headers, &["id", "client_id"]);
    let clients = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let id = id_col
                .and_then(|c| row.get(c))
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("client-{}", i + 1));

            headers
                .iter()
                .enumerate()
                .filter(|(c, _)| Some(*c) != id_col)
                .filter_map(|(c, h)| row.get(c).filter(|v| !v.is_empty()).map(|v| (h, v)))
                .fold(ClientRecord::new(id), |client, (h, v)| {
                    client.with_attribute(h.as_str(), v)
                })
        })
        .collect();
    Ok(clients)
}

pub(crate) fn parse_products(text: &str) -> Result<Vec<ProductRecord>> {
    let (headers, rows) = read_table(text)?;
    if headers.is_empty() {
        return Ok(Vec::new());
    }

    let name_col = column(&headers, &["name", "product", "product_name"]).ok_or_else(|| {
        AppError::InvalidInput("product catalog needs a 'name' or 'product' column".to_string())
    })?;
    let id_col = column(&headers, &["id", "product_id"]);
    let category_col = column(&headers, &["category", "type"]);
    let reserved = [Some(name_col), id_col, category_col];

    let mut products = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let name = row.get(name_col).unwrap_or_default();
        if name.is_empty() {
            log::warn!("Skipping product row {} without a name", i + 2);
            continue;
        }

        let id = id_col
            .and_then(|c| row.get(c))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("product-{}", i + 1));
        let category = category_col
            .and_then(|c| row.get(c))
            .filter(|v| !v.is_empty())
            .unwrap_or("general")
            .to_lowercase();

        let mut product = ProductRecord::new(id, name, category);
        for (c, header) in headers.iter().enumerate() {
            if reserved.contains(&Some(c)) {
                continue;
            }
            if let Some(value) = row.get(c).filter(|v| !v.is_empty()) {
                product = product.with_attribute(header.to_lowercase(), value);
            }
        }
        products.push(product);
    }
    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_key_value_layout_is_one_client() {
        let clients = parse_clients(
            "Category,Value\nName,Emily Johnson\nAge,38\nHoldings,\"401(k), checking\"\n",
        )
        .unwrap();

        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].id, "client-1");
        assert_eq!(clients[0].attributes["Holdings"], "401(k), checking");
    }

    #[test]
    fn test_row_per_client_layout() {
        let clients = parse_clients("client_id,Name,Age\nc-7,Ann,40\n,Bob,\n").unwrap();

        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].id, "c-7");
        assert_eq!(clients[0].attributes["Age"], "40");
        assert!(!clients[0].attributes.contains_key("client_id"));
        assert_eq!(clients[1].id, "client-2");
        assert!(!clients[1].attributes.contains_key("Age"));
    }

    #[test]
    fn test_products_with_defaults_and_attributes() {
        let products = parse_products(
            "Product,Category,Description,Fee\n\
             Pension Plan,Retirement,Long-term savings,0.5%\n\
             Basic Account,,Everyday banking,\n\
             ,misc,orphan row,\n",
        )
        .unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, "product-1");
        assert_eq!(products[0].category, "retirement");
        assert_eq!(products[0].attributes["description"], "Long-term savings");
        assert_eq!(products[0].attributes["fee"], "0.5%");
        assert_eq!(products[1].category, "general");
        assert!(!products[1].attributes.contains_key("fee"));
    }

    #[test]
    fn test_products_need_name_column() {
        let result = parse_products("id,category\np1,retirement\n");
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_empty_files_give_no_records() {
        assert!(parse_clients("").unwrap().is_empty());
        assert!(parse_products("").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let source = CsvClientSource::new(dir.path().join("absent.csv"));
        let result = source.load_clients().await;
        assert!(matches!(result, Err(AppError::SourceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_load_products_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.csv");
        std::fs::write(&path, "id,name,category\np1,529 Plan,education\n").unwrap();

        let products = CsvProductSource::new(&path).load_products().await.unwrap();
        assert_eq!(products, vec![ProductRecord::new("p1", "529 Plan", "education")]);
    }
}
