//! Import reconciliation
//!
//! Pure functions over an in-memory catalog snapshot. Validates the header
//! contract, collects every error per row, resolves brand/model/category
//! references by name, and applies the duplicate policy against the
//! existing catalog.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shared::models::{Brand, Category, Model, Product};
use thiserror::Error;

use super::ParsedTable;

/// Columns that must be present in the header row
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Product Name",
    "Brand",
    "Model",
    "Category",
    "Purchase Price",
    "Dealer Price",
    "End User Price",
];

const COL_NAME: &str = "Product Name";
const COL_PART_CODE: &str = "Part Code";
const COL_BRAND: &str = "Brand";
const COL_MODEL: &str = "Model";
const COL_CATEGORY: &str = "Category";
const COL_PURCHASE: &str = "Purchase Price";
const COL_DEALER: &str = "Dealer Price";
const COL_END_USER: &str = "End User Price";
const COL_GST: &str = "GST (%)";
const COL_PHOTO: &str = "Photo URL";

const DEFAULT_GST: f64 = 18.0;

/// What to do with rows that match an existing catalog product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Drop duplicate rows, import only new products
    #[default]
    Skip,
    /// Overwrite the matched catalog product with the row's values
    Update,
}

/// A validated row ready for submission.
///
/// `existing_id` is set when the row matched a catalog product under the
/// `update` policy; such candidates overwrite instead of creating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub name: String,
    pub part_code: String,
    pub brand_id: i64,
    pub model_id: i64,
    pub category_id: i64,
    pub purchase_price: f64,
    pub dealer_price: f64,
    pub end_user_price: f64,
    pub gst: f64,
    pub photo_url: String,
    pub existing_id: Option<i64>,
}

/// Catalog state the reconciler resolves against
#[derive(Debug, Clone, Copy)]
pub struct CatalogSnapshot<'a> {
    pub brands: &'a [Brand],
    pub models: &'a [Model],
    pub categories: &'a [Category],
    pub products: &'a [Product],
}

/// Structural failure that aborts the whole batch before any row is checked
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileError {
    /// One error naming every missing required column
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("File contains no data rows")]
    NoDataRows,
}

/// Full reconciliation result
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileReport {
    /// Rows that passed validation, after the duplicate policy
    pub candidates: Vec<Candidate>,
    /// Per-row errors, one entry per invalid row: "Row N: err, err"
    pub row_errors: Vec<String>,
    /// Non-fatal notices (duplicate summary)
    pub warnings: Vec<String>,
    /// Rows dropped by the skip policy
    pub skipped: usize,
}

fn check_headers(headers: &[String]) -> Result<(), FileError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .map(|col| col.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(FileError::MissingColumns(missing))
    }
}

fn cell<'a>(row: &'a HashMap<String, String>, col: &str) -> &'a str {
    row.get(col).map(String::as_str).unwrap_or("")
}

fn parse_price(raw: &str, field: &str, errors: &mut Vec<String>) -> f64 {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v,
        Ok(v) => {
            errors.push(format!("{field} must be a non-negative number, got {v}"));
            0.0
        }
        Err(_) => {
            errors.push(format!("{field} must be a number, got '{raw}'"));
            0.0
        }
    }
}

/// Reconcile parsed rows against the catalog snapshot.
///
/// Row numbering in error messages matches the source file: the header is
/// row 1, so the first data row reports as row 2.
pub fn reconcile(
    table: &ParsedTable,
    catalog: CatalogSnapshot<'_>,
    policy: DuplicatePolicy,
) -> Result<ReconcileReport, FileError> {
    let mut report = ReconcileReport::default();

    check_headers(&table.headers)?;
    if table.rows.is_empty() {
        return Err(FileError::NoDataRows);
    }

    // Name lookups are exact (trimmed input vs stored names)
    let brand_by_name: HashMap<&str, i64> =
        catalog.brands.iter().map(|b| (b.name.as_str(), b.id)).collect();
    let model_by_brand_and_name: HashMap<(i64, &str), i64> = catalog
        .models
        .iter()
        .map(|m| ((m.brand_id, m.name.as_str()), m.id))
        .collect();
    let category_by_name: HashMap<&str, i64> =
        catalog.categories.iter().map(|c| (c.name.as_str(), c.id)).collect();

    let mut validated = Vec::new();

    for (i, row) in table.rows.iter().enumerate() {
        let row_number = i + 2;
        let mut errors = Vec::new();

        let name = cell(row, COL_NAME).to_string();
        if name.is_empty() {
            errors.push("Product Name is required".to_string());
        }

        let brand_name = cell(row, COL_BRAND);
        let brand_id = if brand_name.is_empty() {
            errors.push("Brand is required".to_string());
            None
        } else {
            let id = brand_by_name.get(brand_name).copied();
            if id.is_none() {
                errors.push(format!("Brand '{brand_name}' not found"));
            }
            id
        };

        let model_name = cell(row, COL_MODEL);
        let model_id = if model_name.is_empty() {
            errors.push("Model is required".to_string());
            None
        } else if let Some(brand_id) = brand_id {
            let id = model_by_brand_and_name.get(&(brand_id, model_name)).copied();
            if id.is_none() {
                errors.push(format!("Model '{model_name}' not found under brand '{brand_name}'"));
            }
            id
        } else {
            // Brand unresolved, model cannot be checked
            None
        };

        let category_name = cell(row, COL_CATEGORY);
        let category_id = if category_name.is_empty() {
            errors.push("Category is required".to_string());
            None
        } else {
            let id = category_by_name.get(category_name).copied();
            if id.is_none() {
                errors.push(format!("Category '{category_name}' not found"));
            }
            id
        };

        let purchase_price = parse_price(cell(row, COL_PURCHASE), COL_PURCHASE, &mut errors);
        let dealer_price = parse_price(cell(row, COL_DEALER), COL_DEALER, &mut errors);
        let end_user_price = parse_price(cell(row, COL_END_USER), COL_END_USER, &mut errors);

        let gst_raw = cell(row, COL_GST);
        let gst = if gst_raw.is_empty() {
            DEFAULT_GST
        } else {
            match gst_raw.parse::<f64>() {
                Ok(v) if v.is_finite() && (0.0..=100.0).contains(&v) => v,
                _ => {
                    errors.push(format!("GST (%) must be between 0 and 100, got '{gst_raw}'"));
                    DEFAULT_GST
                }
            }
        };

        let photo_url = match cell(row, COL_PHOTO) {
            "" => crate::utils::placeholder_photo_url(&name),
            url => url.to_string(),
        };

        if !errors.is_empty() {
            report
                .row_errors
                .push(format!("Row {row_number}: {}", errors.join(", ")));
            continue;
        }

        validated.push(Candidate {
            name,
            part_code: cell(row, COL_PART_CODE).to_string(),
            brand_id: brand_id.unwrap_or_default(),
            model_id: model_id.unwrap_or_default(),
            category_id: category_id.unwrap_or_default(),
            purchase_price,
            dealer_price,
            end_user_price,
            gst,
            photo_url,
            existing_id: None,
        });
    }

    // Duplicate detection runs against the EXISTING catalog only. Repeats
    // within the file itself are left to the unique constraints at submit
    // time rather than flagged here.
    let mut duplicates = 0usize;
    for mut candidate in validated {
        let existing = catalog.products.iter().find(|p| {
            p.name == candidate.name
                || (!candidate.part_code.is_empty() && p.part_code == candidate.part_code)
        });
        match (existing, policy) {
            (Some(_), DuplicatePolicy::Skip) => {
                duplicates += 1;
                report.skipped += 1;
            }
            (Some(product), DuplicatePolicy::Update) => {
                duplicates += 1;
                candidate.existing_id = Some(product.id);
                report.candidates.push(candidate);
            }
            (None, _) => report.candidates.push(candidate),
        }
    }

    if duplicates > 0 {
        let action = match policy {
            DuplicatePolicy::Skip => "they will be skipped",
            DuplicatePolicy::Update => "they will be updated",
        };
        report.warnings.push(format!(
            "Found {duplicates} duplicate product(s) already in the catalog, {action}"
        ));
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imports::parse_csv;

    fn brand(id: i64, name: &str) -> Brand {
        Brand {
            id,
            name: name.to_string(),
            logo_url: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn model(id: i64, name: &str, brand_id: i64) -> Model {
        Model {
            id,
            name: name.to_string(),
            brand_id,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn category(id: i64, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn product(id: i64, name: &str, part_code: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            part_code: part_code.to_string(),
            brand_id: 1,
            model_id: 1,
            category_id: 1,
            purchase_price: 80.0,
            dealer_price: 100.0,
            end_user_price: 120.0,
            gst: 18.0,
            photo_url: String::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    struct Fixture {
        brands: Vec<Brand>,
        models: Vec<Model>,
        categories: Vec<Category>,
        products: Vec<Product>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                brands: vec![brand(1, "Bosch")],
                models: vec![model(1, "GSB 500", 1)],
                categories: vec![category(1, "Drills")],
                products: Vec::new(),
            }
        }

        fn snapshot(&self) -> CatalogSnapshot<'_> {
            CatalogSnapshot {
                brands: &self.brands,
                models: &self.models,
                categories: &self.categories,
                products: &self.products,
            }
        }
    }

    const FULL_HEADER: &str =
        "Product Name,Part Code,Brand,Model,Category,Purchase Price,Dealer Price,End User Price,GST (%),Photo URL";

    fn table(csv: &str) -> ParsedTable {
        parse_csv(csv.as_bytes()).unwrap()
    }

    #[test]
    fn missing_brand_header_is_one_file_error() {
        let fixture = Fixture::new();
        let t = table("Product Name,Model,Category,Purchase Price,Dealer Price,End User Price\nDrill,GSB 500,Drills,80,100,120\n");

        let err = reconcile(&t, fixture.snapshot(), DuplicatePolicy::Skip).unwrap_err();

        assert_eq!(err, FileError::MissingColumns(vec!["Brand".to_string()]));
        assert_eq!(err.to_string(), "Missing required columns: Brand");
    }

    #[test]
    fn empty_file_is_a_file_error() {
        let fixture = Fixture::new();
        let t = table(&format!("{FULL_HEADER}\n"));

        let err = reconcile(&t, fixture.snapshot(), DuplicatePolicy::Skip).unwrap_err();

        assert_eq!(err, FileError::NoDataRows);
    }

    #[test]
    fn valid_row_becomes_candidate_with_defaults() {
        let fixture = Fixture::new();
        let t = table(&format!(
            "{FULL_HEADER}\nImpact Drill,,Bosch,GSB 500,Drills,80,100,120,,\n"
        ));

        let report = reconcile(&t, fixture.snapshot(), DuplicatePolicy::Skip).unwrap();

        assert!(report.row_errors.is_empty());
        assert_eq!(report.candidates.len(), 1);
        let c = &report.candidates[0];
        assert_eq!(c.name, "Impact Drill");
        assert_eq!(c.brand_id, 1);
        assert_eq!(c.model_id, 1);
        assert_eq!(c.category_id, 1);
        assert_eq!(c.gst, 18.0);
        assert_eq!(c.part_code, "");
        assert!(c.photo_url.contains("Impact%20Drill"));
        assert_eq!(c.existing_id, None);
    }

    #[test]
    fn negative_price_rejects_the_row() {
        let fixture = Fixture::new();
        let t = table(&format!(
            "{FULL_HEADER}\nDrill,,Bosch,GSB 500,Drills,-5,100,120,,\n"
        ));

        let report = reconcile(&t, fixture.snapshot(), DuplicatePolicy::Skip).unwrap();

        assert_eq!(report.row_errors.len(), 1);
        assert!(report.row_errors[0].starts_with("Row 2:"));
        assert!(report.row_errors[0].contains("Purchase Price"));
        assert!(report.candidates.is_empty());
    }

    #[test]
    fn gst_out_of_range_rejects_the_row() {
        let fixture = Fixture::new();
        let t = table(&format!(
            "{FULL_HEADER}\nDrill,,Bosch,GSB 500,Drills,80,100,120,150,\n"
        ));

        let report = reconcile(&t, fixture.snapshot(), DuplicatePolicy::Skip).unwrap();

        assert_eq!(report.row_errors.len(), 1);
        assert!(report.row_errors[0].contains("GST (%)"));
    }

    #[test]
    fn one_row_collects_all_its_errors() {
        let fixture = Fixture::new();
        let t = table(&format!(
            "{FULL_HEADER}\n,,Makita,GX100,Saws,abc,100,120,,\n"
        ));

        let report = reconcile(&t, fixture.snapshot(), DuplicatePolicy::Skip).unwrap();

        assert_eq!(report.row_errors.len(), 1);
        let msg = &report.row_errors[0];
        assert!(msg.contains("Product Name is required"));
        assert!(msg.contains("Brand 'Makita' not found"));
        assert!(msg.contains("Category 'Saws' not found"));
        assert!(msg.contains("Purchase Price"));
    }

    #[test]
    fn model_is_scoped_to_its_brand() {
        let mut fixture = Fixture::new();
        fixture.brands.push(brand(2, "Makita"));
        let t = table(&format!(
            "{FULL_HEADER}\nDrill,,Makita,GSB 500,Drills,80,100,120,,\n"
        ));

        let report = reconcile(&t, fixture.snapshot(), DuplicatePolicy::Skip).unwrap();

        assert_eq!(report.row_errors.len(), 1);
        assert!(report.row_errors[0].contains("Model 'GSB 500' not found under brand 'Makita'"));
    }

    #[test]
    fn skip_policy_drops_duplicates_and_warns() {
        let mut fixture = Fixture::new();
        fixture.products.push(product(10, "Impact Drill", "PC-1"));
        let t = table(&format!(
            "{FULL_HEADER}\nImpact Drill,,Bosch,GSB 500,Drills,80,100,120,,\nNew Saw,,Bosch,GSB 500,Drills,50,60,70,,\n"
        ));

        let report = reconcile(&t, fixture.snapshot(), DuplicatePolicy::Skip).unwrap();

        assert_eq!(report.candidates.len(), 1);
        assert_eq!(report.candidates[0].name, "New Saw");
        assert_eq!(report.skipped, 1);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("1 duplicate product(s)"));
    }

    #[test]
    fn update_policy_targets_the_existing_product() {
        let mut fixture = Fixture::new();
        fixture.products.push(product(10, "Impact Drill", "PC-1"));
        let t = table(&format!(
            "{FULL_HEADER}\nImpact Drill,,Bosch,GSB 500,Drills,90,110,130,,\n"
        ));

        let report = reconcile(&t, fixture.snapshot(), DuplicatePolicy::Update).unwrap();

        assert_eq!(report.candidates.len(), 1);
        assert_eq!(report.candidates[0].existing_id, Some(10));
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn part_code_match_counts_as_duplicate() {
        let mut fixture = Fixture::new();
        fixture.products.push(product(10, "Old Name", "PC-1"));
        let t = table(&format!(
            "{FULL_HEADER}\nRenamed Drill,PC-1,Bosch,GSB 500,Drills,80,100,120,,\n"
        ));

        let report = reconcile(&t, fixture.snapshot(), DuplicatePolicy::Skip).unwrap();

        assert_eq!(report.skipped, 1);
        assert!(report.candidates.is_empty());
    }

    #[test]
    fn empty_part_code_never_matches_existing_empty_part_code() {
        let mut fixture = Fixture::new();
        fixture.products.push(product(10, "Old Name", ""));
        let t = table(&format!(
            "{FULL_HEADER}\nBrand New,,Bosch,GSB 500,Drills,80,100,120,,\n"
        ));

        let report = reconcile(&t, fixture.snapshot(), DuplicatePolicy::Skip).unwrap();

        assert_eq!(report.candidates.len(), 1);
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn repeats_within_the_file_are_not_duplicates() {
        let fixture = Fixture::new();
        let t = table(&format!(
            "{FULL_HEADER}\nDrill,,Bosch,GSB 500,Drills,80,100,120,,\nDrill,,Bosch,GSB 500,Drills,80,100,120,,\n"
        ));

        let report = reconcile(&t, fixture.snapshot(), DuplicatePolicy::Skip).unwrap();

        assert_eq!(report.candidates.len(), 2);
        assert!(report.warnings.is_empty());
    }
}
