//! Import submission
//!
//! Takes the reconciler's candidates and submits them one at a time.
//! A failed row is recorded and the batch keeps going.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::repository::product;
use shared::models::{ProductCreate, ProductUpdate};

use super::reconciler::Candidate;

/// Running counters for a batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportTally {
    pub total: usize,
    pub completed: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Batch result: final tally plus one message per failed row
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportOutcome {
    pub tally: ImportTally,
    pub failures: Vec<String>,
}

fn create_payload(candidate: &Candidate) -> ProductCreate {
    ProductCreate {
        name: candidate.name.clone(),
        part_code: Some(candidate.part_code.clone()),
        brand_id: candidate.brand_id,
        model_id: candidate.model_id,
        category_id: candidate.category_id,
        purchase_price: candidate.purchase_price,
        dealer_price: candidate.dealer_price,
        end_user_price: candidate.end_user_price,
        gst: Some(candidate.gst),
        photo_url: Some(candidate.photo_url.clone()),
    }
}

fn update_payload(candidate: &Candidate) -> ProductUpdate {
    ProductUpdate {
        name: Some(candidate.name.clone()),
        part_code: Some(candidate.part_code.clone()),
        brand_id: Some(candidate.brand_id),
        model_id: Some(candidate.model_id),
        category_id: Some(candidate.category_id),
        purchase_price: Some(candidate.purchase_price),
        dealer_price: Some(candidate.dealer_price),
        end_user_price: Some(candidate.end_user_price),
        gst: Some(candidate.gst),
        photo_url: Some(candidate.photo_url.clone()),
    }
}

/// Submit candidates sequentially.
///
/// `skipped` is the count of rows the reconciler dropped under the skip
/// policy; it is folded into the tally so `total` reflects every row that
/// survived validation.
pub async fn run_import(
    pool: &SqlitePool,
    candidates: &[Candidate],
    skipped: usize,
) -> ImportOutcome {
    let mut outcome = ImportOutcome {
        tally: ImportTally {
            total: candidates.len() + skipped,
            completed: skipped,
            skipped,
            ..Default::default()
        },
        ..Default::default()
    };

    for candidate in candidates {
        let result = match candidate.existing_id {
            Some(id) => product::update(pool, id, update_payload(candidate)).await,
            None => product::create(pool, create_payload(candidate)).await,
        };
        outcome.tally.completed += 1;
        match result {
            Ok(_) => outcome.tally.succeeded += 1,
            Err(e) => {
                outcome.tally.failed += 1;
                tracing::warn!(product = %candidate.name, error = %e, "Import row failed");
                outcome.failures.push(format!("{}: {e}", candidate.name));
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{brand, category, model, product};
    use crate::db::test_support::test_pool;
    use shared::models::{BrandCreate, CategoryCreate, ModelCreate};

    async fn seed_refs(pool: &SqlitePool) -> (i64, i64, i64) {
        let b = brand::create(pool, BrandCreate { name: "Bosch".into(), logo_url: None })
            .await
            .unwrap();
        let m = model::create(pool, ModelCreate { name: "GSB 500".into(), brand_id: b.id })
            .await
            .unwrap();
        let c = category::create(pool, CategoryCreate { name: "Drills".into() })
            .await
            .unwrap();
        (b.id, m.id, c.id)
    }

    fn candidate(name: &str, brand_id: i64, model_id: i64, category_id: i64) -> Candidate {
        Candidate {
            name: name.into(),
            part_code: String::new(),
            brand_id,
            model_id,
            category_id,
            purchase_price: 80.0,
            dealer_price: 100.0,
            end_user_price: 120.0,
            gst: 18.0,
            photo_url: crate::utils::placeholder_photo_url(name),
            existing_id: None,
        }
    }

    #[tokio::test]
    async fn creates_new_products_and_tallies() {
        let pool = test_pool().await;
        let (b, m, c) = seed_refs(&pool).await;

        let outcome = run_import(
            &pool,
            &[candidate("P1", b, m, c), candidate("P2", b, m, c)],
            1,
        )
        .await;

        assert_eq!(
            outcome.tally,
            ImportTally { total: 3, completed: 3, succeeded: 2, skipped: 1, failed: 0 }
        );
        assert!(outcome.failures.is_empty());
        assert_eq!(product::find_all(&pool).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_candidate_overwrites_existing() {
        let pool = test_pool().await;
        let (b, m, c) = seed_refs(&pool).await;
        let existing = product::create(
            &pool,
            ProductCreate {
                name: "P1".into(),
                part_code: None,
                brand_id: b,
                model_id: m,
                category_id: c,
                purchase_price: 80.0,
                dealer_price: 100.0,
                end_user_price: 120.0,
                gst: None,
                photo_url: None,
            },
        )
        .await
        .unwrap();

        let mut updated = candidate("P1", b, m, c);
        updated.dealer_price = 110.0;
        updated.existing_id = Some(existing.id);

        let outcome = run_import(&pool, &[updated], 0).await;

        assert_eq!(outcome.tally.succeeded, 1);
        let stored = product::find_by_id(&pool, existing.id).await.unwrap().unwrap();
        assert_eq!(stored.dealer_price, 110.0);
        assert_eq!(product::find_all(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_row_does_not_stop_the_batch() {
        let pool = test_pool().await;
        let (b, m, c) = seed_refs(&pool).await;

        // Middle row references a brand that does not exist; the FK fails
        let rows = vec![
            candidate("P1", b, m, c),
            candidate("Broken", 999, m, c),
            candidate("P3", b, m, c),
        ];
        let outcome = run_import(&pool, &rows, 0).await;

        assert_eq!(
            outcome.tally,
            ImportTally { total: 3, completed: 3, succeeded: 2, skipped: 0, failed: 1 }
        );
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].starts_with("Broken:"));
        assert_eq!(product::find_all(&pool).await.unwrap().len(), 2);
    }
}
