use anyhow::Result;
use diesel::prelude::*;

use pv_core::extract::{CadastralNumber, LandParcel, RawExtractUpload};
use pv_core::ports::{ParcelReaderPort, ParcelWriterPort};

use crate::db::executor::SqliteExecutor;
use crate::db::models::{LandParcelRow, NewLandParcelRow};
use crate::db::schema::t_land_parcel;
use crate::parcels::parse_parcels;

/// SQLite-backed store for the parcels derived from extract documents.
pub struct DieselParcelRepository {
    executor: SqliteExecutor,
}

impl DieselParcelRepository {
    pub fn new(executor: SqliteExecutor) -> Self {
        Self { executor }
    }
}

#[async_trait::async_trait]
impl ParcelWriterPort for DieselParcelRepository {
    async fn save_from_extract(&self, upload: &RawExtractUpload) -> Result<()> {
        let parcels = parse_parcels(&upload.content)?;
        let extract_number = upload.cadastral_number.clone();
        let rows: Vec<NewLandParcelRow> = parcels
            .iter()
            .map(|parcel| NewLandParcelRow::from_domain(&extract_number, parcel))
            .collect();

        self.executor
            .run(move |conn| {
                conn.transaction(|conn| {
                    // Replace rather than append, so a retried save after a
                    // partial failure converges instead of duplicating rows.
                    diesel::delete(
                        t_land_parcel::table
                            .filter(t_land_parcel::extract_number.eq(&extract_number)),
                    )
                    .execute(conn)?;

                    diesel::insert_into(t_land_parcel::table)
                        .values(&rows)
                        .execute(conn)?;

                    Ok(())
                })
            })
            .await
    }
}

#[async_trait::async_trait]
impl ParcelReaderPort for DieselParcelRepository {
    async fn list_for_extract(&self, number: &CadastralNumber) -> Result<Vec<LandParcel>> {
        let number = number.to_string();
        let rows = self
            .executor
            .run(move |conn| {
                let rows = t_land_parcel::table
                    .filter(t_land_parcel::extract_number.eq(&number))
                    .order(t_land_parcel::parcel_number.asc())
                    .load::<LandParcelRow>(conn)?;
                Ok(rows)
            })
            .await?;

        Ok(rows.into_iter().map(LandParcelRow::into_domain).collect())
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use tempfile::TempDir;

    use super::*;
    use crate::db::pool::init_db_pool;

    fn repository() -> (TempDir, DieselParcelRepository) {
        let dir = tempfile::tempdir().expect("tempdir");
        let url = dir.path().join("plotvault.db");
        let pool = init_db_pool(url.to_str().expect("utf-8 path")).expect("pool");
        let repo = DieselParcelRepository::new(SqliteExecutor::new(pool));
        (dir, repo)
    }

    fn upload(payload: &'static [u8]) -> RawExtractUpload {
        RawExtractUpload {
            cadastral_number: "47:14:1203001".to_string(),
            region_code: "47".to_string(),
            issued_at_ms: 1_720_000_000_000,
            content: Bytes::from_static(payload),
            content_type: "application/json".to_string(),
        }
    }

    const DOCUMENT: &[u8] = br#"{
        "parcels": [
            {"cadastral_number": "47:14:1203001:101", "area_sq_m": 1250.5, "category": "agricultural"},
            {"cadastral_number": "47:14:1203001:102", "area_sq_m": 900.0, "category": "settlement"}
        ]
    }"#;

    #[tokio::test]
    async fn derives_and_persists_parcels() {
        let (_dir, repo) = repository();
        let upload = upload(DOCUMENT);

        repo.save_from_extract(&upload).await.expect("save");

        let number = CadastralNumber::parse("47:14:1203001").expect("valid number");
        let parcels = repo.list_for_extract(&number).await.expect("list");
        assert_eq!(parcels.len(), 2);
        assert_eq!(parcels[0].parcel_number, "47:14:1203001:101");
    }

    #[tokio::test]
    async fn repeated_save_replaces_instead_of_duplicating() {
        let (_dir, repo) = repository();
        let upload = upload(DOCUMENT);

        repo.save_from_extract(&upload).await.expect("save");
        repo.save_from_extract(&upload).await.expect("save again");

        let number = CadastralNumber::parse("47:14:1203001").expect("valid number");
        let parcels = repo.list_for_extract(&number).await.expect("list");
        assert_eq!(parcels.len(), 2);
    }

    #[tokio::test]
    async fn unparsable_document_fails_without_writing() {
        let (_dir, repo) = repository();
        let upload = upload(b"{\"no_parcels\": true}");

        assert!(repo.save_from_extract(&upload).await.is_err());

        let number = CadastralNumber::parse("47:14:1203001").expect("valid number");
        let parcels = repo.list_for_extract(&number).await.expect("list");
        assert!(parcels.is_empty());
    }
}
