use anyhow::Result;
use diesel::prelude::*;

use pv_core::extract::{CadastralExtract, CadastralNumber};
use pv_core::ports::ExtractRepositoryPort;

use crate::db::executor::SqliteExecutor;
use crate::db::models::{ExtractRow, NewExtractRow};
use crate::db::schema::t_extract;

/// SQLite-backed metadata store for archived extracts.
pub struct DieselExtractRepository {
    executor: SqliteExecutor,
}

impl DieselExtractRepository {
    pub fn new(executor: SqliteExecutor) -> Self {
        Self { executor }
    }
}

#[async_trait::async_trait]
impl ExtractRepositoryPort for DieselExtractRepository {
    async fn exists(&self, number: &CadastralNumber) -> Result<bool> {
        let number = number.to_string();
        self.executor
            .run(move |conn| {
                let found: bool =
                    diesel::select(diesel::dsl::exists(t_extract::table.find(&number)))
                        .get_result(conn)?;
                Ok(found)
            })
            .await
    }

    async fn insert_metadata(&self, extract: &CadastralExtract) -> Result<()> {
        let row = NewExtractRow::from_domain(extract);
        self.executor
            .run(move |conn| {
                diesel::insert_into(t_extract::table)
                    .values(&row)
                    .execute(conn)?;
                Ok(())
            })
            .await
    }

    async fn get_by_number(&self, number: &CadastralNumber) -> Result<Option<CadastralExtract>> {
        let number = number.to_string();
        let row = self
            .executor
            .run(move |conn| {
                let row = t_extract::table
                    .find(&number)
                    .first::<ExtractRow>(conn)
                    .optional()?;
                Ok(row)
            })
            .await?;

        row.map(ExtractRow::into_domain).transpose()
    }

    async fn list_recent(&self, limit: usize, offset: usize) -> Result<Vec<CadastralExtract>> {
        let rows = self
            .executor
            .run(move |conn| {
                let rows = t_extract::table
                    .order(t_extract::archived_at_ms.desc())
                    .limit(limit as i64)
                    .offset(offset as i64)
                    .load::<ExtractRow>(conn)?;
                Ok(rows)
            })
            .await?;

        rows.into_iter().map(ExtractRow::into_domain).collect()
    }
}
