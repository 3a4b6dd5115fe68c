use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;

use crate::{
    application::repos::{RepoError, SubjectsRepo},
    domain::{
        NewSubject, SubjectRecord,
        filter::{Bound, SubjectFilter},
    },
};

use super::{PostgresStore, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct SubjectRow {
    id: i64,
    length: f64,
    weight: f64,
    is_active: bool,
    create_at: OffsetDateTime,
    delete_at: Option<OffsetDateTime>,
}

impl From<SubjectRow> for SubjectRecord {
    fn from(row: SubjectRow) -> Self {
        Self {
            id: row.id,
            length: row.length,
            weight: row.weight,
            is_active: row.is_active,
            create_at: row.create_at,
            delete_at: row.delete_at,
        }
    }
}

#[async_trait]
impl SubjectsRepo for PostgresStore {
    async fn create_subject(&self, subject: NewSubject) -> Result<SubjectRecord, RepoError> {
        let row = sqlx::query_as::<_, SubjectRow>(
            r#"
            INSERT INTO subjects (length, weight)
            VALUES ($1, $2)
            RETURNING id, length, weight, is_active, create_at, delete_at
            "#,
        )
        .bind(subject.length)
        .bind(subject.weight)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(SubjectRecord::from(row))
    }

    async fn find_subject(&self, id: i64) -> Result<Option<SubjectRecord>, RepoError> {
        let row = sqlx::query_as::<_, SubjectRow>(
            r#"
            SELECT id, length, weight, is_active, create_at, delete_at
            FROM subjects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(SubjectRecord::from))
    }

    async fn soft_delete_subject(&self, id: i64) -> Result<SubjectRecord, RepoError> {
        let row = sqlx::query_as::<_, SubjectRow>(
            r#"
            UPDATE subjects
            SET is_active = FALSE,
                delete_at = now()
            WHERE id = $1 AND is_active = TRUE
            RETURNING id, length, weight, is_active, create_at, delete_at
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        match row {
            Some(row) => Ok(SubjectRecord::from(row)),
            // The guarded update misses both unknown rows and rows that
            // were already retired; a second probe tells the two apart.
            None => match self.find_subject(id).await? {
                Some(_) => Err(RepoError::AlreadyInactive),
                None => Err(RepoError::NotFound),
            },
        }
    }

    async fn list_subjects(&self, filter: &SubjectFilter) -> Result<Vec<SubjectRecord>, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT id, length, weight, is_active, create_at, delete_at FROM subjects WHERE 1=1 ",
        );

        for predicate in filter.predicates() {
            qb.push(" AND ");
            qb.push(predicate.column);
            qb.push(" ");
            qb.push(predicate.comparison.sql());
            qb.push(" ");
            match predicate.value {
                Bound::Int(value) => qb.push_bind(value),
                Bound::Float(value) => qb.push_bind(value),
                Bound::Bool(value) => qb.push_bind(value),
                Bound::Time(value) => qb.push_bind(value),
            };
        }

        qb.push(" ORDER BY id");

        let rows = qb
            .build_query_as::<SubjectRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(SubjectRecord::from).collect())
    }
}
