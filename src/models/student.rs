use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use crate::services::scope::Matcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum PickupStatus {
    #[sqlx(rename = "Not Picked")]
    #[serde(rename = "Not Picked")]
    NotPicked,
    Picked,
}

impl PickupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PickupStatus::NotPicked => "Not Picked",
            PickupStatus::Picked => "Picked",
        }
    }
}

impl std::fmt::Display for PickupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub class: String,
    pub stream: String,
    pub parent: String,
    pub parent_number: String,
    pub admission_number: String,
    pub status: PickupStatus,
}

#[derive(Debug, Clone)]
pub struct CreateStudentData {
    pub name: String,
    pub class: String,
    pub stream: String,
    pub parent: String,
    pub parent_number: String,
    pub admission_number: String,
}

impl Student {
    /// Registers a new student. Status defaults to `Not Picked`; a duplicate
    /// admission number surfaces as a UNIQUE violation from the store.
    pub async fn create(pool: &SqlitePool, data: CreateStudentData) -> Result<Self, sqlx::Error> {
        let student = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO students (name, class, stream, parent, parent_number, admission_number)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.class)
        .bind(&data.stream)
        .bind(&data.parent)
        .bind(&data.parent_number)
        .bind(&data.admission_number)
        .fetch_one(pool)
        .await?;

        Ok(student)
    }

    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let student = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM students WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(student)
    }

    pub async fn update_status<'e, E>(
        executor: E,
        id: i64,
        status: PickupStatus,
    ) -> Result<(), sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            UPDATE students SET status = ? WHERE id = ?
            "#,
        )
        .bind(status)
        .bind(id)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Lists students visible through a set of class/stream matchers, joined
    /// as a disjunction: a row is returned if any matcher accepts it. The
    /// optional search narrows by case-insensitive substring on name.
    ///
    /// Callers must not pass an empty matcher list; an empty scope means "no
    /// visibility" and is short-circuited before the store is reached.
    pub async fn list_scoped(
        pool: &SqlitePool,
        matchers: &[Matcher],
        search: Option<&str>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM students WHERE (");
        for (i, matcher) in matchers.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            match matcher {
                Matcher::Class(class) => {
                    qb.push("class = ").push_bind(class.as_str());
                }
                Matcher::ClassStream(class, stream) => {
                    qb.push("(class = ")
                        .push_bind(class.as_str())
                        .push(" AND stream = ")
                        .push_bind(stream.as_str())
                        .push(")");
                }
            }
        }
        qb.push(")");

        if let Some(search) = search {
            qb.push(" AND name LIKE ").push_bind(format!("%{}%", search));
        }
        qb.push(" ORDER BY id");

        let students = qb.build_query_as::<Self>().fetch_all(pool).await?;

        Ok(students)
    }

    /// Lists students with optional exact class/stream filters and an
    /// optional name search, all ANDed. Used for the unrestricted admin view.
    pub async fn list_filtered(
        pool: &SqlitePool,
        class: Option<&str>,
        stream: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM students WHERE 1=1");
        if let Some(class) = class {
            qb.push(" AND class = ").push_bind(class);
        }
        if let Some(stream) = stream {
            qb.push(" AND stream = ").push_bind(stream);
        }
        if let Some(search) = search {
            qb.push(" AND name LIKE ").push_bind(format!("%{}%", search));
        }
        qb.push(" ORDER BY id");

        let students = qb.build_query_as::<Self>().fetch_all(pool).await?;

        Ok(students)
    }
}
