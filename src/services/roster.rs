use sqlx::SqlitePool;

use crate::models::student::Student;
use crate::services::scope::Scope;

/// User-supplied narrowing on top of an access scope. The exact class/stream
/// filters are only honored for the universal (admin) scope; a teacher's
/// scope already encodes the class/stream restriction.
#[derive(Debug, Clone, Default)]
pub struct RosterParams {
    pub search: Option<String>,
    pub filter_class: Option<String>,
    pub filter_stream: Option<String>,
}

/// Produces the roster visible to the given scope, intersected with any
/// user-supplied search or filters. Read-only.
///
/// An empty scope returns an empty roster without touching the store; it
/// must never widen into "no restriction".
#[tracing::instrument(skip(pool))]
pub async fn query_roster(
    pool: &SqlitePool,
    scope: &Scope,
    params: &RosterParams,
) -> Result<Vec<Student>, sqlx::Error> {
    match scope {
        Scope::Universal => {
            Student::list_filtered(
                pool,
                params.filter_class.as_deref(),
                params.filter_stream.as_deref(),
                params.search.as_deref(),
            )
            .await
        }
        Scope::Restricted(matchers) if matchers.is_empty() => Ok(Vec::new()),
        Scope::Restricted(matchers) => {
            Student::list_scoped(pool, matchers, params.search.as_deref()).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::models::account::Role;
    use crate::models::student::CreateStudentData;
    use crate::services::scope::resolve_scope;

    async fn seed(pool: &SqlitePool) -> Vec<i64> {
        let rows = [
            ("Amina Yusuf", "Form1", "A", "ADM001"),
            ("Brian Otieno", "Form1", "B", "ADM002"),
            ("Cynthia Wanjiru", "Form2", "A", "ADM003"),
        ];

        let mut ids = Vec::new();
        for (name, class, stream, admission) in rows {
            let student = Student::create(
                pool,
                CreateStudentData {
                    name: name.to_string(),
                    class: class.to_string(),
                    stream: stream.to_string(),
                    parent: format!("Parent of {}", name),
                    parent_number: "0700000000".to_string(),
                    admission_number: admission.to_string(),
                },
            )
            .await
            .unwrap();
            ids.push(student.id);
        }
        ids
    }

    #[tokio::test]
    async fn class_stream_assignment_sees_one_stream() {
        let pool = test_pool().await;
        let ids = seed(&pool).await;

        let scope = resolve_scope(Role::Teacher, "Form1-A").unwrap();
        let roster = query_roster(&pool, &scope, &RosterParams::default())
            .await
            .unwrap();

        assert_eq!(
            roster.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![ids[0]]
        );
    }

    #[tokio::test]
    async fn bare_class_assignment_sees_all_streams() {
        let pool = test_pool().await;
        let ids = seed(&pool).await;

        let scope = resolve_scope(Role::Teacher, "Form1").unwrap();
        let roster = query_roster(&pool, &scope, &RosterParams::default())
            .await
            .unwrap();

        assert_eq!(
            roster.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![ids[0], ids[1]]
        );
    }

    #[tokio::test]
    async fn empty_scope_returns_nothing_even_with_search() {
        let pool = test_pool().await;
        seed(&pool).await;

        let scope = resolve_scope(Role::Teacher, ",  ,").unwrap();
        let params = RosterParams {
            search: Some("a".to_string()),
            ..Default::default()
        };
        let roster = query_roster(&pool, &scope, &params).await.unwrap();

        assert!(roster.is_empty());
    }

    #[tokio::test]
    async fn teacher_search_narrows_within_scope() {
        let pool = test_pool().await;
        let ids = seed(&pool).await;

        let scope = resolve_scope(Role::Teacher, "Form1").unwrap();
        let params = RosterParams {
            search: Some("brian".to_string()),
            ..Default::default()
        };
        let roster = query_roster(&pool, &scope, &params).await.unwrap();

        // Search is a case-insensitive substring match on name
        assert_eq!(
            roster.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![ids[1]]
        );
    }

    #[tokio::test]
    async fn admin_sees_everything_and_can_filter() {
        let pool = test_pool().await;
        let ids = seed(&pool).await;

        let scope = resolve_scope(Role::Admin, "").unwrap();

        let all = query_roster(&pool, &scope, &RosterParams::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        let params = RosterParams {
            filter_class: Some("Form1".to_string()),
            filter_stream: Some("B".to_string()),
            ..Default::default()
        };
        let filtered = query_roster(&pool, &scope, &params).await.unwrap();
        assert_eq!(
            filtered.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![ids[1]]
        );
    }

    #[tokio::test]
    async fn admin_filters_compose_with_search() {
        let pool = test_pool().await;
        let ids = seed(&pool).await;

        let scope = resolve_scope(Role::Admin, "").unwrap();
        let params = RosterParams {
            search: Some("cynthia".to_string()),
            filter_class: Some("Form2".to_string()),
            filter_stream: None,
        };
        let roster = query_roster(&pool, &scope, &params).await.unwrap();

        assert_eq!(
            roster.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![ids[2]]
        );
    }
}
