#[cfg(test)]
mod tests {
    use crate::database::entity::{comment, post, post_like, user};
    use crate::database::postgres_repo::{
        PostgresCommentRepository, PostgresLikeRepository, PostgresPostRepository,
        PostgresUserRepository,
    };
    use inkwell_core::domain::{LikeTarget, Post, User};
    use inkwell_core::error::RepoError;
    use inkwell_core::ports::{
        BaseRepository, CommentRepository, LikeRepository, PostRepository, UserRepository,
    };
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn post_model(id: i64, user_id: Option<uuid::Uuid>) -> post::Model {
        post::Model {
            id,
            title: "Test Post".to_owned(),
            content: "Content".to_owned(),
            photo_url: None,
            register_date: chrono::Utc::now().into(),
            user_id,
        }
    }

    fn comment_model(id: i64, post_id: i64, parent: Option<i64>) -> comment::Model {
        comment::Model {
            id,
            content: format!("comment {id}"),
            user_id: None,
            post_id,
            parent_comment_id: parent,
            created_date: chrono::Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let user_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(7, Some(user_id))]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(7).await.unwrap();

        let post = result.unwrap();
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.id, 7);
        assert_eq!(post.user_id, Some(user_id));
    }

    #[tokio::test]
    async fn test_user_roles_round_trip_through_json_column() {
        let id = uuid::Uuid::new_v4();
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user::Model {
                id,
                user_name: "admin".to_owned(),
                email: "admin@example.com".to_owned(),
                first_name: String::new(),
                last_name: String::new(),
                birth_date: None,
                photo_url: None,
                register_date: now.into(),
                status: true,
                roles: serde_json::json!(["Admin"]),
                password_hash: "hash".to_owned(),
            }]])
            .into_connection();

        let repo = PostgresUserRepository::new(db);

        let user: User = repo.find_by_user_name("admin").await.unwrap().unwrap();

        assert_eq!(user.id, id);
        assert!(user.has_role("Admin"));
        assert!(user.is_bootstrap_admin());
    }

    #[test]
    fn test_malformed_roles_load_as_no_roles() {
        let model = user::Model {
            id: uuid::Uuid::new_v4(),
            user_name: "admin".to_owned(),
            email: "admin@example.com".to_owned(),
            first_name: String::new(),
            last_name: String::new(),
            birth_date: None,
            photo_url: None,
            register_date: chrono::Utc::now().into(),
            status: true,
            roles: serde_json::json!({ "Admin": true }),
            password_hash: "hash".to_owned(),
        };

        let user = User::from(model);

        assert!(user.roles.is_empty());
        assert!(!user.has_role("Admin"));
    }

    #[tokio::test]
    async fn test_post_cascade_on_missing_post_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result = repo.delete_cascade(42).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_comment_cascade_plans_the_subtree() {
        // 1 <- 2 <- 3, plus sibling root 4
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![comment_model(2, 9, Some(1))]])
            .append_query_results(vec![vec![
                comment_model(1, 9, None),
                comment_model(2, 9, Some(1)),
                comment_model(3, 9, Some(2)),
                comment_model(4, 9, None),
            ]])
            .append_query_results(vec![Vec::<crate::database::entity::comment_like::Model>::new()])
            .append_exec_results(vec![
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection();

        let repo = PostgresCommentRepository::new(db);

        let plan = repo.delete_cascade(2).await.unwrap();

        assert_eq!(plan.comments, vec![3, 2]);
        assert!(plan.post.is_none());
    }

    #[tokio::test]
    async fn test_find_post_like_by_composite_key() {
        let user_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_like::Model {
                user_id,
                post_id: 5,
                created_at: chrono::Utc::now().into(),
            }]])
            .into_connection();

        let repo = PostgresLikeRepository::new(db);

        let like = repo
            .find(user_id, LikeTarget::Post(5))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(like.user_id, user_id);
        assert_eq!(like.target, LikeTarget::Post(5));
    }

    #[tokio::test]
    async fn test_unlike_reports_missing_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresLikeRepository::new(db);

        let removed = repo
            .delete(uuid::Uuid::new_v4(), LikeTarget::Comment(3))
            .await
            .unwrap();

        assert!(!removed);
    }
}
