use crate::database::DbError;
use crate::database::tables::app_user::User;
use sqlx::{Executor, Postgres};

pub struct UserStore;

impl UserStore {
    pub async fn find_by_id(
        executor: impl Executor<'_, Database = Postgres>,
        user_id: i32,
    ) -> Result<Option<User>, DbError> {
        Ok(sqlx::query_as::<_, User>(
            r"
            SELECT
                id,
                created_at,
                updated_at,
                email,
                name,
                role
            FROM app_user
            WHERE id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await?)
    }
}
