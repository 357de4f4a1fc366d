use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::MySqlPool;

pub struct MySqlPostRepo {
    pool: MySqlPool,
}

impl MySqlPostRepo {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PostRepo for MySqlPostRepo {
    async fn insert(
        &self,
        author: UserId,
        caption: &str,
        image_url: Option<&str>,
    ) -> Result<PostId, PostError> {
        let result = sqlx::query(
            r#"
INSERT INTO post (user_id, caption, image_url)
VALUES (?, ?, ?)
"#,
        )
        .bind(author)
        .bind(caption)
        .bind(image_url)
        .execute(&self.pool)
        .await
        .map_err(|e| PostError::Store(format!("insert post: {e}")))?;

        Ok(PostId(result.last_insert_id() as i64))
    }

    async fn author_of(&self, post_id: PostId) -> Result<Option<UserId>, PostError> {
        sqlx::query_scalar::<_, UserId>(r#"SELECT user_id FROM post WHERE post_id = ?"#)
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PostError::Store(format!("select post author: {e}")))
    }

    async fn delete(&self, post_id: PostId) -> Result<(), PostError> {
        let result = sqlx::query(r#"DELETE FROM post WHERE post_id = ?"#)
            .bind(post_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PostError::Store(format!("delete post: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(PostError::PostNotFound);
        }

        Ok(())
    }

    async fn scan_feed(&self) -> Result<Vec<PostSummary>, PostError> {
        sqlx::query_as::<_, PostSummary>(
            r#"
SELECT p.post_id, p.user_id, u.username, p.caption, p.image_url, p.created_at
FROM post p
JOIN user u
  ON u.user_id = p.user_id
ORDER BY p.created_at DESC,
         p.post_id DESC
"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PostError::Store(format!("scan feed: {e}")))
    }
}
