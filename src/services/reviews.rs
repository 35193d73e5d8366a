use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Review, ReviewInput};

/// One review per user per bootcamp is enforced by a unique index on
/// (bootcamp_id, user_id); a duplicate surfaces as a unique violation.
pub async fn create(
    pool: &PgPool,
    bootcamp_id: Uuid,
    author_id: Uuid,
    input: &ReviewInput,
) -> Result<Review, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let review: Review = sqlx::query_as(
        r#"
        INSERT INTO reviews (id, bootcamp_id, user_id, title, text, rating, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(bootcamp_id)
    .bind(author_id)
    .bind(&input.title)
    .bind(&input.text)
    .bind(input.rating)
    .fetch_one(&mut *tx)
    .await?;

    recompute_average_rating(&mut tx, bootcamp_id).await?;
    tx.commit().await?;
    Ok(review)
}

pub async fn update(pool: &PgPool, id: Uuid, input: &ReviewInput) -> Result<Review, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let review: Review = sqlx::query_as(
        r#"
        UPDATE reviews SET title = $2, text = $3, rating = $4
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.title)
    .bind(&input.text)
    .bind(input.rating)
    .fetch_one(&mut *tx)
    .await?;

    recompute_average_rating(&mut tx, review.bootcamp_id).await?;
    tx.commit().await?;
    Ok(review)
}

pub async fn delete(pool: &PgPool, review: &Review) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM reviews WHERE id = $1")
        .bind(review.id)
        .execute(&mut *tx)
        .await?;
    recompute_average_rating(&mut tx, review.bootcamp_id).await?;
    tx.commit().await
}

async fn recompute_average_rating(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    bootcamp_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE bootcamps SET average_rating = (
            SELECT AVG(rating) FROM reviews WHERE bootcamp_id = $1
        )
        WHERE id = $1
        "#,
    )
    .bind(bootcamp_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
