use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Course, CourseInput};

pub async fn create(
    pool: &PgPool,
    bootcamp_id: Uuid,
    owner_id: Uuid,
    input: &CourseInput,
) -> Result<Course, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let course: Course = sqlx::query_as(
        r#"
        INSERT INTO courses
            (id, bootcamp_id, user_id, title, description, weeks, tuition,
             minimum_skill, scholarship_available, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(bootcamp_id)
    .bind(owner_id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.weeks)
    .bind(input.tuition)
    .bind(&input.minimum_skill)
    .bind(input.scholarship_available)
    .fetch_one(&mut *tx)
    .await?;

    recompute_average_cost(&mut tx, bootcamp_id).await?;
    tx.commit().await?;
    Ok(course)
}

pub async fn update(pool: &PgPool, id: Uuid, input: &CourseInput) -> Result<Course, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let course: Course = sqlx::query_as(
        r#"
        UPDATE courses SET
            title = $2, description = $3, weeks = $4, tuition = $5,
            minimum_skill = $6, scholarship_available = $7
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.weeks)
    .bind(input.tuition)
    .bind(&input.minimum_skill)
    .bind(input.scholarship_available)
    .fetch_one(&mut *tx)
    .await?;

    recompute_average_cost(&mut tx, course.bootcamp_id).await?;
    tx.commit().await?;
    Ok(course)
}

pub async fn delete(pool: &PgPool, course: &Course) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM courses WHERE id = $1")
        .bind(course.id)
        .execute(&mut *tx)
        .await?;
    recompute_average_cost(&mut tx, course.bootcamp_id).await?;
    tx.commit().await
}

/// Rolls the tuition average up onto the parent bootcamp, rounded to the
/// nearest 10 above. NULL when the last course is removed.
async fn recompute_average_cost(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    bootcamp_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE bootcamps SET average_cost = (
            SELECT CEIL(AVG(tuition) / 10) * 10
            FROM courses WHERE bootcamp_id = $1
        )
        WHERE id = $1
        "#,
    )
    .bind(bootcamp_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
