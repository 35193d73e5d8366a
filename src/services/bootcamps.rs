use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Bootcamp, BootcampDraft};

/// Owner ids of every published bootcamp, for the one-per-publisher rule.
pub async fn existing_owner_ids(pool: &PgPool) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows: Vec<(Uuid,)> = sqlx::query_as("SELECT DISTINCT user_id FROM bootcamps")
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

pub async fn create(
    pool: &PgPool,
    owner_id: Uuid,
    draft: &BootcampDraft,
) -> Result<Bootcamp, sqlx::Error> {
    let location = draft.location.as_ref();
    sqlx::query_as(
        r#"
        INSERT INTO bootcamps
            (id, user_id, name, slug, description, website, phone, email, address,
             formatted_address, street, city, state, zipcode, country, lat, lng,
             careers, housing, job_assistance, job_guarantee, accept_gi, created_at)
        VALUES
            ($1, $2, $3, $4, $5, $6, $7, $8, $9,
             $10, $11, $12, $13, $14, $15, $16, $17,
             $18, $19, $20, $21, $22, NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(&draft.input.name)
    .bind(draft.slug.as_deref())
    .bind(&draft.input.description)
    .bind(draft.input.website.as_deref())
    .bind(draft.input.phone.as_deref())
    .bind(draft.input.email.as_deref())
    .bind(&draft.input.address)
    .bind(location.and_then(|l| l.formatted_address.as_deref()))
    .bind(location.and_then(|l| l.street.as_deref()))
    .bind(location.and_then(|l| l.city.as_deref()))
    .bind(location.and_then(|l| l.state.as_deref()))
    .bind(location.and_then(|l| l.zipcode.as_deref()))
    .bind(location.and_then(|l| l.country.as_deref()))
    .bind(location.map(|l| l.lat))
    .bind(location.map(|l| l.lng))
    .bind(&draft.input.careers)
    .bind(draft.input.housing)
    .bind(draft.input.job_assistance)
    .bind(draft.input.job_guarantee)
    .bind(draft.input.accept_gi)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    draft: &BootcampDraft,
) -> Result<Bootcamp, sqlx::Error> {
    let location = draft.location.as_ref();
    sqlx::query_as(
        r#"
        UPDATE bootcamps SET
            name = $2, slug = $3, description = $4, website = $5, phone = $6,
            email = $7, address = $8, formatted_address = $9, street = $10,
            city = $11, state = $12, zipcode = $13, country = $14, lat = $15,
            lng = $16, careers = $17, housing = $18, job_assistance = $19,
            job_guarantee = $20, accept_gi = $21
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&draft.input.name)
    .bind(draft.slug.as_deref())
    .bind(&draft.input.description)
    .bind(draft.input.website.as_deref())
    .bind(draft.input.phone.as_deref())
    .bind(draft.input.email.as_deref())
    .bind(&draft.input.address)
    .bind(location.and_then(|l| l.formatted_address.as_deref()))
    .bind(location.and_then(|l| l.street.as_deref()))
    .bind(location.and_then(|l| l.city.as_deref()))
    .bind(location.and_then(|l| l.state.as_deref()))
    .bind(location.and_then(|l| l.zipcode.as_deref()))
    .bind(location.and_then(|l| l.country.as_deref()))
    .bind(location.map(|l| l.lat))
    .bind(location.map(|l| l.lng))
    .bind(&draft.input.careers)
    .bind(draft.input.housing)
    .bind(draft.input.job_assistance)
    .bind(draft.input.job_guarantee)
    .bind(draft.input.accept_gi)
    .fetch_one(pool)
    .await
}

/// Removing a bootcamp takes its courses and reviews with it, atomically.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM reviews WHERE bootcamp_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM courses WHERE bootcamp_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM bootcamps WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await
}

pub async fn set_photo(
    pool: &PgPool,
    id: Uuid,
    filename: &str,
) -> Result<Bootcamp, sqlx::Error> {
    sqlx::query_as("UPDATE bootcamps SET photo = $2 WHERE id = $1 RETURNING *")
        .bind(id)
        .bind(filename)
        .fetch_one(pool)
        .await
}

/// Great-circle radius search (distance in miles) over geocoded listings.
pub async fn within_radius(
    pool: &PgPool,
    lat: f64,
    lng: f64,
    distance_miles: f64,
) -> Result<Vec<Bootcamp>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM bootcamps
        WHERE lat IS NOT NULL AND lng IS NOT NULL
          AND 2 * 3963 * asin(sqrt(
                pow(sin(radians(lat - $1) / 2), 2)
                + cos(radians($1)) * cos(radians(lat))
                  * pow(sin(radians(lng - $2) / 2), 2)
              )) <= $3
        ORDER BY created_at DESC
        "#,
    )
    .bind(lat)
    .bind(lng)
    .bind(distance_miles)
    .fetch_all(pool)
    .await
}
