// crates/db/src/queries/people.rs
use mnemo_types::{Id, Person};
use sqlx::PgPool;
use sqlx::Row;

use crate::DbResult;

fn row_to_person(row: &sqlx::postgres::PgRow) -> Person {
    Person {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        relationship: row.get("relationship"),
        organization: row.get("organization"),
    }
}

pub async fn get_person(pool: &PgPool, id: Id) -> DbResult<Option<Person>> {
    let row = sqlx::query("SELECT * FROM people WHERE id = $1").bind(id).fetch_optional(pool).await?;
    Ok(row.as_ref().map(row_to_person))
}

pub async fn list_people(pool: &PgPool) -> DbResult<Vec<Person>> {
    let rows = sqlx::query("SELECT * FROM people ORDER BY name").fetch_all(pool).await?;
    Ok(rows.iter().map(row_to_person).collect())
}

pub async fn upsert_person(pool: &PgPool, person: &Person) -> DbResult<Person> {
    let row = sqlx::query(
        r#"
        INSERT INTO people (id, name, email, relationship, organization)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (id) DO UPDATE SET
            name = EXCLUDED.name,
            email = EXCLUDED.email,
            relationship = EXCLUDED.relationship,
            organization = EXCLUDED.organization
        RETURNING *
        "#,
    )
    .bind(person.id)
    .bind(&person.name)
    .bind(&person.email)
    .bind(&person.relationship)
    .bind(&person.organization)
    .fetch_one(pool)
    .await?;

    Ok(row_to_person(&row))
}
