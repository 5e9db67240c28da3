use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Sqlite, SqlitePool};

/// Denormalized descriptive fields for a catalog title, cached locally the
/// first time any user lists it. Never deleted here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnimeMetadata {
    pub id: i64,
    pub title: String,
    pub genre: String,
    pub year: i64,
    pub platform: String,
    pub synopsis: String,
}

/// Join projection returned by [`list_by_status`]: the user's per-title
/// status and notes together with the cached metadata. Wire field names
/// are the Portuguese API contract.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ListedAnime {
    #[serde(rename = "id_anime")]
    pub anime_id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "genero")]
    pub genre: String,
    #[serde(rename = "ano")]
    pub year: i64,
    #[serde(rename = "plataforma")]
    pub platform: String,
    #[serde(rename = "sinopse")]
    pub synopsis: String,
    pub status: String,
    #[serde(rename = "notas")]
    pub notes: String,
}

impl AnimeMetadata {
    /// Idempotent upsert, last write wins.
    pub async fn upsert<'e, E>(ex: E, meta: &AnimeMetadata) -> sqlx::Result<()>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO anime_metadata (id, title, genre, year, platform, synopsis)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                title = excluded.title,
                genre = excluded.genre,
                year = excluded.year,
                platform = excluded.platform,
                synopsis = excluded.synopsis
            "#,
        )
        .bind(meta.id)
        .bind(&meta.title)
        .bind(&meta.genre)
        .bind(meta.year)
        .bind(&meta.platform)
        .bind(&meta.synopsis)
        .execute(ex)
        .await?;
        Ok(())
    }
}

/// Upsert keyed on (user_id, anime_id): a repeat add overwrites status and
/// notes instead of duplicating the entry.
pub async fn upsert_entry<'e, E>(
    ex: E,
    user_id: i64,
    anime_id: i64,
    status: &str,
    notes: &str,
) -> sqlx::Result<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO user_anime_list (user_id, anime_id, status, personal_notes)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (user_id, anime_id) DO UPDATE SET
            status = excluded.status,
            personal_notes = excluded.personal_notes
        "#,
    )
    .bind(user_id)
    .bind(anime_id)
    .bind(status)
    .bind(notes)
    .execute(ex)
    .await?;
    Ok(())
}

/// Metadata and list row move together or not at all, so a failed list
/// write cannot leave orphaned metadata behind.
pub async fn add_or_update(
    db: &SqlitePool,
    user_id: i64,
    meta: &AnimeMetadata,
    status: &str,
    notes: &str,
) -> anyhow::Result<()> {
    let mut tx = db.begin().await?;
    AnimeMetadata::upsert(&mut *tx, meta).await?;
    upsert_entry(&mut *tx, user_id, meta.id, status, notes).await?;
    tx.commit().await?;
    Ok(())
}

/// Ordering contract: ascending title, tie-broken by anime id.
pub async fn list_by_status(
    db: &SqlitePool,
    user_id: i64,
    status: &str,
) -> anyhow::Result<Vec<ListedAnime>> {
    let rows = sqlx::query_as::<_, ListedAnime>(
        r#"
        SELECT l.anime_id       AS anime_id,
               m.title          AS title,
               m.genre          AS genre,
               m.year           AS year,
               m.platform       AS platform,
               m.synopsis       AS synopsis,
               l.status         AS status,
               l.personal_notes AS notes
        FROM user_anime_list l
        JOIN anime_metadata m ON m.id = l.anime_id
        WHERE l.user_id = ? AND l.status = ?
        ORDER BY m.title ASC, l.anime_id ASC
        "#,
    )
    .bind(user_id)
    .bind(status)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Returns false when the entry was not present.
pub async fn delete(db: &SqlitePool, user_id: i64, anime_id: i64) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM user_anime_list WHERE user_id = ? AND anime_id = ?")
        .bind(user_id)
        .bind(anime_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    async fn test_db() -> SqlitePool {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    async fn insert_user(db: &SqlitePool, name: &str, email: &str) -> i64 {
        let row: (i64,) = sqlx::query_as(
            "INSERT INTO users (name, email, password_hash) VALUES (?, ?, 'x') RETURNING id",
        )
        .bind(name)
        .bind(email)
        .fetch_one(db)
        .await
        .unwrap();
        row.0
    }

    fn meta(id: i64, title: &str) -> AnimeMetadata {
        AnimeMetadata {
            id,
            title: title.into(),
            genre: "N/A".into(),
            year: 0,
            platform: "N/A".into(),
            synopsis: String::new(),
        }
    }

    #[tokio::test]
    async fn repeat_add_overwrites_instead_of_duplicating() {
        let db = test_db().await;
        let user = insert_user(&db, "Ana", "ana@x.com").await;

        add_or_update(&db, user, &meta(42, "Cowboy Bebop"), "watching", "")
            .await
            .unwrap();
        add_or_update(&db, user, &meta(42, "Cowboy Bebop"), "completed", "great")
            .await
            .unwrap();

        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM user_anime_list WHERE user_id = ?")
                .bind(user)
                .fetch_one(&db)
                .await
                .unwrap();
        assert_eq!(count, 1);

        assert!(list_by_status(&db, user, "watching").await.unwrap().is_empty());
        let completed = list_by_status(&db, user, "completed").await.unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].anime_id, 42);
        assert_eq!(completed[0].notes, "great");
    }

    #[tokio::test]
    async fn metadata_upsert_is_idempotent_and_overwrites() {
        let db = test_db().await;
        AnimeMetadata::upsert(&db, &meta(7, "Old Title")).await.unwrap();
        AnimeMetadata::upsert(&db, &meta(7, "New Title")).await.unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM anime_metadata")
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(count, 1);
        let (title,): (String,) =
            sqlx::query_as("SELECT title FROM anime_metadata WHERE id = 7")
                .fetch_one(&db)
                .await
                .unwrap();
        assert_eq!(title, "New Title");
    }

    #[tokio::test]
    async fn listing_filters_by_user_and_status_with_stable_order() {
        let db = test_db().await;
        let ana = insert_user(&db, "Ana", "ana@x.com").await;
        let bia = insert_user(&db, "Bia", "bia@x.com").await;

        add_or_update(&db, ana, &meta(2, "Berserk"), "watching", "").await.unwrap();
        add_or_update(&db, ana, &meta(1, "Akira"), "watching", "").await.unwrap();
        add_or_update(&db, ana, &meta(3, "Clannad"), "completed", "").await.unwrap();
        add_or_update(&db, bia, &meta(4, "Dororo"), "watching", "").await.unwrap();

        let watching = list_by_status(&db, ana, "watching").await.unwrap();
        let titles: Vec<&str> = watching.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Akira", "Berserk"]);
        assert!(watching.iter().all(|a| a.status == "watching"));
        assert!(watching.iter().all(|a| a.anime_id != 4));
    }

    #[tokio::test]
    async fn delete_reports_whether_the_entry_existed() {
        let db = test_db().await;
        let user = insert_user(&db, "Ana", "ana@x.com").await;
        add_or_update(&db, user, &meta(42, "Cowboy Bebop"), "watching", "")
            .await
            .unwrap();

        assert!(delete(&db, user, 42).await.unwrap());
        assert!(!delete(&db, user, 42).await.unwrap());
        // Metadata cache survives list removal.
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM anime_metadata")
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn list_add_requires_an_existing_user() {
        let db = test_db().await;
        let err = add_or_update(&db, 999, &meta(42, "Cowboy Bebop"), "watching", "").await;
        assert!(err.is_err());
        // The transaction rolled back, so no orphaned metadata either.
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM anime_metadata")
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
