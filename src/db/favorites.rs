use sqlx::SqlitePool;

use crate::{error::AppResult, models::Favorite};

/// Saves a favorite. An id that is already stored is left untouched.
///
/// Returns `true` when a new row was written.
pub async fn add(pool: &SqlitePool, favorite: &Favorite) -> AppResult<bool> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO favorites (id, title, poster, rating, language, type) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(favorite.id)
    .bind(&favorite.title)
    .bind(&favorite.poster)
    .bind(favorite.rating)
    .bind(&favorite.language)
    .bind(&favorite.media_type)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Every saved favorite, oldest first
pub async fn list(pool: &SqlitePool) -> AppResult<Vec<Favorite>> {
    let rows = sqlx::query_as::<_, Favorite>(
        "SELECT id, title, poster, rating, language, type FROM favorites ORDER BY seq",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Deletes a favorite by id. Returns `true` when a row was removed.
pub async fn remove(pool: &SqlitePool, id: i64) -> AppResult<bool> {
    let result = sqlx::query("DELETE FROM favorites WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations};

    async fn test_pool() -> SqlitePool {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    fn favorite(id: i64, title: &str) -> Favorite {
        Favorite {
            id,
            title: title.to_string(),
            poster: Some(format!("/{}.jpg", id)),
            rating: Some(7.5),
            language: Some("en".to_string()),
            media_type: Some("movie".to_string()),
        }
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let pool = test_pool().await;

        assert!(add(&pool, &favorite(27205, "Inception")).await.unwrap());
        assert!(add(&pool, &favorite(603, "The Matrix")).await.unwrap());

        let rows = list(&pool).await.unwrap();
        assert_eq!(rows, vec![favorite(27205, "Inception"), favorite(603, "The Matrix")]);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order_not_id_order() {
        let pool = test_pool().await;

        add(&pool, &favorite(900, "first")).await.unwrap();
        add(&pool, &favorite(5, "second")).await.unwrap();
        remove(&pool, 900).await.unwrap();
        add(&pool, &favorite(900, "third")).await.unwrap();

        let titles: Vec<String> = list(&pool).await.unwrap().into_iter().map(|f| f.title).collect();
        assert_eq!(titles, vec!["second", "third"]);
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let pool = test_pool().await;

        assert!(add(&pool, &favorite(27205, "Inception")).await.unwrap());
        assert!(!add(&pool, &favorite(27205, "Renamed")).await.unwrap());

        let rows = list(&pool).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Inception");
    }

    #[tokio::test]
    async fn test_remove() {
        let pool = test_pool().await;
        add(&pool, &favorite(27205, "Inception")).await.unwrap();

        assert!(remove(&pool, 27205).await.unwrap());
        assert!(!remove(&pool, 27205).await.unwrap());
        assert!(list(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_optional_columns_round_trip_as_null() {
        let pool = test_pool().await;
        let bare = Favorite {
            id: 1,
            title: "Bare".to_string(),
            poster: None,
            rating: None,
            language: None,
            media_type: None,
        };

        add(&pool, &bare).await.unwrap();
        assert_eq!(list(&pool).await.unwrap(), vec![bare]);
    }
}
