/// Aggregate statistics over a user's todos
///
/// Two aggregates back the client's dashboard:
///
/// - **Completion ratio**: active (non-deleted) todos split by completion
///   flag.
/// - **Daily completions**: for each day in the trailing 7-day window
///   (inclusive of today), how many completed, non-deleted todos have a
///   deadline on that calendar day. The histogram always contains exactly
///   seven entries; days without completions carry an explicit zero.
///
/// Note the histogram keys by *deadline* date, not the date the todo was
/// marked complete: a todo finished late still counts on its deadline day.
///
/// # Example
///
/// ```no_run
/// use todolane_shared::models::stats;
/// use todolane_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let owner = Uuid::new_v4();
///
/// let ratio = stats::completion_ratio(&pool, owner).await?;
/// println!("{} done, {} to go", ratio.completed, ratio.active);
///
/// let daily = stats::daily_completions(&pool, owner).await?;
/// assert_eq!(daily.len(), 7);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Length of the daily-completions window, in days
const WINDOW_DAYS: i64 = 7;

/// Completed/active split of a user's non-deleted todos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRatio {
    /// Count of completed todos
    pub completed: i64,

    /// Count of not-yet-completed todos
    pub active: i64,
}

/// One day of the completion histogram
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCompletion {
    /// Calendar day (local date)
    pub date: NaiveDate,

    /// Completed todos with a deadline on that day
    pub count: i64,
}

/// Counts the owner's active todos split by completion flag
pub async fn completion_ratio(
    pool: &PgPool,
    owner: Uuid,
) -> Result<CompletionRatio, sqlx::Error> {
    let (completed, active): (i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*) FILTER (WHERE is_completed) AS completed,
            COUNT(*) FILTER (WHERE NOT is_completed) AS active
        FROM todos
        WHERE user_id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(owner)
    .fetch_one(pool)
    .await?;

    Ok(CompletionRatio { completed, active })
}

/// Builds the 7-day completion histogram ending today (server-local)
pub async fn daily_completions(
    pool: &PgPool,
    owner: Uuid,
) -> Result<Vec<DailyCompletion>, sqlx::Error> {
    daily_completions_ending(pool, owner, Local::now().date_naive()).await
}

/// Builds the 7-day completion histogram for an explicit window end
///
/// Split out from [`daily_completions`] so tests can pin the window.
pub async fn daily_completions_ending(
    pool: &PgPool,
    owner: Uuid,
    window_end: NaiveDate,
) -> Result<Vec<DailyCompletion>, sqlx::Error> {
    let window_start = window_end - Duration::days(WINDOW_DAYS - 1);

    let rows: Vec<(NaiveDate, i64)> = sqlx::query_as(
        r#"
        SELECT deadline::date AS day, COUNT(*) AS count
        FROM todos
        WHERE user_id = $1
          AND deleted_at IS NULL
          AND is_completed
          AND deadline::date BETWEEN $2 AND $3
        GROUP BY day
        ORDER BY day
        "#,
    )
    .bind(owner)
    .bind(window_start)
    .bind(window_end)
    .fetch_all(pool)
    .await?;

    Ok(fill_missing_days(&rows, window_end))
}

/// Expands sparse per-day counts into a dense 7-entry window
///
/// `rows` must only contain dates inside the window; days absent from
/// `rows` come back with a zero count.
fn fill_missing_days(rows: &[(NaiveDate, i64)], window_end: NaiveDate) -> Vec<DailyCompletion> {
    let window_start = window_end - Duration::days(WINDOW_DAYS - 1);

    (0..WINDOW_DAYS)
        .map(|offset| {
            let date = window_start + Duration::days(offset);
            let count = rows
                .iter()
                .find(|(day, _)| *day == date)
                .map(|(_, count)| *count)
                .unwrap_or(0);
            DailyCompletion { date, count }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fill_missing_days_empty() {
        let window_end = date(2025, 1, 10);
        let filled = fill_missing_days(&[], window_end);

        assert_eq!(filled.len(), 7);
        assert_eq!(filled[0].date, date(2025, 1, 4));
        assert_eq!(filled[6].date, window_end);
        assert!(filled.iter().all(|d| d.count == 0));
    }

    #[test]
    fn test_fill_missing_days_sparse() {
        let window_end = date(2025, 1, 10);
        let rows = vec![(date(2025, 1, 5), 2), (date(2025, 1, 10), 1)];
        let filled = fill_missing_days(&rows, window_end);

        assert_eq!(filled.len(), 7);
        assert_eq!(filled[1], DailyCompletion { date: date(2025, 1, 5), count: 2 });
        assert_eq!(filled[6], DailyCompletion { date: date(2025, 1, 10), count: 1 });
        // The remaining five days are explicit zeros
        assert_eq!(filled.iter().filter(|d| d.count == 0).count(), 5);
    }

    #[test]
    fn test_fill_missing_days_crosses_month_boundary() {
        let window_end = date(2025, 2, 2);
        let filled = fill_missing_days(&[], window_end);

        assert_eq!(filled[0].date, date(2025, 1, 27));
        assert_eq!(filled[6].date, date(2025, 2, 2));
    }

    #[test]
    fn test_fill_missing_days_is_ordered() {
        let filled = fill_missing_days(&[], date(2025, 6, 15));
        for pair in filled.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }
}
