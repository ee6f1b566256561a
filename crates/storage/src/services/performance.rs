use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::dto::workout::PersonalBestUpdate;
use crate::error::Result;
use crate::models::{ExercisePerformance, LoggedSet, WeightUnit, WorkoutSession};

/// Weight, reps and unit of a single set, detached from its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetSummary {
    pub weight: Decimal,
    pub reps: i32,
    pub unit: WeightUnit,
}

impl SetSummary {
    /// True when `self` beats `other`: heavier, or equally heavy with more reps.
    /// Weights in different units are compared in kilograms.
    pub fn beats(&self, other: &SetSummary) -> bool {
        let (mine, theirs) = if self.unit == other.unit {
            (self.weight, other.weight)
        } else {
            (self.unit.to_kg(self.weight), other.unit.to_kg(other.weight))
        };

        mine > theirs || (mine == theirs && self.reps > other.reps)
    }
}

impl From<&LoggedSet> for SetSummary {
    fn from(set: &LoggedSet) -> Self {
        Self {
            weight: set.weight,
            reps: set.reps,
            unit: set.unit,
        }
    }
}

impl ExercisePerformance {
    /// Stored personal best, if one has been recorded.
    pub fn personal_best(&self) -> Option<SetSummary> {
        match (self.pb_weight, self.pb_reps) {
            (Some(weight), Some(reps)) => Some(SetSummary {
                weight,
                reps,
                unit: self.pb_unit.unwrap_or_default(),
            }),
            _ => None,
        }
    }
}

/// Best set of one exercise within one session.
///
/// Highest weight wins, reps break ties, and the earliest set is kept unless a
/// later one is strictly better. Returns `None` for an empty list.
pub fn compute_best_set(sets: &[LoggedSet]) -> Option<&LoggedSet> {
    let mut iter = sets.iter();
    let mut best = iter.next()?;

    for set in iter {
        if SetSummary::from(set).beats(&SetSummary::from(best)) {
            best = set;
        }
    }

    Some(best)
}

/// Whether `candidate` should replace `existing` as the personal best.
/// A missing record counts as 0 weight for 0 reps.
pub fn improves_personal_best(candidate: &SetSummary, existing: Option<&SetSummary>) -> bool {
    let baseline = existing.copied().unwrap_or(SetSummary {
        weight: Decimal::ZERO,
        reps: 0,
        unit: candidate.unit,
    });

    candidate.beats(&baseline)
}

async fn find_session(
    session_id: Uuid,
    tx: &mut Transaction<'_, Postgres>,
) -> Result<Option<WorkoutSession>> {
    let session = sqlx::query_as::<_, WorkoutSession>(
        r#"
        SELECT session_id, user_id, split_id, started_at, completed_at, notes, is_active
        FROM workout_sessions
        WHERE session_id = $1
        "#,
    )
    .bind(session_id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(session)
}

/// Every set logged for `exercise_id` in the session, in session order.
async fn session_sets_for_exercise(
    session_id: Uuid,
    exercise_id: Uuid,
    tx: &mut Transaction<'_, Postgres>,
) -> Result<Vec<LoggedSet>> {
    let rows = sqlx::query_scalar::<_, Json<Vec<LoggedSet>>>(
        r#"
        SELECT sets
        FROM exercise_sets
        WHERE session_id = $1 AND exercise_id = $2
        ORDER BY order_index
        "#,
    )
    .bind(session_id)
    .bind(exercise_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(rows.into_iter().flat_map(|Json(sets)| sets).collect())
}

async fn find_performance(
    user_id: Uuid,
    exercise_id: Uuid,
    tx: &mut Transaction<'_, Postgres>,
) -> Result<Option<ExercisePerformance>> {
    let performance = sqlx::query_as::<_, ExercisePerformance>(
        r#"
        SELECT performance_id, user_id, exercise_id,
               last_weight, last_reps, last_unit, last_date, last_set_count,
               pb_weight, pb_reps, pb_unit, pb_date,
               total_workouts, updated_at
        FROM exercise_performances
        WHERE user_id = $1 AND exercise_id = $2
        "#,
    )
    .bind(user_id)
    .bind(exercise_id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(performance)
}

fn performed_at(session: &WorkoutSession) -> NaiveDateTime {
    session
        .completed_at
        .unwrap_or_else(|| chrono::Utc::now().naive_utc())
}

/// Records the session's best set for `exercise_id` as the personal best if it
/// strictly improves on the stored one. Last-performed fields are untouched.
///
/// No-op when the session is missing or has no sets for the exercise.
pub async fn update_personal_best(
    session_id: Uuid,
    exercise_id: Uuid,
    tx: &mut Transaction<'_, Postgres>,
) -> Result<Option<SetSummary>> {
    let Some(session) = find_session(session_id, tx).await? else {
        return Ok(None);
    };

    let sets = session_sets_for_exercise(session_id, exercise_id, tx).await?;
    let Some(best) = compute_best_set(&sets).map(SetSummary::from) else {
        return Ok(None);
    };

    let existing = find_performance(session.user_id, exercise_id, tx).await?;
    let existing_best = existing.as_ref().and_then(ExercisePerformance::personal_best);

    if !improves_personal_best(&best, existing_best.as_ref()) {
        return Ok(None);
    }

    sqlx::query(
        r#"
        INSERT INTO exercise_performances (user_id, exercise_id, pb_weight, pb_reps, pb_unit, pb_date)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (user_id, exercise_id)
        DO UPDATE SET
            pb_weight = EXCLUDED.pb_weight,
            pb_reps = EXCLUDED.pb_reps,
            pb_unit = EXCLUDED.pb_unit,
            pb_date = EXCLUDED.pb_date,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(session.user_id)
    .bind(exercise_id)
    .bind(best.weight)
    .bind(best.reps)
    .bind(best.unit)
    .bind(performed_at(&session))
    .execute(&mut **tx)
    .await?;

    debug!(
        user_id = %session.user_id,
        exercise_id = %exercise_id,
        weight = %best.weight,
        reps = best.reps,
        "New personal best"
    );

    Ok(Some(best))
}

/// Overwrites the last-performed snapshot with this session's best set and set
/// count, and recounts the workouts that include the exercise. The personal
/// best fields are preserved.
///
/// No-op when the session is missing or has no sets for the exercise.
pub async fn update_last_performed(
    session_id: Uuid,
    exercise_id: Uuid,
    tx: &mut Transaction<'_, Postgres>,
) -> Result<()> {
    let Some(session) = find_session(session_id, tx).await? else {
        return Ok(());
    };

    let sets = session_sets_for_exercise(session_id, exercise_id, tx).await?;
    let Some(best) = compute_best_set(&sets) else {
        return Ok(());
    };

    // Recounted from all of the user's sessions, not incremented.
    let total_workouts = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(DISTINCT ws.session_id)
        FROM workout_sessions ws
        JOIN exercise_sets es ON es.session_id = ws.session_id
        WHERE ws.user_id = $1
          AND es.exercise_id = $2
          AND jsonb_array_length(es.sets) > 0
        "#,
    )
    .bind(session.user_id)
    .bind(exercise_id)
    .fetch_one(&mut **tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO exercise_performances
            (user_id, exercise_id, last_weight, last_reps, last_unit, last_date, last_set_count, total_workouts)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (user_id, exercise_id)
        DO UPDATE SET
            last_weight = EXCLUDED.last_weight,
            last_reps = EXCLUDED.last_reps,
            last_unit = EXCLUDED.last_unit,
            last_date = EXCLUDED.last_date,
            last_set_count = EXCLUDED.last_set_count,
            total_workouts = EXCLUDED.total_workouts,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(session.user_id)
    .bind(exercise_id)
    .bind(best.weight)
    .bind(best.reps)
    .bind(best.unit)
    .bind(performed_at(&session))
    .bind(sets.len() as i32)
    .bind(total_workouts)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Runs both updates for every exercise with logged sets in the session and
/// reports the personal bests that were set.
pub async fn aggregate_session(
    session_id: Uuid,
    tx: &mut Transaction<'_, Postgres>,
) -> Result<Vec<PersonalBestUpdate>> {
    let exercise_ids = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT exercise_id
        FROM exercise_sets
        WHERE session_id = $1 AND jsonb_array_length(sets) > 0
        GROUP BY exercise_id
        ORDER BY MIN(order_index)
        "#,
    )
    .bind(session_id)
    .fetch_all(&mut **tx)
    .await?;

    let mut personal_bests = Vec::new();

    for exercise_id in exercise_ids {
        if let Some(best) = update_personal_best(session_id, exercise_id, tx).await? {
            personal_bests.push(PersonalBestUpdate {
                exercise_id,
                weight: best.weight,
                reps: best.reps,
                unit: best.unit,
            });
        }
        update_last_performed(session_id, exercise_id, tx).await?;
    }

    Ok(personal_bests)
}
