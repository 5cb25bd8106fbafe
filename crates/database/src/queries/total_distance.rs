use chrono::{DateTime, Local};
use model::{device::Device, record::TotalDistance, WithId};
use sqlx::{Executor, Postgres};
use utility::id::Id;

use crate::data_model::total_distance::{DeviceSumRow, TotalDistanceRow};

use super::convert_error;

pub async fn put<'c, E>(
    executor: E,
    record: TotalDistance,
) -> tracking::database::Result<WithId<TotalDistance>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO total_distances(
            imei,
            total_distance
        )
        VALUES ($1, $2)
        RETURNING
            id,
            imei,
            total_distance,
            created_at;
        ",
    )
    .bind(record.imei.into_raw())
    .bind(record.total_distance)
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(|row: TotalDistanceRow| row.to_model())
}

/// `None` if the device has no record in the window.
pub async fn sum_for_device<'c, E>(
    executor: E,
    device: &Id<Device>,
    since: Option<DateTime<Local>>,
) -> tracking::database::Result<Option<f64>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_scalar(
        "
        SELECT
            SUM(total_distance)
        FROM
            total_distances
        WHERE
            imei = $1
            AND ($2::timestamptz IS NULL OR created_at > $2);
        ",
    )
    .bind(device.raw_ref::<str>())
    .bind(since)
    .fetch_one(executor)
    .await
    .map_err(convert_error)
}

pub async fn sum_by_device<'c, E>(
    executor: E,
    since: Option<DateTime<Local>>,
) -> tracking::database::Result<Vec<(Id<Device>, f64)>>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows: Vec<DeviceSumRow> = sqlx::query_as(
        "
        SELECT
            imei,
            SUM(total_distance) AS total_distance
        FROM
            total_distances
        WHERE
            $1::timestamptz IS NULL OR created_at > $1
        GROUP BY
            imei
        ORDER BY
            MIN(created_at) ASC;
        ",
    )
    .bind(since)
    .fetch_all(executor)
    .await
    .map_err(convert_error)?;

    Ok(rows
        .into_iter()
        .map(|row| (Id::new(row.imei), row.total_distance))
        .collect())
}
