use model::{record::MarkingRecord, WithId};
use sqlx::{Executor, Postgres};

use crate::data_model::marking_record::MarkingRecordRow;

use super::convert_error;

pub async fn put<'c, E>(
    executor: E,
    record: MarkingRecord,
) -> tracking::database::Result<WithId<MarkingRecord>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO marking_records(
            header,
            imei,
            packet_type,
            time,
            lat,
            direction_lat,
            lng,
            direction_lng,
            date,
            checksum
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING
            id,
            header,
            imei,
            packet_type,
            time,
            lat,
            direction_lat,
            lng,
            direction_lng,
            date,
            checksum,
            created_at;
        ",
    )
    .bind(record.header)
    .bind(record.imei.into_raw())
    .bind(record.packet_type)
    .bind(record.time)
    .bind(record.lat)
    .bind(record.direction_lat)
    .bind(record.lng)
    .bind(record.direction_lng)
    .bind(record.date)
    .bind(record.checksum)
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(|row: MarkingRecordRow| row.to_model())
}
