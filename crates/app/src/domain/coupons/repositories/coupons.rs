//! Coupons Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::domain::coupons::models::{CampaignId, Coupon, CouponStatus};

const INSERT_COUPONS_SQL: &str = include_str!("sql/insert_coupons.sql");
const SELECT_AVAILABLE_COUPON_SQL: &str = include_str!("sql/select_available_coupon.sql");
const MARK_COUPON_ISSUED_SQL: &str = include_str!("sql/mark_coupon_issued.sql");
const LIST_ISSUED_CODES_SQL: &str = include_str!("sql/list_issued_codes.sql");

/// Rows written per insert statement.
pub(crate) const INSERT_BATCH_SIZE: usize = 1_000;

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCouponsRepository;

impl PgCouponsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert `codes` as the campaign's pool; a code's position is its pool index.
    ///
    /// Batches share the caller's transaction and are only visible once it commits.
    pub(crate) async fn insert_coupons(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        campaign: CampaignId,
        codes: &[String],
        created_at: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let mut inserted = 0;

        for (batch, chunk) in codes.chunks(INSERT_BATCH_SIZE).enumerate() {
            let offset = batch * INSERT_BATCH_SIZE;

            let indices = (offset..offset + chunk.len())
                .map(i32::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

            inserted += query(INSERT_COUPONS_SQL)
                .bind(campaign.into_i64())
                .bind(chunk)
                .bind(indices)
                .bind(SqlxTimestamp::from(created_at))
                .execute(&mut **tx)
                .await?
                .rows_affected();
        }

        Ok(inserted)
    }

    /// Lock the oldest available coupon not already locked by another transaction.
    pub(crate) async fn select_available_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        campaign: CampaignId,
    ) -> Result<Option<String>, sqlx::Error> {
        query_scalar::<Postgres, String>(SELECT_AVAILABLE_COUPON_SQL)
            .bind(campaign.into_i64())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Returns `None` when the coupon is no longer available.
    pub(crate) async fn mark_coupon_issued(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
        issued_at: Timestamp,
    ) -> Result<Option<Coupon>, sqlx::Error> {
        query_as::<Postgres, Coupon>(MARK_COUPON_ISSUED_SQL)
            .bind(code)
            .bind(SqlxTimestamp::from(issued_at))
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_issued_codes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        campaign: CampaignId,
    ) -> Result<Vec<String>, sqlx::Error> {
        query_scalar::<Postgres, String>(LIST_ISSUED_CODES_SQL)
            .bind(campaign.into_i64())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Coupon {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let pool_index: i32 = row.try_get("pool_index")?;

        let pool_index = u32::try_from(pool_index).map_err(|e| sqlx::Error::ColumnDecode {
            index: "pool_index".to_string(),
            source: Box::new(e),
        })?;

        let status = row
            .try_get::<&str, _>("status")?
            .parse::<CouponStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            code: row.try_get("code")?,
            campaign_id: CampaignId::from_i64(row.try_get("campaign_id")?),
            pool_index,
            status,
            issued_at: row
                .try_get::<Option<SqlxTimestamp>, _>("issued_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
