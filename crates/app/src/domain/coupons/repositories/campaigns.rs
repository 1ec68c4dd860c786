//! Campaigns Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::coupons::models::{Campaign, CampaignId};

const CREATE_CAMPAIGN_SQL: &str = include_str!("sql/create_campaign.sql");
const GET_CAMPAIGN_SQL: &str = include_str!("sql/get_campaign.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCampaignsRepository;

impl PgCampaignsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_campaign(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        available_coupons: u32,
        start_date: Timestamp,
    ) -> Result<Campaign, sqlx::Error> {
        let available_coupons =
            i32::try_from(available_coupons).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        query_as::<Postgres, Campaign>(CREATE_CAMPAIGN_SQL)
            .bind(available_coupons)
            .bind(SqlxTimestamp::from(start_date))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_campaign(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        campaign: CampaignId,
    ) -> Result<Campaign, sqlx::Error> {
        query_as::<Postgres, Campaign>(GET_CAMPAIGN_SQL)
            .bind(campaign.into_i64())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Campaign {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let available_coupons: i32 = row.try_get("available_coupons")?;

        let available_coupons =
            u32::try_from(available_coupons).map_err(|e| sqlx::Error::ColumnDecode {
                index: "available_coupons".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            id: CampaignId::from_i64(row.try_get("id")?),
            available_coupons,
            start_date: row.try_get::<SqlxTimestamp, _>("start_date")?.to_jiff(),
            issued_coupon_codes: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
