use clap::Args;
use coupon_app::domain::coupons::models::CampaignId;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct IssueCouponArgs {
    /// Campaign identifier
    #[arg(long)]
    campaign: i64,

    #[command(flatten)]
    database: DatabaseArgs,
}

pub(crate) async fn run(args: IssueCouponArgs) -> Result<(), String> {
    let context = args.database.connect().await?;

    let coupon = context
        .coupons
        .issue_coupon(CampaignId::from_i64(args.campaign))
        .await
        .map_err(|error| format!("failed to issue coupon: {error}"))?;

    println!("code: {}", coupon.code);
    println!("campaign_id: {}", coupon.campaign_id);

    Ok(())
}
