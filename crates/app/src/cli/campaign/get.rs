use clap::Args;
use coupon_app::domain::coupons::models::CampaignId;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct GetCampaignArgs {
    /// Campaign identifier
    #[arg(long)]
    campaign: i64,

    #[command(flatten)]
    database: DatabaseArgs,
}

pub(crate) async fn run(args: GetCampaignArgs) -> Result<(), String> {
    let context = args.database.connect().await?;

    let campaign = context
        .coupons
        .get_campaign(CampaignId::from_i64(args.campaign))
        .await
        .map_err(|error| format!("failed to load campaign: {error}"))?;

    super::print_campaign(&campaign);

    println!("issued_coupons: {}", campaign.issued_coupon_codes.len());

    for code in &campaign.issued_coupon_codes {
        println!("  {code}");
    }

    Ok(())
}
