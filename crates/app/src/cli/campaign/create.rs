use clap::Args;
use coupon_app::domain::coupons::data::NewCampaign;
use jiff::Timestamp;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct CreateCampaignArgs {
    /// Number of coupons in the pool
    #[arg(long)]
    coupons: i64,

    /// RFC 3339 instant from which coupons may be issued; now when omitted
    #[arg(long)]
    start_date: Option<Timestamp>,

    #[command(flatten)]
    database: DatabaseArgs,
}

pub(crate) async fn run(args: CreateCampaignArgs) -> Result<(), String> {
    let context = args.database.connect().await?;

    let campaign = context
        .coupons
        .create_campaign(NewCampaign {
            available_coupons: args.coupons,
            start_date: args.start_date.unwrap_or_else(Timestamp::now),
        })
        .await
        .map_err(|error| format!("failed to create campaign: {error}"))?;

    super::print_campaign(&campaign);

    Ok(())
}
