use clap::{Args, Subcommand};
use coupon_app::domain::coupons::models::Campaign;

mod create;
mod get;

#[derive(Debug, Args)]
pub(crate) struct CampaignCommand {
    #[command(subcommand)]
    command: CampaignSubcommand,
}

#[derive(Debug, Subcommand)]
enum CampaignSubcommand {
    Create(create::CreateCampaignArgs),
    Get(get::GetCampaignArgs),
}

pub(crate) async fn run(command: CampaignCommand) -> Result<(), String> {
    match command.command {
        CampaignSubcommand::Create(args) => create::run(args).await,
        CampaignSubcommand::Get(args) => get::run(args).await,
    }
}

fn print_campaign(campaign: &Campaign) {
    println!("campaign_id: {}", campaign.id);
    println!("available_coupons: {}", campaign.available_coupons);
    println!("start_date: {}", campaign.start_date);
}
