use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use coupon_app::{
    context::AppContext, database::PoolSettings, domain::coupons::recorder::NoopRecorder,
};

mod campaign;
mod coupon;

#[derive(Debug, Parser)]
#[command(name = "coupon-app", about = "Coupon campaign CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Campaign(campaign::CampaignCommand),
    Coupon(coupon::CouponCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Campaign(command) => campaign::run(command).await,
            Commands::Coupon(command) => coupon::run(command).await,
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Maximum pooled connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 5)]
    max_connections: u32,
}

impl DatabaseArgs {
    pub(crate) async fn connect(&self) -> Result<AppContext, String> {
        AppContext::from_database_url(
            &self.database_url,
            PoolSettings::new(self.max_connections),
            Arc::new(NoopRecorder),
        )
        .await
        .map_err(|error| format!("{error}: {}", source_message(&error)))
    }
}

fn source_message(error: &dyn std::error::Error) -> String {
    error
        .source()
        .map_or_else(String::new, ToString::to_string)
}
