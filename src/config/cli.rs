use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "review-responder")]
#[command(about = "Auto-respond to Google Business Profile reviews for multiple locations")]
pub struct CliArgs {
    /// Print intended replies without sending them or updating the ledger
    #[arg(long, alias = "simulate")]
    pub dry_run: bool,
}
