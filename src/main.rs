use chrono::{NaiveDate, Utc};
use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use sokoo::application::engine::{BillingSettings, MarketplaceEngine};
use sokoo::domain::filter::{PaymentQuery, ShopQuery, UserQuery};
use sokoo::domain::payment::PaymentMethod;
use sokoo::domain::shop::ShopId;
use sokoo::domain::user::UserId;
use sokoo::interfaces::csv::report_writer::ReportWriter;
use sokoo::interfaces::json::command_reader::{Command, CommandReader};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Report {
    /// Every shop, any status.
    Shops,
    /// Public directory: active shops only.
    Directory,
    /// Shop payment states.
    Billing,
    /// Registered accounts.
    Users,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input commands file (JSON lines)
    input: PathBuf,

    /// Table to print once the command stream is processed
    #[arg(long, value_enum, default_value = "shops")]
    report: Report,

    /// Date for derived overdue state; defaults to the current date
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Monthly subscription fee
    #[arg(long)]
    monthly_fee: Option<Decimal>,

    /// Fee currency code
    #[arg(long)]
    currency: Option<String>,

    /// Days between approval and the first due date
    #[arg(long)]
    payment_window_days: Option<u32>,
}

impl Cli {
    fn settings(&self) -> BillingSettings {
        let mut settings = BillingSettings::default();
        if let Some(fee) = self.monthly_fee {
            settings.monthly_fee = fee;
        }
        if let Some(currency) = &self.currency {
            settings.currency = currency.clone();
        }
        if let Some(days) = self.payment_window_days {
            settings.payment_window_days = days;
        }
        settings
    }
}

async fn apply(
    engine: &MarketplaceEngine,
    command: Command,
    today: NaiveDate,
) -> sokoo::error::Result<()> {
    match command {
        Command::SignUp { form } => {
            engine.sign_up(form).await?;
        }
        Command::RegisterShop { owner, form } => {
            engine.register_shop(UserId(owner), form).await?;
        }
        Command::ApproveShop { shop } => {
            engine.approve_shop(ShopId(shop), today).await?;
        }
        Command::RejectShop { shop } => {
            engine.reject_shop(ShopId(shop)).await?;
        }
        Command::UpdateShop { shop, form } => {
            engine.update_shop(ShopId(shop), form).await?;
        }
        Command::DeleteShop { shop } => {
            engine.delete_shop(ShopId(shop)).await?;
        }
        Command::Pay { shop, method } => {
            engine
                .settle_current(ShopId(shop), method.unwrap_or(PaymentMethod::CreditCard))
                .await?;
        }
        Command::MarkPaid { shop, method } => {
            engine
                .settle_current(ShopId(shop), method.unwrap_or(PaymentMethod::Mpesa))
                .await?;
        }
        Command::Remind { shop } => {
            engine.send_reminder(ShopId(shop)).await?;
        }
        Command::EnforceOverdue { today } => {
            engine.enforce_overdue(today).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let today = cli.today.unwrap_or_else(|| Utc::now().date_naive());
    let engine = MarketplaceEngine::in_memory(cli.settings());

    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    for result in reader.commands() {
        match result {
            Ok(command) => {
                if let Err(e) = apply(&engine, command, today).await {
                    eprintln!("Error applying command: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading command: {}", e);
            }
        }
    }

    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());
    match cli.report {
        Report::Shops => {
            let shops = engine.shops(&ShopQuery::default()).await.into_diagnostic()?;
            writer.write_shops(&shops).into_diagnostic()?;
        }
        Report::Directory => {
            let shops = engine
                .directory(&ShopQuery::default())
                .await
                .into_diagnostic()?;
            writer.write_shops(&shops).into_diagnostic()?;
        }
        Report::Billing => {
            let rows = engine
                .billing(&PaymentQuery::default(), today)
                .await
                .into_diagnostic()?;
            writer.write_billing(&rows).into_diagnostic()?;
        }
        Report::Users => {
            let users = engine.users(&UserQuery::default()).await.into_diagnostic()?;
            writer.write_users(&users).into_diagnostic()?;
        }
    }

    Ok(())
}
