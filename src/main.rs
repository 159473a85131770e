//! EduSeal command line.
//!
//! ```text
//! eduseal [--config eduseal.toml] <command>
//!
//!   acquire      prove a degree and mint it
//!   credentials  list the credential book (demo entries until a mint)
//!   talent       scan minted credentials into candidate profiles
//!   chain        show the resolved chain and registry
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use eduseal::config::{load_config, ObservabilityConfig};
use eduseal::dashboard::CredentialBook;
use eduseal::lifecycle::signals::spawn_ctrl_c_listener;
use eduseal::lifecycle::{AppContext, CancelSignal};
use eduseal::observability::{logging, metrics};
use eduseal::session::WalletSession;
use eduseal::talent::{self, TalentStats};
use eduseal::workflow::{CredentialWorkflow, TerminalLauncher, WorkflowError, WorkflowSettings};

#[derive(Parser)]
#[command(name = "eduseal")]
#[command(about = "Prove an academic degree and mint it as an on-chain credential", long_about = None)]
struct Cli {
    /// Configuration file. Missing file means defaults.
    #[arg(short, long, default_value = "eduseal.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a proof session and mint the verified degree
    Acquire {
        /// Stop once the proof is verified
        #[arg(long)]
        verify_only: bool,
    },
    /// List credentials
    Credentials {
        #[arg(short, long, default_value = "")]
        filter: String,
        /// Show one credential's proof payload and explorer link
        #[arg(short, long)]
        details: Option<String>,
    },
    /// Browse candidates with minted credentials
    Talent {
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Show the resolved chain
    Chain,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            // Subscriber not configured yet: fall back to the defaults.
            logging::init_tracing(&ObservabilityConfig::default());
            tracing::error!(path = %cli.config.display(), error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };

    logging::init_tracing(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "eduseal starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    match cli.command {
        Commands::Credentials { filter, details } => {
            // Session-only book: nothing minted yet in this process.
            let book = CredentialBook::new();
            match details {
                Some(id) => print_details(&book, &id, &config.chain.explorer_url)?,
                None => print_credentials(&book, &filter),
            }
            return Ok(());
        }
        command => {
            let ctx = match AppContext::initialize(config).await {
                Ok(ctx) => ctx,
                Err(e) => {
                    tracing::error!(error = %e, "Startup failed");
                    return Err(e.into());
                }
            };
            run(ctx, command).await?;
        }
    }

    Ok(())
}

async fn run(ctx: AppContext, command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Chain => {
            println!("network:   {}", ctx.chain.network);
            println!("chain id:  {}", ctx.chain.chain_id);
            println!("rpc:       {}", ctx.chain.rpc_url);
            println!("registry:  {}", ctx.chain.registry.address);
            println!(
                "rpc up:    {}",
                if ctx.session.client().is_healthy().await { "yes" } else { "no" }
            );
            match ctx.session.account() {
                Some(account) => println!("account:   {}", account),
                None => println!("account:   (read-only, set EDUSEAL_WALLET_PRIVATE_KEY)"),
            }
        }
        Commands::Talent { search } => {
            let candidates = match talent::load_candidates(
                ctx.session.client(),
                ctx.chain.registry.address,
            )
            .await
            {
                Ok(candidates) => candidates,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to scan minted credentials");
                    return Err(e.into());
                }
            };
            let stats = TalentStats::from_candidates(&candidates);
            println!(
                "{} candidates, {} credentials, network trust {:.1}%",
                stats.active_candidates, stats.total_credentials, stats.network_trust
            );

            let found = talent::search(&candidates, &search);
            if found.is_empty() && !search.trim().is_empty() {
                println!("No candidates match '{}'", search.trim());
            }
            for c in found {
                println!(
                    "{}  trust {}% ({})  {} credential(s)  since {}",
                    c.address,
                    c.trust_score,
                    c.confidence.as_str(),
                    c.credential_count,
                    c.mint_date().unwrap_or_else(|| "-".to_string())
                );
                for (degree, issuer) in c.degrees.iter().zip(&c.issuers) {
                    println!("    {} ({})", degree, issuer);
                }
            }
        }
        Commands::Acquire { verify_only } => acquire(ctx, verify_only).await?,
        Commands::Credentials { .. } => {}
    }
    Ok(())
}

async fn acquire(ctx: AppContext, verify_only: bool) -> Result<(), Box<dyn std::error::Error>> {
    let cancel = CancelSignal::new();
    let listener = spawn_ctrl_c_listener(cancel.clone());

    let settings = WorkflowSettings::from_config(&ctx.config, &ctx.chain);
    let sdk = match ctx.proof_sdk() {
        Ok(sdk) => sdk,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build proof session client");
            return Err(e.into());
        }
    };
    let mut workflow = CredentialWorkflow::new(
        ctx.session.clone(),
        sdk,
        Arc::new(TerminalLauncher),
        settings,
    )
    .with_cancel(cancel.subscribe());

    let result: Result<(), WorkflowError> = async {
        workflow.initiate().await?;
        if let Some(degree) = workflow.degree_name() {
            println!("Verified: {}", degree);
        }
        if verify_only {
            return Ok(());
        }

        let tx_hash = workflow.mint().await?;
        println!("Submitted: {}", tx_hash);
        workflow.await_confirmation().await
    }
    .await;
    listener.abort();

    if let Err(e) = result {
        tracing::error!(phase = %workflow.phase(), error = %e, "Credential acquisition stopped");
        return Err(e.into());
    }

    if let (Some(verified), Some(tx_hash)) = (workflow.verified(), workflow.tx_hash()) {
        let mut book = CredentialBook::new();
        book.record_minted(verified, tx_hash, chrono::Local::now().date_naive());
        println!("Credential sealed on-chain.");
        print_credentials(&book, "");
        if let Some(credential) = book.visible().first() {
            println!("    {}", credential.explorer_link(&ctx.config.chain.explorer_url));
        }
    }
    Ok(())
}

fn print_details(
    book: &CredentialBook,
    id: &str,
    explorer_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(credential) = book.find(id) else {
        tracing::error!(id = id.trim(), "Unknown credential");
        return Err(format!("no credential with id '{}'", id.trim()).into());
    };
    println!("{}", credential.details_json()?);
    println!("explorer: {}", credential.explorer_link(explorer_url));
    Ok(())
}

fn print_credentials(book: &CredentialBook, filter: &str) {
    let credentials = book.filter(filter);
    if credentials.is_empty() {
        println!("No credentials match '{}'", filter.trim());
    }
    for c in credentials {
        println!(
            "{}  {}  {}  [{}]{}",
            c.date,
            c.issuer,
            c.degree,
            c.status.as_str(),
            if c.is_demo { "  (demo)" } else { "" }
        );
        if let Some(tx) = c.tx_hash {
            println!("    tx {}", tx);
        }
    }
}
