//! Main application orchestration and execution

use crate::{
    cli::{Cli, Command, SendArgs, SendNonceArgs},
    client::{ClientFactory, HttpClient, HttpUtils},
    config::{display_config_summary, load_config},
    defaults::{BINARY_TIP_LAMPORTS, TIP_LAMPORTS},
    error::{AppError, Result},
    logging::LoggerFactory,
    models::{Config, RunProfile, Target},
    output::{OutputFormatter, OutputFormatterFactory},
    relay::{
        parse_keypair, parse_pubkey, HashSource, RelayEndpoint, SolanaSdk, SubmissionPlan,
        SubmissionReport, Submitter, TransactionSdk, TransferPlan,
    },
    sampler::LatencySampler,
    types::{Region, SubmitEncoding},
};
use solana_sdk::{
    hash::Hash,
    signature::{Keypair, Signer},
    transaction::Transaction,
};
use std::sync::Arc;

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
    config: Config,
    client: Arc<dyn HttpClient>,
    formatter: Box<dyn OutputFormatter>,
    loggers: LoggerFactory,
}

impl App {
    /// Load configuration and build the shared HTTP client
    pub fn new(cli: Cli) -> Result<Self> {
        let config = load_config(&cli)?;
        let client: Arc<dyn HttpClient> = Arc::new(ClientFactory::create_network_client()?);
        Ok(Self::with_client(cli, config, client))
    }

    pub fn with_client(cli: Cli, config: Config, client: Arc<dyn HttpClient>) -> Self {
        let formatter = OutputFormatterFactory::create_formatter(config.enable_color, config.verbose);
        let loggers = LoggerFactory::new(config.clone());
        Self {
            cli,
            config,
            client,
            formatter,
            loggers,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Translate the parsed subcommand into what will be run
    pub fn profile(&self) -> Result<RunProfile> {
        match &self.cli.command {
            Command::Bench(args) => {
                let mut targets = Vec::new();

                let regions: &[Region] = if args.regions.is_empty() && args.urls.is_empty() {
                    &Region::ALL
                } else {
                    &args.regions
                };
                if !regions.is_empty() {
                    let api_key = self.config.require_api_key()?;
                    for &region in regions {
                        targets.push(Target::for_region(region, api_key)?);
                    }
                }

                for url in &args.urls {
                    HttpUtils::validate_url(url)?;
                    targets.push(Target::new(HttpUtils::extract_domain(url)?, url.as_str()));
                }

                Ok(RunProfile::LatencySweep {
                    targets,
                    repetitions: self.config.request_count,
                })
            }
            Command::Send(args) => {
                let api_key = self.config.require_api_key()?;
                let encoding = if args.binary {
                    SubmitEncoding::Binary
                } else {
                    SubmitEncoding::JsonRpc
                };
                let tip_lamports = args.tip_lamports.unwrap_or(match encoding {
                    SubmitEncoding::JsonRpc => TIP_LAMPORTS,
                    SubmitEncoding::Binary => BINARY_TIP_LAMPORTS,
                });
                let tip_receiver = parse_pubkey(&args.tip_key, "--tip-key")?;

                let endpoint = match &args.relay_url {
                    Some(url) => {
                        HttpUtils::validate_url(url)?;
                        RelayEndpoint::new(HttpUtils::extract_domain(url)?, url.as_str(), api_key)
                    }
                    None => RelayEndpoint::for_region(args.region, api_key),
                }
                .with_tip(tip_receiver, tip_lamports);

                if args.compare_keep_alive {
                    return Ok(RunProfile::KeepAliveComparison { endpoint, encoding });
                }
                Ok(RunProfile::TipTransfer {
                    endpoint,
                    encoding,
                    keep_alive: args.keep_alive,
                })
            }
            Command::SendNonce(_) => {
                let api_key = self.config.require_api_key()?;
                let endpoint = |region: Region| -> Result<RelayEndpoint> {
                    let (receiver, lamports) = region.nonce_tip().ok_or_else(|| {
                        AppError::internal(format!("No nonce tip defined for {}", region))
                    })?;
                    let receiver = parse_pubkey(receiver, "tip receiver")?;
                    Ok(RelayEndpoint::for_region(region, api_key).with_tip(receiver, lamports))
                };

                Ok(RunProfile::NonceFanOut {
                    endpoints: [endpoint(Region::De)?, endpoint(Region::Ny)?],
                })
            }
        }
    }

    /// Run the selected subcommand to completion
    pub async fn run(&self) -> Result<()> {
        if self.config.debug {
            eprintln!(
                "{} v{} ({} {}, built {})",
                crate::PKG_NAME,
                crate::VERSION,
                crate::GIT_COMMIT,
                crate::TARGET_TRIPLE,
                crate::BUILD_TIME
            );
            eprintln!("{}", display_config_summary(&self.config));
            eprintln!("Session: {}", self.loggers.session_id());
        }

        let result = self.dispatch().await;
        if let Err(e) = &result {
            self.loggers
                .create_error_logger()
                .await
                .log_error(e, Some(self.profile_name()), None)
                .await;
        }
        result
    }

    fn profile_name(&self) -> &'static str {
        match &self.cli.command {
            Command::Bench(_) => "bench",
            Command::Send(_) => "send",
            Command::SendNonce(_) => "send-nonce",
        }
    }

    async fn dispatch(&self) -> Result<()> {
        let profile = self.profile()?;
        if self.config.verbose {
            println!(
                "{}",
                self.formatter
                    .format_header(&format!("Run profile: {}", profile.name()))?
            );
        }

        match (&self.cli.command, profile) {
            (Command::Bench(_), RunProfile::LatencySweep { targets, repetitions }) => {
                self.run_sweep(&targets, repetitions).await
            }
            (
                Command::Send(args),
                RunProfile::TipTransfer {
                    endpoint,
                    encoding,
                    keep_alive,
                },
            ) => self.run_tip_transfer(args, endpoint, encoding, keep_alive).await,
            (Command::Send(args), RunProfile::KeepAliveComparison { endpoint, encoding }) => {
                self.run_keep_alive_comparison(args, endpoint, encoding).await
            }
            (Command::SendNonce(args), RunProfile::NonceFanOut { endpoints }) => {
                self.run_nonce_fan_out(args, endpoints).await
            }
            (_, profile) => Err(AppError::internal(format!(
                "Run profile {} does not match the subcommand",
                profile.name()
            ))),
        }
    }

    async fn run_sweep(&self, targets: &[Target], repetitions: u32) -> Result<()> {
        let sampler = LatencySampler::new(
            self.client.clone(),
            self.loggers.create_network_logger().await,
        );

        for target in targets {
            println!("{}", self.formatter.format_target_start(target)?);
            let outcome = sampler.run(target, repetitions).await?;
            println!("{}", self.formatter.format_outcome(&outcome)?);
            println!();
        }

        Ok(())
    }

    fn sdk(&self) -> SolanaSdk {
        SolanaSdk::new(self.client.clone(), self.config.rpc_url.clone())
    }

    /// Build and sign one tip transfer against a freshly fetched blockhash
    async fn signed_tip_transfer(
        &self,
        sdk: &SolanaSdk,
        args: &SendArgs,
        payer: &Keypair,
        endpoint: &RelayEndpoint,
    ) -> Result<(Hash, Transaction)> {
        let destination = parse_pubkey(&args.to_public_key, "--to-public-key")?;
        let tip = endpoint
            .tip
            .ok_or_else(|| AppError::internal("Relay endpoint has no tip configured"))?;

        let plan = TransferPlan {
            payer: payer.pubkey(),
            destination,
            lamports: args.amount,
            tip_receiver: tip.receiver,
            tip_lamports: tip.lamports,
        };

        let source = HashSource::RecentBlockhash;
        let blockhash = sdk.fetch_recent_blockhash_or_nonce(&source).await?;
        let message = sdk.build_transfer_set(&plan, &source)?;
        let transaction = sdk.sign(message, payer, blockhash)?;
        Ok((blockhash, transaction))
    }

    async fn run_tip_transfer(
        &self,
        args: &SendArgs,
        endpoint: RelayEndpoint,
        encoding: SubmitEncoding,
        keep_alive: bool,
    ) -> Result<()> {
        let payer = parse_keypair(&args.private_key)?;
        let sdk = self.sdk();
        let (blockhash, transaction) = self.signed_tip_transfer(&sdk, args, &payer, &endpoint).await?;

        if self.config.verbose {
            println!("Sender: {}", payer.pubkey());
            println!("Blockhash: {}", blockhash);
            println!("Encoding: {}", encoding.name());
        }

        let submission = SubmissionPlan::single(endpoint, transaction, encoding).with_keep_alive(keep_alive);
        let report = self.submit(&submission, &sdk).await;
        println!("{}", self.formatter.format_report(&report)?);
        Ok(())
    }

    /// Cold submission, warm-up, warm submission; each with its own blockhash
    async fn run_keep_alive_comparison(
        &self,
        args: &SendArgs,
        endpoint: RelayEndpoint,
        encoding: SubmitEncoding,
    ) -> Result<()> {
        let payer = parse_keypair(&args.private_key)?;
        let sdk = self.sdk();
        let (_, cold) = self.signed_tip_transfer(&sdk, args, &payer, &endpoint).await?;
        let (_, warm) = self.signed_tip_transfer(&sdk, args, &payer, &endpoint).await?;

        if self.config.verbose {
            println!("Sender: {}", payer.pubkey());
            println!("Encoding: {}", encoding.name());
        }

        let submitter = Submitter::new(
            self.client.clone(),
            self.loggers.create_network_logger().await,
        );
        let report = submitter
            .compare_keep_alive(&endpoint, &cold, &warm, encoding, &sdk)
            .await;
        println!("{}", self.formatter.format_report(&report)?);
        Ok(())
    }

    async fn run_nonce_fan_out(&self, args: &SendNonceArgs, endpoints: [RelayEndpoint; 2]) -> Result<()> {
        let payer = parse_keypair(&args.private_key)?;
        let destination = parse_pubkey(&args.to_public_key, "--to-public-key")?;
        let account = parse_pubkey(&args.nonce_public_key, "--nonce-public-key")?;

        let sdk = self.sdk();
        let source = HashSource::DurableNonce { account };
        let nonce = sdk.fetch_recent_blockhash_or_nonce(&source).await?;

        if self.config.verbose {
            println!("Sender: {}", payer.pubkey());
            println!("Nonce: {}", nonce);
        }

        let mut entries = Vec::with_capacity(endpoints.len());
        for endpoint in endpoints {
            let tip = endpoint
                .tip
                .ok_or_else(|| AppError::internal(format!("{} has no tip configured", endpoint.label)))?;
            let plan = TransferPlan {
                payer: payer.pubkey(),
                destination,
                lamports: args.amount,
                tip_receiver: tip.receiver,
                tip_lamports: tip.lamports,
            };
            let message = sdk.build_transfer_set(&plan, &source)?;
            let transaction = sdk.sign(message, &payer, nonce)?;
            entries.push((endpoint, transaction));
        }

        let report = self.submit(&SubmissionPlan::fan_out(entries), &sdk).await;
        println!("{}", self.formatter.format_report(&report)?);
        Ok(())
    }

    async fn submit(&self, plan: &SubmissionPlan, sdk: &dyn TransactionSdk) -> SubmissionReport {
        let submitter = Submitter::new(
            self.client.clone(),
            self.loggers.create_network_logger().await,
        );
        submitter.execute(plan, sdk).await
    }
}
