use crate::prelude::{eprintln, *};
use clap::Parser;

mod error;
mod prelude;
mod providers;
mod seo;
mod server;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "SEO research from the terminal or over HTTP: SERP competitors, domain link metrics and keyword opportunities"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "SEOLENS_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Run the HTTP API
    Serve(crate::server::ServeOptions),

    /// Rank the organic competitors for a keyword
    Serp(crate::seo::serp::SerpOptions),

    /// Link and authority metrics for a domain
    Domain(crate::seo::domain::DomainOptions),

    /// List backlinks pointing at a domain
    Backlinks(crate::seo::domain::BacklinksOptions),

    /// Find non-brand keyword opportunities for a niche
    Opportunities(crate::seo::opportunity::OpportunityOptions),

    /// Search volume for a list of keywords
    Volume(crate::seo::opportunity::VolumeOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Serve(options) => crate::server::run_server(options, app.global).await,
        command => run_command(command, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}

/// Run a one-shot terminal command against the providers
async fn run_command(command: SubCommands, global: Global) -> Result<()> {
    let providers = crate::providers::Providers::from_env()?;
    if global.verbose {
        eprintln!("Loaded provider configuration from the environment");
    }

    match command {
        SubCommands::Serve(_) => Err(eyre!("serve is not a one-shot command")),
        SubCommands::Serp(options) => crate::seo::serp::serp_handler(options, &providers).await,
        SubCommands::Domain(options) => {
            crate::seo::domain::domain_handler(options, &providers).await
        }
        SubCommands::Backlinks(options) => {
            crate::seo::domain::backlinks_handler(options, &providers).await
        }
        SubCommands::Opportunities(options) => {
            crate::seo::opportunity::opportunity_handler(options, &providers).await
        }
        SubCommands::Volume(options) => {
            crate::seo::opportunity::volume_handler(options, &providers).await
        }
    }
}
