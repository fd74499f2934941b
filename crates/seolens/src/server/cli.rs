#[derive(Debug, Clone, clap::Args)]
pub struct ServeOptions {
    /// Port to listen on
    #[arg(short, long, env = "SEOLENS_PORT", default_value = "3000")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "SEOLENS_HOST", default_value = "127.0.0.1")]
    pub host: String,
}
