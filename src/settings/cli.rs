use super::Parser;

/// Command line surface of the server binaries. Only the settings path is
/// overridable here; everything else lives in the settings file.
#[derive(Parser, Debug)]
pub struct Cli {
    /// Settings file to load, without the `.toml` extension.
    #[arg(long)]
    pub settings: Option<String>,
}
