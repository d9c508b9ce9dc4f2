use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use yms::{
    cleaner::Cleaner,
    clients::{entities::Visibility, yandex::DEFAULT_API_URL},
    config::{Config, ConfigBuilder, Mode},
    sorter::{DEFAULT_PREFIX, DEFAULT_UNKNOWN_LABEL, Sorter},
};

#[derive(Parser, Debug)]
#[command(name = "yms")]
#[command(version, about = "Sort liked Yandex Music tracks into per-artist playlists", long_about = None)]
struct Cli {
    /// OAuth token of the account to work with
    #[arg(env = "YMS_TOKEN", hide_env_values = true)]
    token: String,

    /// Prefix added before every playlist title
    #[arg(short, long, default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// Title for the playlist of tracks whose artist has no name
    #[arg(short, long, default_value = DEFAULT_UNKNOWN_LABEL)]
    unknown: String,

    /// Visibility of newly created playlists: public or private
    #[arg(short, long, default_value_t = Visibility::Public)]
    visibility: Visibility,

    /// Delete all playlists whose title starts with this prefix instead of sorting
    #[arg(long, value_name = "PREFIX")]
    delete: Option<String>,

    /// Base URL of the Yandex Music API
    #[arg(long, env = "YMS_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
}

impl Cli {
    fn into_config(self) -> yms::clients::errors::Result<Config> {
        ConfigBuilder::new()
            .token(self.token)
            .api_url(self.api_url)
            .prefix(self.prefix)
            .unknown_label(self.unknown)
            .visibility(self.visibility)
            .delete_prefix(self.delete)
            .build()
    }
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    info!("Building config ...");
    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let client = match config.client() {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to set up Yandex Music client: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match &config.mode {
        Mode::Sort(options) => Sorter::new(&client, options).sort().await,
        Mode::Delete { prefix } => Cleaner::new(&client, prefix).clean().await,
    };

    match result {
        Ok(tally) => {
            tally.log_summary();
            ExitCode::SUCCESS
        }
        Err(fatal) => {
            error!("{fatal}");
            ExitCode::from(fatal.exit_code())
        }
    }
}
