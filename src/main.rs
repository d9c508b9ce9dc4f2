use std::{io::Write, process::ExitCode};

use env_logger::Env;

mod cli;

fn init_logging() {
    // Colored by level, e.g. "YMS::> Track 'Bob - X' added to '(YMS) - Bob'"
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            writeln!(buf, "{style}YMS::> {}{style:#}", record.args())
        })
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // The token may come from a .env file
    dotenvy::dotenv().ok();
    init_logging();

    cli::run().await
}
