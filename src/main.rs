mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{App, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志系统
    rusuite::logger::init_logger();

    let cli = Cli::parse();
    let app = App::bootstrap()?;
    app.run_command(cli.command).await?;
    Ok(())
}
