use anyhow::Result;
use clap::Parser;
use paper_generator::cli::{Cli, Commands};
use paper_generator::utils::logging;
use paper_generator::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let mut config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    let cli = Cli::parse();
    if let Commands::Generate(args) = &cli.command {
        args.apply(&mut config);
    }

    // 初始化并运行应用
    let mut app = App::initialize(config).await?;
    app.run(cli.command).await?;

    Ok(())
}
