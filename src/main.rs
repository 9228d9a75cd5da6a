use anyhow::Result;
use clap::Parser;
use eiken_ast::cli::Cli;
use eiken_ast::utils::logging;
use eiken_ast::App;

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行并合并配置
    let config = Cli::parse().into_config()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 运行批量转换
    App::new(config).run().await?;

    Ok(())
}
