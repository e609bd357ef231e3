use anyhow::Result;
use lab_ops_console::config::Config;
use lab_ops_console::orchestrator::App;
use lab_ops_console::utils::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    // 收集命令行参数（不含程序名）
    let args: Vec<String> = std::env::args().skip(1).collect();

    // 初始化并运行应用
    App::initialize(config)?.run(&args).await?;

    Ok(())
}
