use anyhow::Context;
use sweet_server::{Config, Server, ServerState, init_logger_with_file, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 加载 .env (可选)
    dotenv::dotenv().ok();

    // 2. 加载配置
    let config = Config::from_env().context("Failed to load configuration")?;

    // 3. 日志
    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create log dir {dir}"))?;
    }
    init_logger_with_file(
        Some(&config.log_level),
        config.log_json,
        config.log_dir.as_deref(),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {e}"))?;

    print_banner();
    tracing::info!(
        environment = %config.environment,
        database = %config.database_path,
        "🍬 Sweet Shop Server starting..."
    );

    // 4. 初始化服务器状态 (数据库、JWT、管理员)
    let state = ServerState::initialize(&config).await?;

    // 5. 启动 HTTP 服务器
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    tracing::info!("Server stopped");
    Ok(())
}
