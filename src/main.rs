use dotenv::dotenv;
use human_panic::setup_panic;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, warn};

// 从 lib.rs 导入模块
use rust_classroom_console::config::AppConfig;
use rust_classroom_console::runtime::lifetime;
use rust_classroom_console::shell::{Command, Flow, NavigationShell};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    // 记录程序启动时间
    let app_start_time = chrono::Utc::now();

    // 初始化配置
    setup_panic!();
    if let Err(e) = AppConfig::init() {
        eprintln!("Failed to initialize configuration: {e}");
        std::process::exit(1);
    }
    let config = AppConfig::get();

    // 初始化日志；配置了日志目录时写文件，避免干扰终端界面
    let (non_blocking_writer, _guard) = if config.app.log_dir.is_empty() {
        tracing_appender::non_blocking(std::io::stderr())
    } else {
        let appender =
            tracing_appender::rolling::daily(&config.app.log_dir, "classroom-console.log");
        tracing_appender::non_blocking(appender)
    };
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(config.app.log_dir.is_empty());

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_builder.json().init();
    }

    // 打印信息
    warn!(
        "Starting console...
        Project: {}
        Version: {}
        Authors: {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_AUTHORS")
    );

    let startup = match lifetime::startup::prepare_console_startup(config) {
        Ok(startup) => startup,
        Err(e) => {
            error!("Startup failed: {}", e);
            eprintln!("{}", e.format_simple());
            std::process::exit(1);
        }
    };

    debug!(
        "Startup completed in {} ms",
        chrono::Utc::now()
            .signed_duration_since(app_start_time)
            .num_milliseconds()
    );

    let mut shell = NavigationShell::new(config.clone(), startup.session, startup.client);
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let first = if shell.route().is_public() { "/login" } else { "/dashboard" };
    shell.navigate(first).await;
    let screen = shell.render().await;
    stdout.write_all(format!("{screen}\n> ").as_bytes()).await?;
    stdout.flush().await?;

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = lifetime::shutdown::listen_for_shutdown() => None,
        };
        // 输入结束（Ctrl+D）或收到 Ctrl+C
        let Some(line) = line else {
            break;
        };

        let output = match Command::parse(&line) {
            Ok(command) => {
                let (flow, output) = shell.execute(command).await;
                if flow == Flow::Quit {
                    stdout.write_all(format!("{output}\n").as_bytes()).await?;
                    break;
                }
                output
            }
            Err(message) => message,
        };

        if output.is_empty() {
            stdout.write_all(b"> ").await?;
        } else {
            stdout.write_all(format!("{output}\n> ").as_bytes()).await?;
        }
        stdout.flush().await?;
    }

    // 等待仍在进行的后台清理完成
    if let Some(handle) = shell.officers().resource().take_cleanup() {
        match handle.await {
            Ok(report) => debug!("Final cleanup: {} attempted", report.attempted()),
            Err(e) => warn!("Cleanup task failed: {}", e),
        }
    }

    Ok(())
}
