//! 命令行入口
//!
//! 解析参数、加载配置并分派到 `presign-get`、`presign-put` 与 `sync`
//! 子命令。预签名 URL 是标准输出上唯一的内容，诊断信息全部写入标准错误。

use crate::config::{Configuration, DEFAULT_CONFIG_PATH};
use crate::error::{EXIT_USAGE, RelayError};
use crate::s3::credentials::SdkCredentialProbe;
use crate::s3::mirror::S3Mirror;
use crate::s3::{Direction, PresignRequest, create_s3_client, generate_presigned_url, load_sdk_config};
use crate::sync::{SyncOutcome, SyncTarget, run_sync};
use crate::utils::log_file::SyncLog;
use aws_config::SdkConfig;
use clap::builder::NonEmptyStringValueParser;
use clap::{Args, Parser, Subcommand};
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use tracing::Level;
use tracing::info;
use tracing_subscriber::fmt::time::LocalTime;

/// S3 relay - presigned URLs and directory sync for a private bucket
#[derive(Parser, Debug)]
#[command(name = "s3-relay")]
#[command(version)]
#[command(about = "Issue presigned S3 URLs and mirror a directory to a private bucket", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short = 'c',
        long = "config",
        env = "S3_RELAY_CONFIG",
        default_value = DEFAULT_CONFIG_PATH,
        global = true
    )]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a presigned GET (download) URL
    PresignGet(PresignArgs),

    /// Print a presigned PUT (upload) URL
    PresignPut(PresignArgs),

    /// Mirror the local sync directory to the bucket
    Sync,
}

#[derive(Args, Debug)]
pub struct PresignArgs {
    /// Object path relative to PREFIX
    #[arg(value_name = "RELATIVE_PATH", value_parser = NonEmptyStringValueParser::new())]
    pub path: String,

    /// URL lifetime in seconds (defaults to EXPIRES_DEFAULT)
    #[arg(value_name = "EXPIRY_SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub expiry: Option<u64>,
}

/// 运行命令行并返回进程退出码。
///
/// # 参数
///
/// * `args` - 命令行参数（包含程序名）。
/// * `stdout` - 预签名 URL 以及帮助信息的输出。
/// * `stderr` - 用法错误与失败信息的输出。
///
/// # 返回值
///
/// 成功或跳过同步时为 0；用法错误为 1；缺少存储桶为 2；缺少区域为 3；
/// 远端操作失败为 1。
pub async fn run<I, T>(args: I, stdout: &mut dyn Write, stderr: &mut dyn Write) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            // --help 与 --version 走标准输出，退出码为 0
            if e.use_stderr() {
                let _ = write!(stderr, "{}", e.render());
                return EXIT_USAGE;
            }
            let _ = write!(stdout, "{}", e.render());
            return 0;
        }
    };

    init_tracing(cli.verbose);

    match execute(cli, stdout).await {
        Ok(()) => 0,
        Err(e) => {
            let _ = writeln!(stderr, "error: {}", e);
            e.exit_code()
        }
    }
}

/// 初始化日志，输出到标准错误。
///
/// 重复初始化（例如在测试中多次调用 [`run`]）会被忽略。
pub fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_timer(LocalTime::rfc_3339())
        .with_max_level(level)
        .try_init();
}

async fn execute(cli: Cli, stdout: &mut dyn Write) -> Result<(), RelayError> {
    let config = Configuration::load(&cli.config)?;
    // 在 SDK 可能启动其他线程之前确定日志时区
    let log = SyncLog::new(&config.log_file);
    let sdk_config = load_sdk_config(&config.region).await;

    match cli.command {
        Command::PresignGet(args) => presign(&config, &sdk_config, Direction::Get, args, stdout).await,
        Command::PresignPut(args) => presign(&config, &sdk_config, Direction::Put, args, stdout).await,
        Command::Sync => sync(&config, &sdk_config, &log).await,
    }
}

async fn presign(
    config: &Configuration,
    sdk_config: &SdkConfig,
    direction: Direction,
    args: PresignArgs,
    stdout: &mut dyn Write,
) -> Result<(), RelayError> {
    let request = PresignRequest::resolve(config, direction, &args.path, args.expiry);
    let s3_client = create_s3_client(sdk_config);

    let url = generate_presigned_url(&s3_client, &config.bucket, &request).await?;
    writeln!(stdout, "{}", url)?;
    Ok(())
}

async fn sync(
    config: &Configuration,
    sdk_config: &SdkConfig,
    log: &SyncLog,
) -> Result<(), RelayError> {
    let target = SyncTarget::from_config(config);
    let probe = SdkCredentialProbe::new(sdk_config);
    let mirror = S3Mirror::new(create_s3_client(sdk_config));

    match run_sync(&probe, &mirror, &target, log).await? {
        SyncOutcome::Skipped => info!("本轮同步已跳过"),
        SyncOutcome::Completed(summary) => info!(
            uploaded = summary.uploaded,
            deleted = summary.deleted,
            "同步成功"
        ),
    }
    Ok(())
}
