//! rskurogo 命令行工具
//! 对给定 User-Agent 分类并以 JSON 输出结果

use clap::Parser;
use rskurogo::{DetectOptions, DetectionMode, DeviceDetector, RskResult};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "rskurogo", version, about = "Classify a user-agent string as a Kurogo device profile")]
struct Cli {
    /// 待分类的 User-Agent
    #[arg(short = 'u', long)]
    user_agent: String,

    /// JSON 配置文件（选项名同 Kurogo 配置）
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    api_version: Option<String>,

    /// 使用本地规则文件检测
    #[arg(short, long)]
    local: Option<PathBuf>,

    /// 磁盘缓存目录
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// 使用测试接口
    #[arg(long)]
    test: bool,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_options(self) -> RskResult<DetectOptions> {
        let mut options = match &self.config {
            Some(path) => DetectOptions::from_json_file(path)?,
            None => DetectOptions::default(),
        };

        options.user_agent = Some(self.user_agent);
        if let Some(v) = self.api_version {
            options.api_version = v;
        }
        if let Some(path) = self.local {
            options.local_device_file = Some(path);
            options.detection_mode = DetectionMode::Local;
        }
        if self.cache_dir.is_some() {
            options.caching = self.cache_dir;
        }
        options.test |= self.test;
        Ok(options)
    }
}

async fn run(cli: Cli) -> RskResult<String> {
    let mut detector = DeviceDetector::new(cli.into_options()?)?;
    let result = detector.detect().await?;
    Ok(serde_json::to_string_pretty(&result)?)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(cli).await {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("rskurogo: {}", e);
            ExitCode::FAILURE
        }
    }
}
