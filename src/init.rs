use env_logger::Env;

/// 初始化日誌，`RUST_LOG` 優先於命令列的詳細程度
pub fn init(verbose: u8, quiet: bool) {
    let default_filter = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };

    // 重複初始化（例如測試中）時忽略
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init();
}
